pub mod create;
pub mod get;
pub mod photo;
pub mod update;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::tutors::requests::{CreateTutorRequest, TutorListQuery, UpdateTutorRequest};

super::lazy_service! {
    TutorService
}

impl TutorService {
    pub async fn create_tutor(
        &self,
        req: CreateTutorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_tutor(self, req, request).await
    }

    pub async fn list_tutors(
        &self,
        query: TutorListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::list_tutors(self, query, request).await
    }

    pub async fn get_tutor(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_tutor(self, id, request).await
    }

    pub async fn update_tutor(
        &self,
        id: i64,
        req: UpdateTutorRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_tutor(self, id, req, request).await
    }

    pub async fn delete_tutor(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        update::delete_tutor(self, id, request).await
    }

    pub async fn upload_photo(
        &self,
        id: i64,
        payload: Multipart,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        photo::upload_photo(self, id, payload, request).await
    }
}
