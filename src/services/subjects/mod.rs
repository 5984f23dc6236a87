mod crud;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::subjects::requests::{
    CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest,
};

super::lazy_service! {
    SubjectService
}

impl SubjectService {
    pub async fn list_subjects(
        &self,
        query: SubjectListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::list_subjects(self, query, request).await
    }

    pub async fn create_subject(
        &self,
        req: CreateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::create_subject(self, req, request).await
    }

    pub async fn get_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        crud::get_subject(self, id, request).await
    }

    pub async fn update_subject(
        &self,
        id: i64,
        req: UpdateSubjectRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        crud::update_subject(self, id, req, request).await
    }

    pub async fn delete_subject(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        crud::delete_subject(self, id, request).await
    }
}
