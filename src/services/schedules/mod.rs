pub mod create;
pub mod draft;
pub mod list;
pub mod status;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest, UpdateScheduleStatusRequest,
};

super::lazy_service! {
    /// 课程安排
    ScheduleService
}

impl ScheduleService {
    pub async fn create_schedule(
        &self,
        req: CreateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_schedule(self, req, request).await
    }

    pub async fn list_schedules(
        &self,
        query: ScheduleListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_schedules(self, query, request).await
    }

    pub async fn get_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::get_schedule(self, id, request).await
    }

    pub async fn update_schedule(
        &self,
        id: i64,
        req: UpdateScheduleRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_schedule(self, id, req, request).await
    }

    pub async fn update_status(
        &self,
        id: i64,
        req: UpdateScheduleStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        status::update_status(self, id, req, request).await
    }

    pub async fn delete_schedule(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        update::delete_schedule(self, id, request).await
    }
}
