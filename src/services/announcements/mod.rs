pub mod create;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    announcements::requests::{AnnouncementListQuery, CreateAnnouncementRequest},
};
use crate::services::{not_found, storage_error};

super::lazy_service! {
    AnnouncementService
}

impl AnnouncementService {
    pub async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_announcement(self, req, request).await
    }

    pub async fn list_announcements(
        &self,
        query: AnnouncementListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_announcements_with_pagination(query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Announcement list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to retrieve announcements")),
        }
    }

    // 关联的站内通知随公告级联删除
    pub async fn delete_announcement(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_announcement(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Announcement deleted",
            ))),
            Ok(false) => Ok(not_found(
                ErrorCode::AnnouncementNotFound,
                "Announcement not found",
            )),
            Err(e) => Ok(storage_error(e, "Announcement deletion failed")),
        }
    }
}
