use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::{
    ApiResponse, ErrorCode,
    notifications::{
        requests::NotificationListQuery,
        responses::{MarkedReadResponse, UnreadCountResponse},
    },
};
use crate::services::{current_user, not_found, storage_error};

super::lazy_service! {
    /// 当前用户的站内通知，只能访问自己的
    NotificationService
}

fn notification_missing() -> HttpResponse {
    not_found(ErrorCode::NotificationNotFound, "Notification not found")
}

impl NotificationService {
    pub async fn list_notifications(
        &self,
        query: NotificationListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        match storage
            .list_notifications_with_pagination(user.id, query)
            .await
        {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Notifications retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to retrieve notifications")),
        }
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        match storage.count_unread_notifications(user.id).await {
            Ok(unread_count) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                UnreadCountResponse { unread_count },
                "Unread count retrieved",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to count unread notifications")),
        }
    }

    pub async fn mark_read(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        match storage.mark_notification_read(user.id, id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Notification marked as read",
            ))),
            Ok(false) => Ok(notification_missing()),
            Err(e) => Ok(storage_error(e, "Failed to update notification")),
        }
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        match storage.mark_all_notifications_read(user.id).await {
            Ok(updated) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                MarkedReadResponse { updated },
                "All notifications marked as read",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to update notifications")),
        }
    }

    pub async fn delete_notification(
        &self,
        id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        match storage.delete_notification(user.id, id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Notification deleted",
            ))),
            Ok(false) => Ok(notification_missing()),
            Err(e) => Ok(storage_error(e, "Failed to delete notification")),
        }
    }
}
