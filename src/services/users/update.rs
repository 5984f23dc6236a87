use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserStatus, requests::UpdateUserStatusRequest, responses::UserResponse},
};
use crate::services::{evict_cached_user, not_found, storage_error};

pub async fn update_status(
    service: &UserService,
    user_id: i64,
    update: UpdateUserStatusRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 不能停用自己
    if update.status == UserStatus::Inactive && RequireJWT::extract_user_id(request) == Some(user_id)
    {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot deactivate the current user",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.update_user_status(user_id, update.status).await {
        Ok(Some(user)) => {
            evict_cached_user(request, user_id).await;
            info!("User {} status changed to {}", user.username, user.status);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UserResponse {
                    user,
                    admin_profile: None,
                },
                "User status updated",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(e, "Failed to update user status")),
    }
}
