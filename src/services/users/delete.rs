use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::{
    middlewares::RequireJWT,
    models::{ApiResponse, ErrorCode},
    services::{evict_cached_user, not_found, storage_error},
};

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 禁止删除当前用户
    if RequireJWT::extract_user_id(request) == Some(user_id) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::CanNotDeleteCurrentUser,
            "Cannot delete current user",
        )));
    }

    let storage = service.get_storage(request)?;

    match storage.delete_user(user_id).await {
        Ok(true) => {
            evict_cached_user(request, user_id).await;
            info!("User {} deleted", user_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(e, "User deletion failed")),
    }
}
