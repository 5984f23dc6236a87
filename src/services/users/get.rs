use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserRole, responses::UserResponse},
};
use crate::services::{not_found, storage_error};

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(storage_error(e, "Failed to retrieve user")),
    };

    let admin_profile = if user.role == UserRole::Admin {
        match storage.get_admin_profile(user.id).await {
            Ok(profile) => profile,
            Err(e) => return Ok(storage_error(e, "Failed to retrieve admin profile")),
        }
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserResponse {
            user,
            admin_profile,
        },
        "User retrieved successfully",
    )))
}
