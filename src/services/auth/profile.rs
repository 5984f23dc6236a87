use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::ChangePasswordRequest, responses::MeResponse},
    users::entities::UserRole,
};
use crate::services::{
    current_user, evict_cached_user, not_found, storage_error, validation_failed,
};
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validate::Validator;

use super::AuthService;

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let mut response = MeResponse {
        user,
        admin_profile: None,
        tutor_profile: None,
        student_profile: None,
    };

    let loaded = match response.user.role {
        UserRole::Admin => storage
            .get_admin_profile(response.user.id)
            .await
            .map(|p| response.admin_profile = p),
        UserRole::Tutor => storage
            .get_tutor_profile(response.user.id)
            .await
            .map(|p| response.tutor_profile = p),
        UserRole::Student => storage
            .get_student_profile(response.user.id)
            .await
            .map(|p| response.student_profile = p),
    };
    if let Err(e) = loaded {
        return Ok(storage_error(e, "Failed to load profile"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "User information retrieved")))
}

pub async fn handle_change_password(
    service: &AuthService,
    change: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    // 缓存中的用户不带密码哈希，需重新查库
    let stored = match storage.get_user_by_id(user.id).await {
        Ok(Some(stored)) => stored,
        Ok(None) => return Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => return Ok(storage_error(e, "Failed to load user")),
    };

    if !verify_password(&change.current_password, &stored.password_hash) {
        return Ok(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
            ErrorCode::AuthFailed,
            "Current password is incorrect",
        )));
    }

    let mut validator = Validator::new();
    validator.password("new_password", &change.new_password).check(
        change.new_password != change.current_password,
        "new_password",
        "The new password must differ from the current password",
    );
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let password_hash = match hash_password(&change.new_password) {
        Ok(hash) => hash,
        Err(e) => return Ok(storage_error(e, "Password hashing failed")),
    };

    match storage.update_user_password(user.id, password_hash).await {
        Ok(true) => {
            evict_cached_user(request, user.id).await;
            info!("User {} changed password", user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password updated")))
        }
        Ok(false) => Ok(not_found(ErrorCode::UserNotFound, "User not found")),
        Err(e) => Ok(storage_error(e, "Failed to update password")),
    }
}
