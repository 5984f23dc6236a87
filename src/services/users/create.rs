use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{
        entities::UserRole,
        requests::{CreateUserRequest, NewAdminProfile, NewUser},
        responses::UserResponse,
    },
};
use crate::errors::TutorHubError;
use crate::services::{conflict, storage_error, validation_failed};
use crate::utils::password::hash_password;
use crate::utils::validate::Validator;

pub async fn create_user(
    service: &UserService,
    user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut validator = Validator::new();
    validator
        .username("username", &user_data.username)
        .email("email", &user_data.email)
        .password("password", &user_data.password)
        .required("full_name", &user_data.full_name)
        .max_len("full_name", &user_data.full_name, 100)
        .phone("phone", user_data.phone.as_deref());
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let password_hash = match hash_password(&user_data.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(storage_error(e, "Password hashing failed")),
    };

    let storage = service.get_storage(request)?;
    let new_user = NewUser {
        username: user_data.username.trim().to_string(),
        email: user_data.email.trim().to_lowercase(),
        password_hash,
        role: UserRole::Admin,
    };
    let profile = NewAdminProfile {
        full_name: user_data.full_name.trim().to_string(),
        phone: user_data.phone,
        position: user_data.position,
    };

    match storage.create_admin_user(new_user, profile).await {
        Ok(user) => {
            info!("Admin account {} created", user.username);
            let admin_profile = storage.get_admin_profile(user.id).await.ok().flatten();
            Ok(HttpResponse::Created().json(ApiResponse::success(
                UserResponse {
                    user,
                    admin_profile,
                },
                "User created successfully",
            )))
        }
        Err(TutorHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
        )),
        Err(e) => Ok(storage_error(e, "User creation failed")),
    }
}
