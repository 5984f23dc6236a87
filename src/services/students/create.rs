use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::StudentService;
use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::CreateStudentRequest, responses::StudentResponse},
    users::{entities::UserRole, requests::NewUser},
};
use crate::services::{conflict, storage_error, validation_failed};
use crate::utils::password::hash_password;
use crate::utils::validate::Validator;

pub async fn create_student(
    service: &StudentService,
    mut req: CreateStudentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let mut validator = Validator::new();
    validator
        .username("username", &req.username)
        .email("email", &req.email)
        .password("password", &req.password)
        .required("full_name", &req.full_name)
        .max_len("full_name", &req.full_name, 100)
        .phone("phone", req.phone.as_deref())
        .phone("guardian_phone", req.guardian_phone.as_deref());
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let password_hash = match hash_password(&req.password) {
        Ok(hash) => hash,
        Err(e) => return Ok(storage_error(e, "Password hashing failed")),
    };
    let new_user = NewUser {
        username: req.username.trim().to_string(),
        email: req.email.trim().to_lowercase(),
        password_hash,
        role: UserRole::Student,
    };
    req.full_name = req.full_name.trim().to_string();

    let storage = service.get_storage(request)?;
    match storage.create_student(new_user, req).await {
        Ok(student) => {
            info!("Student {} created", student.user.username);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                StudentResponse { student },
                "Student created successfully",
            )))
        }
        Err(TutorHubError::Conflict(_)) => Ok(conflict(
            ErrorCode::UserAlreadyExists,
            "Username or email already exists",
        )),
        Err(e) => Ok(storage_error(e, "Student creation failed")),
    }
}
