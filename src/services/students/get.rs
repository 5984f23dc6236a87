use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{StudentService, can_view_student};
use crate::models::{
    ApiResponse, ErrorCode,
    students::{requests::StudentListQuery, responses::StudentResponse},
};
use crate::services::{current_user, forbidden, not_found, storage_error};

pub async fn list_students(
    service: &StudentService,
    query: StudentListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_students_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Student list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve student list")),
    }
}

pub async fn get_student(
    service: &StudentService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !can_view_student(&user, id) {
        return Ok(forbidden("You can only view your own record"));
    }

    let storage = service.get_storage(request)?;
    match storage.get_student(id).await {
        Ok(Some(student)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentResponse { student },
            "Student retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => Ok(storage_error(e, "Failed to retrieve student")),
    }
}
