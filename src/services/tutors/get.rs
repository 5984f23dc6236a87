use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TutorService;
use crate::models::{
    ApiResponse, ErrorCode,
    tutors::{requests::TutorListQuery, responses::TutorResponse},
};
use crate::services::{current_user, forbidden, not_found, storage_error};

pub async fn list_tutors(
    service: &TutorService,
    query: TutorListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_tutors_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Tutor list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve tutor list")),
    }
}

// 管理员或教师本人
pub async fn get_tutor(
    service: &TutorService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if !user.is_admin() && user.id != id {
        return Ok(forbidden("You can only view your own record"));
    }

    let storage = service.get_storage(request)?;
    match storage.get_tutor(id).await {
        Ok(Some(tutor)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TutorResponse { tutor },
            "Tutor retrieved successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::TutorNotFound, "Tutor not found")),
        Err(e) => Ok(storage_error(e, "Failed to retrieve tutor")),
    }
}
