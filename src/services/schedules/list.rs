use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ScheduleService;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{requests::ScheduleListQuery, responses::ScheduleResponse},
    users::entities::UserRole,
};
use crate::services::{current_user, forbidden, not_found, storage_error};

/// 教师只看自己的课，学生只看所在班级的课
pub async fn list_schedules(
    service: &ScheduleService,
    mut query: ScheduleListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    match user.role {
        UserRole::Admin => {}
        UserRole::Tutor => query.tutor_id = Some(user.id),
        UserRole::Student => query.student_id = Some(user.id),
    }

    let storage = service.get_storage(request)?;
    match storage.list_schedules_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Schedule list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve schedule list")),
    }
}

pub async fn get_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let schedule = match storage.get_schedule_by_id(id).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => return Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => return Ok(storage_error(e, "Failed to retrieve schedule")),
    };

    let allowed = match user.role {
        UserRole::Admin => true,
        UserRole::Tutor => schedule.tutor_id == user.id,
        UserRole::Student => match storage.is_student_enrolled(schedule.class_id, user.id).await {
            Ok(enrolled) => enrolled,
            Err(e) => return Ok(storage_error(e, "Failed to verify enrollment")),
        },
    };
    if !allowed {
        return Ok(forbidden("You do not have access to this schedule"));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ScheduleResponse { schedule },
        "Schedule retrieved successfully",
    )))
}
