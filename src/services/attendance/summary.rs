use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::requests::AttendanceSummaryQuery,
    users::entities::UserRole,
};
use crate::services::{current_user, field_error, forbidden, not_found, storage_error};

/// 只统计已完成课程的考勤；学生只能看自己的
pub async fn student_summary(
    service: &AttendanceService,
    student_id: i64,
    query: AttendanceSummaryQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role == UserRole::Student && user.id != student_id {
        return Ok(forbidden("You can only view your own attendance"));
    }
    if let (Some(from), Some(to)) = (query.date_from, query.date_to)
        && from > to
    {
        return Ok(field_error(
            "date_to",
            "The date_to must be on or after date_from",
        ));
    }

    let storage = service.get_storage(request)?;
    match storage.get_user_by_id(student_id).await {
        Ok(Some(student)) if student.role == UserRole::Student => {}
        Ok(_) => return Ok(not_found(ErrorCode::StudentNotFound, "Student not found")),
        Err(e) => return Ok(storage_error(e, "Failed to load student")),
    }

    match storage.attendance_summary(student_id, query).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Attendance summary retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to compute attendance summary")),
    }
}
