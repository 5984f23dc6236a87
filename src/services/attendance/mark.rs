use std::collections::BTreeSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AttendanceService;
use crate::models::{
    ApiResponse, ErrorCode,
    attendance::{requests::MarkAttendanceRequest, responses::AttendanceListResponse},
    schedules::entities::{Schedule, ScheduleStatus},
    users::entities::User,
};
use crate::services::{conflict, current_user, field_error, forbidden, not_found, storage_error};
use crate::storage::Storage;

/// 管理员或该课程的任课教师，否则返回对应的错误响应
async fn load_owned_schedule(
    storage: &dyn Storage,
    user: &User,
    schedule_id: i64,
) -> Result<Schedule, HttpResponse> {
    let schedule = match storage.get_schedule_by_id(schedule_id).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => return Err(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => return Err(storage_error(e, "Failed to load schedule")),
    };
    if !user.is_admin() && schedule.tutor_id != user.id {
        return Err(forbidden("Only the assigned tutor can manage attendance"));
    }
    Ok(schedule)
}

pub async fn mark_attendance(
    service: &AttendanceService,
    schedule_id: i64,
    req: MarkAttendanceRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if req.records.is_empty() {
        return Ok(field_error("records", "The records field must not be empty"));
    }

    let storage = service.get_storage(request)?;
    let schedule = match load_owned_schedule(storage.as_ref(), &user, schedule_id).await {
        Ok(schedule) => schedule,
        Err(resp) => return Ok(resp),
    };
    if schedule.status == ScheduleStatus::Cancelled {
        return Ok(conflict(
            ErrorCode::AttendanceNotAllowed,
            "Attendance cannot be recorded for a cancelled schedule",
        ));
    }

    let mut seen = BTreeSet::new();
    let mut not_enrolled = Vec::new();
    for record in &req.records {
        if !seen.insert(record.student_id) {
            return Ok(field_error(
                "records",
                format!("Student {} appears more than once", record.student_id),
            ));
        }
        match storage
            .is_student_enrolled(schedule.class_id, record.student_id)
            .await
        {
            Ok(true) => {}
            Ok(false) => not_enrolled.push(record.student_id.to_string()),
            Err(e) => return Ok(storage_error(e, "Failed to verify enrollment")),
        }
    }
    if !not_enrolled.is_empty() {
        return Ok(field_error(
            "records",
            format!(
                "Students not enrolled in this class: {}",
                not_enrolled.join(", ")
            ),
        ));
    }

    match storage
        .mark_attendance(schedule_id, user.id, req.records)
        .await
    {
        Ok(items) => {
            info!(
                "Attendance for schedule {} marked by {} ({} records)",
                schedule_id,
                user.id,
                items.len()
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                AttendanceListResponse { schedule_id, items },
                "Attendance recorded",
            )))
        }
        Err(e) => Ok(storage_error(e, "Failed to record attendance")),
    }
}

pub async fn list_attendance(
    service: &AttendanceService,
    schedule_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;
    if let Err(resp) = load_owned_schedule(storage.as_ref(), &user, schedule_id).await {
        return Ok(resp);
    }

    match storage.list_attendance(schedule_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            AttendanceListResponse { schedule_id, items },
            "Attendance retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve attendance")),
    }
}
