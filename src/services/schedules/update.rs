use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{ScheduleService, draft};
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::{
        entities::{ScheduleDraft, ScheduleStatus},
        requests::UpdateScheduleRequest,
        responses::ScheduleResponse,
    },
};
use crate::services::{conflict, current_user, forbidden, not_found, storage_error};

pub async fn update_schedule(
    service: &ScheduleService,
    id: i64,
    req: UpdateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let existing = match storage.get_schedule_by_id(id).await {
        Ok(Some(schedule)) => schedule,
        Ok(None) => return Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => return Ok(storage_error(e, "Failed to load schedule")),
    };
    if !user.is_admin() && existing.tutor_id != user.id {
        return Ok(forbidden("You can only edit your own schedules"));
    }
    if existing.status != ScheduleStatus::Upcoming {
        return Ok(conflict(
            ErrorCode::InvalidStatusTransition,
            format!("Only upcoming schedules can be edited (current: {})", existing.status),
        ));
    }

    // 更换科目且未指定教师时，重新取新科目的任课教师
    let requested_tutor = match (req.tutor_id, req.subject_id) {
        (Some(tutor_id), _) => Some(tutor_id),
        (None, Some(subject_id)) if subject_id != existing.subject_id => None,
        (None, _) => Some(existing.tutor_id),
    };
    let candidate = ScheduleDraft {
        class_id: existing.class_id,
        subject_id: req.subject_id.unwrap_or(existing.subject_id),
        tutor_id: existing.tutor_id,
        schedule_date: req.schedule_date.unwrap_or(existing.schedule_date),
        start_time: req.start_time.unwrap_or(existing.start_time),
        end_time: req.end_time.unwrap_or(existing.end_time),
        room: req.room.or(existing.room),
        notes: req.notes.or(existing.notes),
    };
    let checked = match draft::check_draft(&storage, &user, candidate, requested_tutor).await {
        Ok(checked) => checked,
        Err(resp) => return Ok(resp),
    };

    match storage.update_schedule(id, checked).await {
        Ok(Some(schedule)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ScheduleResponse { schedule },
            "Schedule updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => Ok(draft::write_error(e, "Schedule update failed")),
    }
}

pub async fn delete_schedule(
    service: &ScheduleService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_schedule(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
            "Schedule deleted successfully",
        ))),
        Ok(false) => Ok(not_found(ErrorCode::ScheduleNotFound, "Schedule not found")),
        Err(e) => Ok(storage_error(e, "Schedule deletion failed")),
    }
}
