use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::ScheduleService;
use crate::models::{
    ApiResponse, ErrorCode,
    notifications::entities::NotificationKind,
    schedules::{
        entities::{Schedule, ScheduleStatus},
        requests::UpdateScheduleStatusRequest,
        responses::ScheduleResponse,
    },
};
use crate::services::{conflict, current_user, forbidden, not_found, notify_users, storage_error};
use crate::storage::Storage;

fn invalid_transition(from: ScheduleStatus, to: ScheduleStatus) -> HttpResponse {
    conflict(
        ErrorCode::InvalidStatusTransition,
        format!("Cannot change schedule status from {from} to {to}"),
    )
}

/// upcoming -> completed | cancelled，其余转换返回 409
pub async fn update_status(
    service: &ScheduleService,
    id: i64,
    req: UpdateScheduleStatusRequest,
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
        return Ok(forbidden("You can only update your own schedules"));
    }
    if !existing.status.can_transition_to(req.status) {
        return Ok(invalid_transition(existing.status, req.status));
    }

    let schedule = match storage
        .update_schedule_status(id, existing.status, req.status)
        .await
    {
        Ok(Some(schedule)) => schedule,
        // 并发修改：状态已不是读取时的值
        Ok(None) => return Ok(invalid_transition(existing.status, req.status)),
        Err(e) => return Ok(storage_error(e, "Failed to update schedule status")),
    };
    info!("Schedule {} marked {}", schedule.id, schedule.status);

    if schedule.status == ScheduleStatus::Cancelled {
        notify_cancellation(&storage, &schedule).await;
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ScheduleResponse { schedule },
        "Schedule status updated",
    )))
}

async fn notify_cancellation(storage: &Arc<dyn Storage>, schedule: &Schedule) {
    let students = match storage.list_class_students(schedule.class_id).await {
        Ok(students) => students,
        Err(e) => {
            warn!("Failed to load students for schedule {}: {}", schedule.id, e);
            return;
        }
    };
    let ids: Vec<i64> = students.iter().map(|s| s.student_id).collect();
    let subject = storage
        .get_subject_by_id(schedule.subject_id)
        .await
        .ok()
        .flatten()
        .map(|s| s.name)
        .unwrap_or_else(|| "Class".to_string());

    let message = format!(
        "{} on {} at {} has been cancelled.",
        subject,
        schedule.schedule_date,
        schedule.start_time.format("%H:%M")
    );
    notify_users(
        storage,
        &ids,
        NotificationKind::Schedule,
        "Class cancelled",
        &message,
    )
    .await;
}
