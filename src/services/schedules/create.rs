use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ScheduleService, draft};
use crate::models::{
    ApiResponse,
    schedules::{
        entities::ScheduleDraft, requests::CreateScheduleRequest, responses::ScheduleResponse,
    },
};
use crate::services::current_user;

pub async fn create_schedule(
    service: &ScheduleService,
    req: CreateScheduleRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let requested_tutor = req.tutor_id;
    let candidate = ScheduleDraft {
        class_id: req.class_id,
        subject_id: req.subject_id,
        tutor_id: req.tutor_id.unwrap_or_default(),
        schedule_date: req.schedule_date,
        start_time: req.start_time,
        end_time: req.end_time,
        room: req.room,
        notes: req.notes,
    };
    let checked = match draft::check_draft(&storage, &user, candidate, requested_tutor).await {
        Ok(checked) => checked,
        Err(resp) => return Ok(resp),
    };

    match storage.create_schedule(checked).await {
        Ok(schedule) => {
            info!(
                "Schedule {} created for class {} on {}",
                schedule.id, schedule.class_id, schedule.schedule_date
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                ScheduleResponse { schedule },
                "Schedule created successfully",
            )))
        }
        Err(e) => Ok(draft::write_error(e, "Schedule creation failed")),
    }
}
