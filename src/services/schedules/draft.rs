//! 创建与修改共用的排课校验

use std::sync::Arc;

use actix_web::HttpResponse;

use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    schedules::entities::ScheduleDraft,
    users::entities::{User, UserRole},
};
use crate::services::{conflict, field_error, forbidden, storage_error};
use crate::storage::Storage;

/// 校验通过返回可写入的 draft，否则返回错误响应
///
/// 依次检查：时间先后、班级与科目归属、任课教师、操作者权限、节假日。
pub async fn check_draft(
    storage: &Arc<dyn Storage>,
    actor: &User,
    draft: ScheduleDraft,
    requested_tutor: Option<i64>,
) -> Result<ScheduleDraft, HttpResponse> {
    let mut draft = draft;

    if draft.start_time >= draft.end_time {
        return Err(field_error(
            "end_time",
            "The end_time must be later than start_time",
        ));
    }

    let subject = match storage.get_subject_by_id(draft.subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => return Err(field_error("subject_id", "The selected subject_id is invalid")),
        Err(e) => return Err(storage_error(e, "Failed to verify subject")),
    };
    if subject.class_id != draft.class_id {
        return Err(field_error(
            "subject_id",
            "The subject does not belong to the selected class",
        ));
    }

    // 未指定教师时沿用科目的任课教师
    let Some(tutor_id) = requested_tutor.or(subject.tutor_id) else {
        return Err(field_error(
            "tutor_id",
            "The tutor_id field is required when the subject has no tutor",
        ));
    };
    match storage.get_user_by_id(tutor_id).await {
        Ok(Some(user)) if user.role == UserRole::Tutor && user.is_active() => {}
        Ok(_) => return Err(field_error("tutor_id", "The selected tutor_id is not an active tutor")),
        Err(e) => return Err(storage_error(e, "Failed to verify tutor")),
    }
    draft.tutor_id = tutor_id;

    // 教师只能给自己任课的科目排自己的课
    if actor.role == UserRole::Tutor && (subject.tutor_id != Some(actor.id) || tutor_id != actor.id)
    {
        return Err(forbidden("Tutors can only schedule their own subjects"));
    }

    match storage.get_holiday_by_date(draft.schedule_date).await {
        Ok(Some(holiday)) => {
            return Err(HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
                ErrorCode::ScheduleOnHoliday,
                format!("{} is a holiday ({})", draft.schedule_date, holiday.title),
            )));
        }
        Ok(None) => {}
        Err(e) => return Err(storage_error(e, "Failed to check holidays")),
    }

    Ok(draft)
}

/// 存储层的时间冲突映射为 409
pub fn write_error(err: TutorHubError, context: &str) -> HttpResponse {
    match err {
        TutorHubError::Conflict(msg) => conflict(ErrorCode::ScheduleConflict, msg),
        other => storage_error(other, context),
    }
}
