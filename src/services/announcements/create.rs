use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AnnouncementService;
use crate::models::{
    ApiResponse,
    announcements::{
        entities::Audience, requests::CreateAnnouncementRequest, responses::AnnouncementResponse,
    },
    users::entities::UserRole,
};
use crate::services::{
    current_user, field_error, forbidden, sms_users, storage_error, validation_failed,
};
use crate::utils::validate::Validator;

/// 解析收件人 -> 写入公告与通知（同一事务）-> 可选短信
pub async fn create_announcement(
    service: &AnnouncementService,
    mut req: CreateAnnouncementRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    req.title = req.title.trim().to_string();
    req.message = req.message.trim().to_string();
    let mut validator = Validator::new();
    validator
        .required("title", &req.title)
        .max_len("title", &req.title, 200)
        .required("message", &req.message)
        .max_len("message", &req.message, 2000);
    if let Err(errors) = validator.finish() {
        return Ok(validation_failed(errors));
    }

    let storage = service.get_storage(request)?;

    if let Some(class_id) = req.class_id {
        match storage.get_class_by_id(class_id).await {
            Ok(Some(_)) => {}
            Ok(None) => return Ok(field_error("class_id", "The selected class_id is invalid")),
            Err(e) => return Ok(storage_error(e, "Failed to verify class")),
        }
    }

    // 教师只能向自己任课的班级发布
    if user.role == UserRole::Tutor {
        let Some(class_id) = req.class_id else {
            return Ok(forbidden("Tutors must target a class they teach"));
        };
        match storage.tutor_teaches_class(user.id, class_id).await {
            Ok(true) => {}
            Ok(false) => return Ok(forbidden("You do not teach this class")),
            Err(e) => return Ok(storage_error(e, "Failed to verify class")),
        }
    }

    let recipients = match storage.resolve_audience(req.audience, req.class_id).await {
        Ok(recipients) => recipients,
        Err(e) => return Ok(storage_error(e, "Failed to resolve recipients")),
    };

    let sms_text = format!("{}: {}", req.title, req.message);
    let send_sms = req.send_sms;
    let audience: Audience = req.audience;
    let announcement = match storage
        .create_announcement(req, user.id, &recipients)
        .await
    {
        Ok(announcement) => announcement,
        Err(e) => return Ok(storage_error(e, "Failed to create announcement")),
    };
    info!(
        "Announcement {} to {} sent to {} recipients",
        announcement.id,
        audience,
        recipients.len()
    );

    let sms_sent = if send_sms && !recipients.is_empty() {
        sms_users(request, &storage, &recipients, &sms_text).await
    } else {
        0
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(
        AnnouncementResponse {
            announcement,
            sms_sent,
        },
        "Announcement published",
    )))
}
