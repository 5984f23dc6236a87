pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod fees;
pub mod holidays;
pub mod materials;
pub mod notifications;
pub mod salaries;
pub mod schedules;
pub mod students;
pub mod subjects;
pub mod tutors;
pub mod uploads;
pub mod users;

pub use announcements::AnnouncementService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use fees::FeeService;
pub use holidays::HolidayService;
pub use materials::MaterialService;
pub use notifications::NotificationService;
pub use salaries::SalaryService;
pub use schedules::ScheduleService;
pub use students::StudentService;
pub use subjects::SubjectService;
pub use tutors::TutorService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{error, warn};

use crate::cache::ObjectCache;
use crate::errors::TutorHubError;
use crate::middlewares::{RequireJWT, user_cache_key};
use crate::models::{
    ApiResponse, ErrorCode, FieldErrors,
    notifications::entities::{NewNotification, NotificationKind},
    users::entities::User,
};
use crate::sms::{LogSmsSender, SmsSender, send_batch};
use crate::storage::Storage;

/// 声明一个按需从 app data 取存储的服务
macro_rules! lazy_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> actix_web::Result<std::sync::Arc<dyn $crate::storage::Storage>> {
                match &self.storage {
                    Some(storage) => Ok(storage.clone()),
                    None => $crate::services::storage_from_request(request),
                }
            }
        }
    };
}
pub(crate) use lazy_service;

pub(crate) fn storage_from_request(request: &HttpRequest) -> actix_web::Result<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage is not registered in app data");
            actix_web::error::ErrorInternalServerError("Storage unavailable")
        })
}

/// 未注册短信发送器时退化为只记录日志
pub(crate) fn sms_from_request(request: &HttpRequest) -> Arc<dyn SmsSender> {
    request
        .app_data::<web::Data<Arc<dyn SmsSender>>>()
        .map(|data| data.get_ref().clone())
        .unwrap_or_else(|| Arc::new(LogSmsSender))
}

/// 账号变更后清理认证缓存
pub(crate) async fn evict_cached_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = request.app_data::<web::Data<Arc<dyn ObjectCache>>>() {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

/// 为一批用户写入同一条站内通知，失败只记录日志
pub(crate) async fn notify_users(
    storage: &Arc<dyn Storage>,
    user_ids: &[i64],
    kind: NotificationKind,
    title: &str,
    message: &str,
) -> u64 {
    let items = user_ids
        .iter()
        .map(|&user_id| NewNotification {
            user_id,
            announcement_id: None,
            kind,
            title: title.to_string(),
            message: message.to_string(),
        })
        .collect();
    match storage.create_notifications(items).await {
        Ok(created) => created,
        Err(e) => {
            warn!("Failed to create {} notifications: {}", kind, e);
            0
        }
    }
}

/// 给一批用户发短信（学生优先发给监护人），返回成功条数
pub(crate) async fn sms_users(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
    user_ids: &[i64],
    message: &str,
) -> u64 {
    let contacts = match storage.list_contacts(user_ids).await {
        Ok(contacts) => contacts,
        Err(e) => {
            warn!("Failed to load SMS contacts: {}", e);
            return 0;
        }
    };
    let sender = sms_from_request(request);
    send_batch(
        sender.as_ref(),
        contacts
            .iter()
            .filter_map(|c| c.sms_target())
            .map(|to| (to, message)),
    )
    .await
}

/// 当前登录用户，缺失时返回 401 响应
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user_claims(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        ))
    })
}

pub(crate) fn validation_failed(errors: FieldErrors) -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(ApiResponse::validation(errors))
}

pub(crate) fn field_error(field: &str, message: impl Into<String>) -> HttpResponse {
    validation_failed(FieldErrors::single(field, message))
}

pub(crate) fn not_found(code: ErrorCode, message: &str) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(message: &str) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

/// 存储层错误到 HTTP 响应
///
/// 唯一约束 409，外键/校验 422，找不到 404，其余记录日志后 500。
pub(crate) fn storage_error(err: TutorHubError, context: &str) -> HttpResponse {
    match err {
        TutorHubError::Conflict(msg) => conflict(ErrorCode::Conflict, msg),
        TutorHubError::Constraint(msg) => HttpResponse::UnprocessableEntity().json(
            ApiResponse::error_empty(ErrorCode::ValidationFailed, format!("{context}: {msg}")),
        ),
        TutorHubError::Validation(msg) | TutorHubError::DateParse(msg) => HttpResponse::UnprocessableEntity()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)),
        TutorHubError::NotFound(msg) => not_found(ErrorCode::NotFound, &msg),
        other => {
            error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", other.message()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_storage_error_status_mapping() {
        let cases = [
            (TutorHubError::conflict("dup"), StatusCode::CONFLICT),
            (TutorHubError::constraint("fk"), StatusCode::UNPROCESSABLE_ENTITY),
            (TutorHubError::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (TutorHubError::not_found("gone"), StatusCode::NOT_FOUND),
            (
                TutorHubError::database_operation("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(storage_error(err, "test").status(), status);
        }
    }
}
