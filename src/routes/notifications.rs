use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::notifications::requests::NotificationListQuery;
use crate::services::NotificationService;
use crate::utils::SafeIDI64;

static NOTIFICATION_SERVICE: Lazy<NotificationService> =
    Lazy::new(NotificationService::new_lazy);

pub async fn list_notifications(
    req: HttpRequest,
    query: web::Query<NotificationListQuery>,
) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE
        .list_notifications(query.into_inner(), &req)
        .await
}

pub async fn unread_count(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.unread_count(&req).await
}

pub async fn mark_read(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_read(id.0, &req).await
}

pub async fn mark_all_read(req: HttpRequest) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.mark_all_read(&req).await
}

pub async fn delete_notification(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    NOTIFICATION_SERVICE.delete_notification(id.0, &req).await
}

// 配置路由，固定路径需在 /{id} 之前注册
pub fn configure_notification_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notifications")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_notifications))
            .route("/unread-count", web::get().to(unread_count))
            .route("/read-all", web::patch().to(mark_all_read))
            .route("/{id}/read", web::patch().to(mark_read))
            .route("/{id}", web::delete().to(delete_notification)),
    );
}
