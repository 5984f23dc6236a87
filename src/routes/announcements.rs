use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::announcements::requests::{AnnouncementListQuery, CreateAnnouncementRequest};
use crate::models::users::entities::UserRole;
use crate::services::AnnouncementService;
use crate::utils::SafeIDI64;

static ANNOUNCEMENT_SERVICE: Lazy<AnnouncementService> =
    Lazy::new(AnnouncementService::new_lazy);

pub async fn create_announcement(
    req: HttpRequest,
    announcement: web::Json<CreateAnnouncementRequest>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .create_announcement(announcement.into_inner(), &req)
        .await
}

pub async fn list_announcements(
    req: HttpRequest,
    query: web::Query<AnnouncementListQuery>,
) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE
        .list_announcements(query.into_inner(), &req)
        .await
}

pub async fn delete_announcement(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ANNOUNCEMENT_SERVICE.delete_announcement(id.0, &req).await
}

// 配置路由
pub fn configure_announcement_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/announcements")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_announcements))
                    .route(
                        web::post()
                            .to(create_announcement)
                            // 教师只能向自己任教的班级发布，由服务层校验
                            .wrap(RateLimit::announcement())
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            )
            .service(
                web::resource("/{id}").route(
                    web::delete()
                        .to(delete_announcement)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            ),
    );
}
