use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::holidays::requests::{
    CreateHolidayRequest, HolidayListQuery, UpdateHolidayRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::HolidayService;
use crate::utils::SafeIDI64;

static HOLIDAY_SERVICE: Lazy<HolidayService> = Lazy::new(HolidayService::new_lazy);

pub async fn list_holidays(
    req: HttpRequest,
    query: web::Query<HolidayListQuery>,
) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE.list_holidays(query.into_inner(), &req).await
}

pub async fn create_holiday(
    req: HttpRequest,
    holiday: web::Json<CreateHolidayRequest>,
) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE.create_holiday(holiday.into_inner(), &req).await
}

pub async fn update_holiday(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateHolidayRequest>,
) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE
        .update_holiday(id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_holiday(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    HOLIDAY_SERVICE.delete_holiday(id.0, &req).await
}

// 配置路由
pub fn configure_holiday_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/holidays")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_holidays)).route(
                    web::post()
                        .to(create_holiday)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_holiday)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_holiday)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
