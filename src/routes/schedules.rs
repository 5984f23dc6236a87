use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::MarkAttendanceRequest;
use crate::models::schedules::requests::{
    CreateScheduleRequest, ScheduleListQuery, UpdateScheduleRequest, UpdateScheduleStatusRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::{AttendanceService, ScheduleService};
use crate::utils::SafeIDI64;

static SCHEDULE_SERVICE: Lazy<ScheduleService> = Lazy::new(ScheduleService::new_lazy);
static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn list_schedules(
    req: HttpRequest,
    query: web::Query<ScheduleListQuery>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.list_schedules(query.into_inner(), &req).await
}

pub async fn create_schedule(
    req: HttpRequest,
    schedule: web::Json<CreateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .create_schedule(schedule.into_inner(), &req)
        .await
}

pub async fn get_schedule(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.get_schedule(id.0, &req).await
}

pub async fn update_schedule(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateScheduleRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_schedule(id.0, update.into_inner(), &req)
        .await
}

pub async fn update_status(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateScheduleStatusRequest>,
) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE
        .update_status(id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_schedule(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SCHEDULE_SERVICE.delete_schedule(id.0, &req).await
}

pub async fn mark_attendance(
    req: HttpRequest,
    id: SafeIDI64,
    records: web::Json<MarkAttendanceRequest>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .mark_attendance(id.0, records.into_inner(), &req)
        .await
}

pub async fn list_attendance(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE.list_attendance(id.0, &req).await
}

// 配置路由
pub fn configure_schedule_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/schedules")
            .wrap(middlewares::RequireJWT)
            .service(
                // 教师只能为自己任教的科目排课，由服务层校验
                web::resource("").route(web::get().to(list_schedules)).route(
                    web::post()
                        .to(create_schedule)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::resource("/{id}/status").route(
                    web::patch()
                        .to(update_status)
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .service(
                web::scope("/{id}/attendance")
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_attendance))
                    .route("", web::post().to(mark_attendance)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_schedule))
                    .route(
                        web::put()
                            .to(update_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_schedule)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
