use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::attendance::requests::AttendanceSummaryQuery;
use crate::services::AttendanceService;
use crate::utils::SafeIDI64;

static ATTENDANCE_SERVICE: Lazy<AttendanceService> = Lazy::new(AttendanceService::new_lazy);

pub async fn student_summary(
    req: HttpRequest,
    student_id: SafeIDI64,
    query: web::Query<AttendanceSummaryQuery>,
) -> ActixResult<HttpResponse> {
    ATTENDANCE_SERVICE
        .student_summary(student_id.0, query.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_attendance_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/attendance")
            .wrap(middlewares::RequireJWT)
            // 学生只能查看自己的出勤统计，由服务层校验
            .route("/students/{id}/summary", web::get().to(student_summary)),
    );
}
