pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod fees;
pub mod frontend;
pub mod holidays;
pub mod materials;
pub mod notifications;
pub mod salaries;
pub mod schedules;
pub mod storage;
pub mod students;
pub mod subjects;
pub mod tutors;
pub mod users;

pub use announcements::configure_announcement_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use fees::configure_fee_routes;
pub use frontend::configure_frontend_routes;
pub use holidays::configure_holiday_routes;
pub use materials::configure_material_routes;
pub use notifications::configure_notification_routes;
pub use salaries::configure_salary_routes;
pub use schedules::configure_schedule_routes;
pub use storage::configure_storage_routes;
pub use students::configure_student_routes;
pub use subjects::configure_subject_routes;
pub use tutors::configure_tutor_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由，前端兜底路由必须最后注册
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_student_routes)
        .configure(configure_tutor_routes)
        .configure(configure_classes_routes)
        .configure(configure_subject_routes)
        .configure(configure_schedule_routes)
        .configure(configure_attendance_routes)
        .configure(configure_fee_routes)
        .configure(configure_salary_routes)
        .configure(configure_material_routes)
        .configure(configure_announcement_routes)
        .configure(configure_notification_routes)
        .configure(configure_holiday_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_storage_routes);
}
