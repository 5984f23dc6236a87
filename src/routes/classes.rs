use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{
    ClassListQuery, CreateClassRequest, EnrollStudentsRequest, UpdateClassRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::ClassService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListQuery>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(query.into_inner(), &req).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(class_data.into_inner(), &req)
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(class_id.0, &req).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeIDI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(class_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(class_id.0, &req).await
}

pub async fn list_students(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_students(class_id.0, &req).await
}

pub async fn enroll_students(
    req: HttpRequest,
    class_id: SafeIDI64,
    enroll: web::Json<EnrollStudentsRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .enroll_students(class_id.0, enroll.into_inner(), &req)
        .await
}

pub async fn unenroll_student(
    req: HttpRequest,
    class_id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .unenroll_student(class_id.0, student_id.0, &req)
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                // 所有登录用户可查看班级，写操作仅管理员
                web::resource("").route(web::get().to(list_classes)).route(
                    web::post()
                        .to(create_class)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}/students")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(enroll_students)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            .service(
                web::resource("/{id}/students/{student_id}").route(
                    web::delete()
                        .to(unenroll_student)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class))
                    .route(
                        web::put()
                            .to(update_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_class)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
