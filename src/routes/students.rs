use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::students::requests::{
    CreateStudentRequest, StudentListQuery, UpdateStudentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListQuery>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(query.into_inner(), &req).await
}

pub async fn create_student(
    req: HttpRequest,
    student: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.create_student(student.into_inner(), &req).await
}

pub async fn get_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(id.0, &req).await
}

pub async fn update_student(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_student(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(id.0, &req).await
}

pub async fn upload_photo(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.upload_photo(id.0, payload, &req).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 学生本人也可以查看自己、上传自己的照片，具体权限在服务层判断
            .route(
                "/{id}/photo",
                web::post().to(upload_photo).wrap(RateLimit::file_upload()),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_student))
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
