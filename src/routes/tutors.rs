use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::tutors::requests::{CreateTutorRequest, TutorListQuery, UpdateTutorRequest};
use crate::models::users::entities::UserRole;
use crate::services::TutorService;
use crate::utils::SafeIDI64;

static TUTOR_SERVICE: Lazy<TutorService> = Lazy::new(TutorService::new_lazy);

pub async fn list_tutors(
    req: HttpRequest,
    query: web::Query<TutorListQuery>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.list_tutors(query.into_inner(), &req).await
}

pub async fn create_tutor(
    req: HttpRequest,
    tutor: web::Json<CreateTutorRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.create_tutor(tutor.into_inner(), &req).await
}

pub async fn get_tutor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.get_tutor(id.0, &req).await
}

pub async fn update_tutor(
    req: HttpRequest,
    id: SafeIDI64,
    update: web::Json<UpdateTutorRequest>,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE
        .update_tutor(id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_tutor(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.delete_tutor(id.0, &req).await
}

pub async fn upload_photo(
    req: HttpRequest,
    id: SafeIDI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    TUTOR_SERVICE.upload_photo(id.0, payload, &req).await
}

// 配置路由
pub fn configure_tutor_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/tutors")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_tutors)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    )
                    .route(
                        web::post()
                            .to(create_tutor)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            )
            // 教师本人可以查看自己、上传自己的照片，具体权限在服务层判断
            .route(
                "/{id}/photo",
                web::post().to(upload_photo).wrap(RateLimit::file_upload()),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_tutor))
                    .route(
                        web::put()
                            .to(update_tutor)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        web::delete()
                            .to(delete_tutor)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
