use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::materials::requests::MaterialListQuery;
use crate::models::users::entities::UserRole;
use crate::services::MaterialService;
use crate::utils::SafeIDI64;

static MATERIAL_SERVICE: Lazy<MaterialService> = Lazy::new(MaterialService::new_lazy);

pub async fn upload_material(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.upload_material(payload, &req).await
}

pub async fn list_materials(
    req: HttpRequest,
    query: web::Query<MaterialListQuery>,
) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.list_materials(query.into_inner(), &req).await
}

pub async fn get_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.get_material(id.0, &req).await
}

pub async fn download_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.download_material(id.0, &req).await
}

pub async fn delete_material(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    MATERIAL_SERVICE.delete_material(id.0, &req).await
}

// 配置路由
pub fn configure_material_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/materials")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("").route(web::get().to(list_materials)).route(
                    web::post()
                        .to(upload_material)
                        .wrap(RateLimit::file_upload())
                        .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                ),
            )
            .route("/{id}/download", web::get().to(download_material))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_material))
                    .route(
                        web::delete()
                            .to(delete_material)
                            .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
                    ),
            ),
    );
}
