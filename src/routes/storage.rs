//! 照片与资料的静态访问
//!
//! 文件名是随机 UUID，不需要登录即可访问；资料的带原文件名下载走
//! `/api/v1/materials/{id}/download`。

use actix_web::{HttpResponse, Result as ActixResult, web};

use crate::services::uploads;

pub async fn serve_file(path: web::Path<(String, String)>) -> ActixResult<HttpResponse> {
    let (kind, file) = path.into_inner();
    uploads::serve_stored(&kind, &file, None)
}

pub fn configure_storage_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/storage/{kind}/{file}", web::get().to(serve_file));
}
