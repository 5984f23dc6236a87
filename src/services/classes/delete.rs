use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::ClassService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{not_found, storage_error};

// 科目、课程、选课关系随班级级联删除
pub async fn delete_class(
    service: &ClassService,
    class_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted", class_id);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error(e, "Class deletion failed")),
    }
}
