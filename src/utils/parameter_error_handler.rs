use actix_web::{
    HttpRequest, HttpResponse,
    error::{InternalError, JsonPayloadError, QueryPayloadError},
};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

/// JSON 请求体错误处理
///
/// 语法错误返回 400，结构正确但字段缺失或类型不符返回 422。
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("JSON payload error on {}: {}", req.path(), err);

    let response = match &err {
        JsonPayloadError::Deserialize(de) if de.is_data() => HttpResponse::UnprocessableEntity()
            .json(ApiResponse::<()>::error_empty(
                ErrorCode::ValidationFailed,
                format!("Invalid request body: {de}"),
            )),
        JsonPayloadError::ContentType => HttpResponse::UnsupportedMediaType().json(
            ApiResponse::<()>::error_empty(ErrorCode::BadRequest, "Content-Type must be application/json"),
        ),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            HttpResponse::PayloadTooLarge().json(ApiResponse::<()>::error_empty(
                ErrorCode::BadRequest,
                "Request body is too large",
            ))
        }
        _ => HttpResponse::BadRequest().json(ApiResponse::<()>::error_empty(
            ErrorCode::BadRequest,
            format!("Malformed JSON: {err}"),
        )),
    };

    InternalError::from_response(err, response).into()
}

/// 查询参数错误处理
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("Query error on {}: {}", req.path(), err);

    let response = HttpResponse::UnprocessableEntity().json(ApiResponse::<()>::error_empty(
        ErrorCode::ValidationFailed,
        format!("Invalid query parameters: {err}"),
    ));

    InternalError::from_response(err, response).into()
}
