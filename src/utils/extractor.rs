//! 路径参数安全提取器
//!
//! 非数字或非正数的 ID 直接返回 400，不会进入业务层。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_i64(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.parse::<i64>().ok()).filter(|v| *v > 0)
}

fn bad_path_param(name: &str) -> actix_web::Error {
    let response = HttpResponse::build(StatusCode::BAD_REQUEST).json(
        ApiResponse::<()>::error_empty(ErrorCode::BadRequest, format!("Invalid path parameter: {name}")),
    );
    InternalError::from_response(format!("invalid {name}"), response).into()
}

macro_rules! safe_path_i64 {
    ($name:ident, $param:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                ready(
                    parse_positive_i64(req.match_info().get($param))
                        .map($name)
                        .ok_or_else(|| bad_path_param($param)),
                )
            }
        }
    };
}

// `/{id}`
safe_path_i64!(SafeIDI64, "id");
// `/{id}/students/{student_id}`
safe_path_i64!(SafeStudentIdI64, "student_id");

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_parse_positive_i64() {
        assert_eq!(parse_positive_i64(Some("42")), Some(42));
        assert_eq!(parse_positive_i64(Some("0")), None);
        assert_eq!(parse_positive_i64(Some("-3")), None);
        assert_eq!(parse_positive_i64(Some("abc")), None);
        assert_eq!(parse_positive_i64(None), None);
    }

    #[actix_web::test]
    async fn test_extract_from_path() {
        let req = TestRequest::default()
            .param("id", "7")
            .param("student_id", "x")
            .to_http_request();

        let id = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id.0, 7);

        let err = SafeStudentIdI64::extract(&req).await.unwrap_err();
        assert_eq!(
            err.as_response_error().status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
