use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::config::AppConfig;
use crate::models::{ApiResponse, ErrorCode, auth::responses::RefreshTokenResponse};
use crate::services::storage_error;
use crate::utils::jwt::JwtUtils;

use super::AuthService;

fn invalid_refresh(message: &str) -> HttpResponse {
    // 清除无效的 refresh token cookie
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(
            ErrorCode::RefreshTokenInvalid,
            message,
        ))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = JwtUtils::extract_refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::RefreshTokenMissing,
            "Refresh token is missing, please login",
        )));
    };

    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            info!("Refresh token rejected: {}", e);
            return Ok(invalid_refresh(
                "Login expired or invalid, please login again",
            ));
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Ok(invalid_refresh("Invalid refresh token"));
    };

    // 账号被停用或删除后 refresh token 作废
    let storage = service.get_storage(request)?;
    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.is_active() => user,
        Ok(_) => return Ok(invalid_refresh("Account is no longer available")),
        Err(e) => return Ok(storage_error(e, "Token refresh failed")),
    };

    match JwtUtils::generate_access_token(user.id, user.role.as_str()) {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: AppConfig::get().jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to issue access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Token refresh failed",
                )),
            )
        }
    }
}
