use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::ApiResponse;
use crate::services::evict_cached_user;
use crate::utils::jwt::JwtUtils;

/// 处理用户登出
/// 通过设置空的 refresh_token cookie 来清除客户端的登录状态
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Some(user_id) = RequireJWT::extract_user_id(request) {
        evict_cached_user(request, user_id).await;
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logged out")))
}
