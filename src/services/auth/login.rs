use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::storage_error;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;

use super::AuthService;

fn auth_failed() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::AuthFailed,
        "Username or password is incorrect",
    ))
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let config = AppConfig::get();

    // 1. 根据用户名或邮箱获取用户信息
    let user = match storage
        .get_user_by_username_or_email(login_request.username.trim())
        .await
    {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(auth_failed()),
        Err(e) => return Ok(storage_error(e, "Login failed")),
    };

    // 2. 验证密码
    if !verify_password(&login_request.password, &user.password_hash) {
        return Ok(auth_failed());
    }

    // 3. 停用账号不允许登录
    if !user.is_active() {
        warn!("Inactive user {} attempted to login", user.username);
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is inactive",
        )));
    }

    // 4. 生成令牌对
    let refresh_days = if login_request.remember_me {
        config.jwt.refresh_token_remember_me_expiry
    } else {
        config.jwt.refresh_token_expiry
    };
    let token_pair = match user.generate_token_pair(Some(chrono::Duration::days(refresh_days))) {
        Ok(pair) => pair,
        Err(e) => {
            error!("Failed to generate JWT token: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            );
        }
    };

    // 5. 更新最后登录时间，失败不影响登录
    if let Err(e) = storage.update_last_login(user.id).await {
        warn!("Failed to update last login for {}: {}", user.id, e);
    }

    info!("User {} logged in successfully", user.username);

    let refresh_cookie = JwtUtils::create_refresh_token_cookie(&token_pair.refresh_token, refresh_days);
    let response = LoginResponse {
        access_token: token_pair.access_token,
        expires_in: config.jwt.access_token_expiry * 60,
        user,
        created_at: chrono::Utc::now(),
    };

    Ok(HttpResponse::Ok()
        .cookie(refresh_cookie)
        .json(ApiResponse::success(response, "Login successful")))
}
