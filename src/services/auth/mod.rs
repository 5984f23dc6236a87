pub mod login;
pub mod logout;
pub mod profile;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::auth::requests::{ChangePasswordRequest, LoginRequest};

super::lazy_service! {
    /// 登录、令牌刷新与个人信息
    AuthService
}

impl AuthService {
    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        logout::handle_logout(request).await
    }

    // 当前用户及角色档案
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        profile::handle_me(self, request).await
    }

    pub async fn change_password(
        &self,
        change: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        profile::handle_change_password(self, change, request).await
    }
}
