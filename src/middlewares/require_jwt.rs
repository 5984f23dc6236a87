/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，并把当前用户写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/v1/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 * ```
 *
 * 处理函数中通过 [`RequireJWT::extract_user_claims`] 取得当前用户。
 *
 * ## 认证流程
 *
 * 1. 验证 token 签名、过期时间与类型（必须是 access token）
 * 2. 优先从缓存读取用户（键为 `user:{id}`），否则查库并回填缓存
 * 3. 被停用的用户一律返回 401
 */

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::middlewares::{create_error_response, user_cache_key};
use crate::models::ErrorCode;
use crate::models::users::entities::{self, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";

#[derive(Clone)]
pub struct RequireJWT;

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// 提取并验证 access token，返回当前用户
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<entities::User, String> {
    let token =
        bearer_token(req).ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone());

    if let Some(ref cache) = cache {
        match cache.get_json::<entities::User>(&user_cache_key(user_id)).await {
            CacheResult::Found(user) if user.is_active() => return Ok(user),
            CacheResult::Found(_) => return Err("User is not active".to_string()),
            _ => debug!("User {} not found in cache", user_id),
        }
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage is not registered in app data");
            "Authentication backend unavailable".to_string()
        })?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user {} for authentication: {}", user_id, e);
            "Failed to retrieve user from storage".to_string()
        })?
        .ok_or_else(|| "User not found".to_string())?;

    if !user.is_active() {
        return Err("User is not active".to_string());
    }

    if let Some(cache) = cache {
        cache
            .insert_json(
                user_cache_key(user_id),
                &user,
                AppConfig::get().cache.default_ttl,
            )
            .await;
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中取当前用户，需在 RequireJWT 之后调用
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<entities::User> {
        req.extensions().get::<entities::User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<entities::User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions()
            .get::<entities::User>()
            .map(|user| user.role.clone())
    }
}
