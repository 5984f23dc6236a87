pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::users::requests::{CreateUserRequest, UpdateUserStatusRequest, UserListQuery};

super::lazy_service! {
    /// 账号管理（仅管理员）
    UserService
}

impl UserService {
    // 获取用户列表
    pub async fn list_users(
        &self,
        query: UserListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_users(self, query, request).await
    }

    // 创建管理员账号
    pub async fn create_user(
        &self,
        user_data: CreateUserRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_user(self, user_data, request).await
    }

    // 根据ID获取用户
    pub async fn get_user(&self, user_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_user(self, user_id, request).await
    }

    // 启用/停用账号
    pub async fn update_status(
        &self,
        user_id: i64,
        update: UpdateUserStatusRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_status(self, user_id, update, request).await
    }

    // 删除用户
    pub async fn delete_user(
        &self,
        user_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_user(self, user_id, request).await
    }
}
