use serde::Deserialize;
use ts_rs::TS;

use super::entities::{UserRole, UserStatus};
use crate::models::common::PaginationQuery;

// 用户列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<UserRole>,
    pub status: Option<UserStatus>,
    pub search: Option<String>,
}

// 创建管理员账号请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
}

// 修改账号状态
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UpdateUserStatusRequest {
    pub status: UserStatus,
}

/// 存储层新建账号参数（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: UserRole,
}

/// 管理员档案写入参数
#[derive(Debug, Clone)]
pub struct NewAdminProfile {
    pub full_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
}
