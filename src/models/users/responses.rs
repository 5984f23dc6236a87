use serde::Serialize;
use ts_rs::TS;

use super::entities::{AdminProfile, User};
use crate::models::common::PaginatedResponse;

// 用户响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserResponse {
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_profile: Option<AdminProfile>,
}

pub type UserListResponse = PaginatedResponse<User>;
