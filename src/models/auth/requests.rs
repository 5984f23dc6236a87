use serde::Deserialize;
use ts_rs::TS;

// 用户登录请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct LoginRequest {
    /// 用户名或邮箱
    pub username: String,
    pub password: String,
    /// 是否记住我
    #[serde(default)]
    pub remember_me: bool,
}

// 修改密码请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
