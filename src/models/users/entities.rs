use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{Result, TutorHubError};
use crate::string_enum;
use crate::utils::jwt::{JwtUtils, TokenPair};

string_enum! {
    // 用户角色
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserRole {
        Admin => "admin",
        Tutor => "tutor",
        Student => "student",
    }
}

impl UserRole {
    pub fn admin_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin]
    }
    /// 管理员与教师
    pub fn staff_roles() -> &'static [&'static UserRole] {
        &[&Self::Admin, &Self::Tutor]
    }
}

string_enum! {
    // 用户状态
    #[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
    pub enum UserStatus {
        Active => "active",
        Inactive => "inactive",
    }
}

// 用户实体（学生与教师的身份即 users.id）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(
        &self,
        refresh_token_expiry: Option<chrono::TimeDelta>,
    ) -> Result<TokenPair> {
        JwtUtils::generate_token_pair(self.id, self.role.as_str(), refresh_token_expiry)
            .map_err(|e| TutorHubError::authentication(format!("Failed to issue tokens: {e}")))
    }
}

// 管理员档案
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct AdminProfile {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 短信/通知收件人信息（已解密）
#[derive(Debug, Clone)]
pub struct Contact {
    pub user_id: i64,
    pub full_name: String,
    pub phone: Option<String>,
    pub guardian_phone: Option<String>,
}

impl Contact {
    /// 学生优先发给监护人
    pub fn sms_target(&self) -> Option<&str> {
        self.guardian_phone
            .as_deref()
            .or(self.phone.as_deref())
            .filter(|p| !p.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
            assert_eq!(
                serde_json::to_value(role).unwrap(),
                serde_json::Value::String(role.to_string())
            );
        }
        assert!("teacher".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_sms_target_prefers_guardian() {
        let mut contact = Contact {
            user_id: 1,
            full_name: "Rahim".into(),
            phone: Some("01711000001".into()),
            guardian_phone: Some("01711000002".into()),
        };
        assert_eq!(contact.sms_target(), Some("01711000002"));
        contact.guardian_phone = None;
        assert_eq!(contact.sms_target(), Some("01711000001"));
        contact.phone = Some(String::new());
        assert_eq!(contact.sms_target(), None);
    }
}
