//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体；
//! 加密列在转换时解密。

pub mod prelude;

pub mod admin_profiles;
pub mod announcements;
pub mod attendances;
pub mod class_schedules;
pub mod class_students;
pub mod classes;
pub mod fees;
pub mod holidays;
pub mod notifications;
pub mod salaries;
pub mod student_profiles;
pub mod study_materials;
pub mod subjects;
pub mod tutor_profiles;
pub mod users;

use chrono::{DateTime, Utc};

/// unix 秒转 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// 解析字符串枚举列，非法值回退到默认值并记录警告
pub(crate) fn parse_or<T: std::str::FromStr>(value: &str, fallback: T, column: &str) -> T {
    value.parse().unwrap_or_else(|_| {
        tracing::warn!("Unexpected value '{}' in column {}", value, column);
        fallback
    })
}
