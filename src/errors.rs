//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use sea_orm::SqlErr;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_tutorhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum TutorHubError {
            $($variant(String),)*
        }

        impl TutorHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(TutorHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(TutorHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(TutorHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl TutorHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        TutorHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_tutorhub_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Conflict Error"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Constraint("E014", "Constraint Violation"),
    Crypto("E015", "Crypto Error"),
    Sms("E016", "SMS Delivery Error"),
}

impl TutorHubError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为唯一约束冲突
    pub fn is_conflict(&self) -> bool {
        matches!(self, TutorHubError::Conflict(_))
    }
}

impl fmt::Display for TutorHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for TutorHubError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for TutorHubError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => TutorHubError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => TutorHubError::Constraint(msg),
            _ => TutorHubError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<std::io::Error> for TutorHubError {
    fn from(err: std::io::Error) -> Self {
        TutorHubError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for TutorHubError {
    fn from(err: serde_json::Error) -> Self {
        TutorHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for TutorHubError {
    fn from(err: chrono::ParseError) -> Self {
        TutorHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TutorHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(TutorHubError::cache_connection("test").code(), "E001");
        assert_eq!(TutorHubError::database_config("test").code(), "E003");
        assert_eq!(TutorHubError::validation("test").code(), "E007");
        assert_eq!(TutorHubError::conflict("test").code(), "E010");
        assert_eq!(TutorHubError::sms("test").code(), "E016");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            TutorHubError::constraint("test").error_type(),
            "Constraint Violation"
        );
        assert_eq!(
            TutorHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_db_error_classification() {
        let err: TutorHubError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, TutorHubError::DatabaseOperation(_)));
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_format_simple() {
        let err = TutorHubError::validation("Invalid month");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid month"));
    }
}
