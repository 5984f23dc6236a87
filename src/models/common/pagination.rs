use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 单页最大条数
pub const MAX_PAGE_SIZE: i64 = 100;

/// 页码上限，避免偏移量计算溢出
pub const MAX_PAGE: i64 = 1_000_000;

// 分页查询参数，支持 `?page=2&size=20` 这类字符串数字
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_string_to_i64")]
    pub page: i64,
    #[serde(default = "default_size", deserialize_with = "deserialize_string_to_i64")]
    pub size: i64,
}

impl PaginationQuery {
    /// 规整后的 (页码, 每页条数)，页码从 1 开始
    pub fn normalized(&self) -> (u64, u64) {
        (
            self.page.clamp(1, MAX_PAGE) as u64,
            self.size.clamp(1, MAX_PAGE_SIZE) as u64,
        )
    }
}

/// 从可选的 page/size 计算规整后的分页参数
pub fn page_params(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    PaginationQuery {
        page: page.unwrap_or_else(default_page),
        size: size.unwrap_or_else(default_size),
    }
    .normalized()
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
        }
    }
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl PaginationInfo {
    pub fn new(page: u64, page_size: u64, total: u64) -> Self {
        Self {
            page: page as i64,
            page_size: page_size as i64,
            total: total as i64,
            total_pages: total.div_ceil(page_size.max(1)) as i64,
        }
    }
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E: Error>(self, value: i64) -> Result<Self::Value, E> {
            Ok(value)
        }

        fn visit_u64<E: Error>(self, value: u64) -> Result<Self::Value, E> {
            i64::try_from(value).map_err(|_| Error::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_str<E: Error>(self, value: &str) -> Result<Self::Value, E> {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    20
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_clamps() {
        let q = PaginationQuery { page: 0, size: 500 };
        assert_eq!(q.normalized(), (1, MAX_PAGE_SIZE as u64));
        assert_eq!(page_params(None, None), (1, 20));
        assert_eq!(page_params(Some(3), Some(0)), (3, 1));
    }

    #[test]
    fn test_normalized_caps_huge_page() {
        let q = PaginationQuery {
            page: i64::MAX,
            size: MAX_PAGE_SIZE,
        };
        let (page, size) = q.normalized();
        assert_eq!(page, MAX_PAGE as u64);
        assert!(page.checked_mul(size).is_some());
        assert_eq!(page_params(Some(i64::MAX), None).0, MAX_PAGE as u64);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(PaginationInfo::new(1, 20, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 20, 41).total_pages, 3);
    }
}
