use serde::Serialize;
use ts_rs::TS;

use super::entities::Fee;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct FeeResponse {
    pub fee: Fee,
}

pub type FeeListResponse = PaginatedResponse<Fee>;

// 批量生成结果，学费与工资共用
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct GenerationResponse {
    pub month: String,
    pub created: u64,
    pub skipped: u64,
}
