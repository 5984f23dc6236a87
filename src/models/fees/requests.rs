use serde::Deserialize;
use ts_rs::TS;

use super::entities::PaymentStatus;

// 学费/工资批量生成
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct GenerateMonthRequest {
    /// YYYY-MM，缺省为当前月份
    pub month: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct PayFeeRequest {
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct FeeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub month: Option<String>,
    pub status: Option<PaymentStatus>,
}
