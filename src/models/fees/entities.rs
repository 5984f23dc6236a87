use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::string_enum;

string_enum! {
    // 学费与工资共用：pending -> paid
    #[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
    pub enum PaymentStatus {
        Pending => "pending",
        Paid => "paid",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    /// YYYY-MM
    pub month: String,
    pub amount: f64,
    pub due_date: NaiveDate,
    pub status: PaymentStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 月度学费生成结果
#[derive(Debug, Clone)]
pub struct FeeGeneration {
    pub created: Vec<Fee>,
    pub skipped: u64,
}
