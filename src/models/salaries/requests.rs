use serde::Deserialize;
use ts_rs::TS;

use crate::models::fees::entities::PaymentStatus;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct SalaryListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub tutor_id: Option<i64>,
    pub month: Option<String>,
    pub status: Option<PaymentStatus>,
}
