use serde::Serialize;
use ts_rs::TS;

// 管理后台首页统计
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardSummary {
    pub students: u64,
    pub tutors: u64,
    pub classes: u64,
    pub todays_schedules: u64,
    pub pending_fee_total: f64,
    pub paid_fee_total_this_month: f64,
    pub currency: String,
}
