use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::fees::entities::PaymentStatus;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct Salary {
    pub id: i64,
    pub tutor_id: i64,
    pub month: String,
    pub base_amount: f64,
    pub sessions_count: i32,
    pub session_amount: f64,
    pub total_amount: f64,
    pub status: PaymentStatus,
    pub paid_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 工资计算结果，金额保留到分
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SalaryBreakdown {
    pub base_amount: f64,
    pub sessions_count: i32,
    pub session_amount: f64,
    pub total_amount: f64,
}

impl SalaryBreakdown {
    pub fn compute(base_salary: f64, sessions_count: i32, per_session_rate: f64) -> Self {
        let base_amount = round_cents(base_salary);
        let session_amount = round_cents(sessions_count as f64 * per_session_rate);
        Self {
            base_amount,
            sessions_count,
            session_amount,
            total_amount: round_cents(base_amount + session_amount),
        }
    }
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone)]
pub struct SalaryGeneration {
    pub created: Vec<Salary>,
    pub skipped: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_salary_math() {
        let s = SalaryBreakdown::compute(15000.0, 12, 350.5);
        assert_eq!(s.session_amount, 4206.0);
        assert_eq!(s.total_amount, 19206.0);

        let rounded = SalaryBreakdown::compute(0.0, 3, 333.333);
        assert_eq!(rounded.session_amount, 1000.0);

        let none = SalaryBreakdown::compute(8000.0, 0, 500.0);
        assert_eq!(none.session_amount, 0.0);
        assert_eq!(none.total_amount, 8000.0);
    }
}
