use serde::Serialize;
use ts_rs::TS;

use super::entities::Salary;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/finance.ts")]
pub struct SalaryResponse {
    pub salary: Salary,
}

pub type SalaryListResponse = PaginatedResponse<Salary>;
