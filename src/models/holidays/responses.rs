use serde::Serialize;
use ts_rs::TS;

use super::entities::Holiday;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct HolidayResponse {
    pub holiday: Holiday,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct HolidayListResponse {
    pub items: Vec<Holiday>,
}
