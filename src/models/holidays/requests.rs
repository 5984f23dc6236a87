use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct CreateHolidayRequest {
    pub holiday_date: NaiveDate,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct UpdateHolidayRequest {
    pub holiday_date: Option<NaiveDate>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/holiday.ts")]
pub struct HolidayListQuery {
    pub year: Option<i32>,
}
