use serde::Deserialize;
use ts_rs::TS;

use crate::models::users::entities::UserStatus;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct CreateTutorRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    #[serde(default)]
    pub base_salary: f64,
    #[serde(default)]
    pub per_session_rate: f64,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct UpdateTutorRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub national_id: Option<String>,
    pub qualification: Option<String>,
    pub specialization: Option<String>,
    pub base_salary: Option<f64>,
    pub per_session_rate: Option<f64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub search: Option<String>,
    pub status: Option<UserStatus>,
}
