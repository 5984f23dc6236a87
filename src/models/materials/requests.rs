use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub subject_id: Option<i64>,
    pub class_id: Option<i64>,
}
