use serde::Serialize;
use ts_rs::TS;

use super::entities::Material;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct MaterialResponse {
    pub material: Material,
    pub download_url: String,
}

pub type MaterialListResponse = PaginatedResponse<Material>;
