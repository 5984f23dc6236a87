use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/material.ts")]
pub struct Material {
    pub id: i64,
    pub subject_id: i64,
    pub uploaded_by: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub mime_type: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Material {
    pub fn download_url(&self) -> String {
        format!("/api/v1/materials/{}/download", self.id)
    }
}

/// 落盘后写入数据库的资料元数据
#[derive(Debug, Clone)]
pub struct NewMaterial {
    pub subject_id: i64,
    pub uploaded_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub original_name: String,
    pub stored_name: String,
    pub file_size: i64,
    pub mime_type: String,
}
