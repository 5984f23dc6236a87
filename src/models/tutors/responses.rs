use serde::Serialize;
use ts_rs::TS;

use super::entities::Tutor;
use crate::models::common::PaginatedResponse;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/tutor.ts")]
pub struct TutorResponse {
    pub tutor: Tutor,
}

pub type TutorListResponse = PaginatedResponse<Tutor>;
