use serde::Serialize;
use ts_rs::TS;

use super::entities::Subject;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectResponse {
    pub subject: Subject,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/subject.ts")]
pub struct SubjectListResponse {
    pub items: Vec<Subject>,
}
