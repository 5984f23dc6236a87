pub mod mark;
pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::attendance::requests::{AttendanceSummaryQuery, MarkAttendanceRequest};

super::lazy_service! {
    AttendanceService
}

impl AttendanceService {
    // 按 (课程, 学生) 批量登记
    pub async fn mark_attendance(
        &self,
        schedule_id: i64,
        req: MarkAttendanceRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::mark_attendance(self, schedule_id, req, request).await
    }

    pub async fn list_attendance(
        &self,
        schedule_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark::list_attendance(self, schedule_id, request).await
    }

    pub async fn student_summary(
        &self,
        student_id: i64,
        query: AttendanceSummaryQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::student_summary(self, student_id, query, request).await
    }
}
