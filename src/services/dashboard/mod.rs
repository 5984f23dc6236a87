use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;
use crate::models::ApiResponse;
use crate::services::storage_error;
use crate::utils::dates::{current_month, today};

super::lazy_service! {
    DashboardService
}

impl DashboardService {
    /// 学生/教师/班级数量、今日课程数与本月收费情况
    pub async fn summary(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        match storage.dashboard_summary(today(), &current_month()).await {
            Ok(mut summary) => {
                summary.currency = AppConfig::get().billing.currency.clone();
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    summary,
                    "Dashboard summary retrieved",
                )))
            }
            Err(e) => Ok(storage_error(e, "Failed to build dashboard summary")),
        }
    }
}
