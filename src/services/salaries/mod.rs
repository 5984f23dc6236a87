use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use crate::models::{
    ApiResponse, ErrorCode,
    fees::{entities::PaymentStatus, requests::GenerateMonthRequest, responses::GenerationResponse},
    notifications::entities::NotificationKind,
    salaries::{requests::SalaryListQuery, responses::SalaryResponse},
    users::entities::UserRole,
};
use crate::services::{
    conflict, current_user, field_error, forbidden, not_found, notify_users, storage_error,
};
use crate::utils::dates::{current_month, month_bounds};

super::lazy_service! {
    /// 教师月度工资
    SalaryService
}

fn already_paid() -> HttpResponse {
    conflict(ErrorCode::SalaryAlreadyPaid, "Salary has already been paid")
}

impl SalaryService {
    /// 基本工资 + 当月已完成课时 × 课时费；幂等
    pub async fn generate_salaries(
        &self,
        req: GenerateMonthRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let month = req
            .month
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(current_month);
        if month_bounds(&month).is_err() {
            return Ok(field_error("month", "The month must be in YYYY-MM format"));
        }

        let storage = self.get_storage(request)?;
        let generation = match storage.generate_salaries(&month).await {
            Ok(generation) => generation,
            Err(e) => return Ok(storage_error(e, "Salary generation failed")),
        };
        info!(
            "Generated {} salaries for {} ({} skipped)",
            generation.created.len(),
            month,
            generation.skipped
        );

        for salary in &generation.created {
            let message = format!(
                "Salary for {}: {:.2} ({} sessions).",
                salary.month, salary.total_amount, salary.sessions_count
            );
            notify_users(
                &storage,
                &[salary.tutor_id],
                NotificationKind::Salary,
                "Salary generated",
                &message,
            )
            .await;
        }

        Ok(HttpResponse::Created().json(ApiResponse::success(
            GenerationResponse {
                month,
                created: generation.created.len() as u64,
                skipped: generation.skipped,
            },
            "Salaries generated",
        )))
    }

    // 教师只能看到自己的工资
    pub async fn list_salaries(
        &self,
        mut query: SalaryListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        if user.role == UserRole::Tutor {
            query.tutor_id = Some(user.id);
        }

        let storage = self.get_storage(request)?;
        match storage.list_salaries_with_pagination(query).await {
            Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                response,
                "Salary list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to retrieve salary list")),
        }
    }

    pub async fn get_salary(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let user = match current_user(request) {
            Ok(user) => user,
            Err(resp) => return Ok(resp),
        };
        let storage = self.get_storage(request)?;

        match storage.get_salary_by_id(id).await {
            Ok(Some(salary)) if user.is_admin() || salary.tutor_id == user.id => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    SalaryResponse { salary },
                    "Salary retrieved successfully",
                )))
            }
            Ok(Some(_)) => Ok(forbidden("You can only view your own salary")),
            Ok(None) => Ok(not_found(ErrorCode::SalaryNotFound, "Salary not found")),
            Err(e) => Ok(storage_error(e, "Failed to retrieve salary")),
        }
    }

    pub async fn pay_salary(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;

        match storage.get_salary_by_id(id).await {
            Ok(Some(salary)) if salary.status == PaymentStatus::Paid => return Ok(already_paid()),
            Ok(Some(_)) => {}
            Ok(None) => return Ok(not_found(ErrorCode::SalaryNotFound, "Salary not found")),
            Err(e) => return Ok(storage_error(e, "Failed to retrieve salary")),
        }

        match storage.mark_salary_paid(id).await {
            Ok(Some(salary)) => {
                info!("Salary {} for tutor {} marked paid", salary.id, salary.tutor_id);
                notify_users(
                    &storage,
                    &[salary.tutor_id],
                    NotificationKind::Salary,
                    "Salary paid",
                    &format!("Your salary for {} has been paid.", salary.month),
                )
                .await;
                Ok(HttpResponse::Ok().json(ApiResponse::success(
                    SalaryResponse { salary },
                    "Salary marked as paid",
                )))
            }
            Ok(None) => Ok(already_paid()),
            Err(e) => Ok(storage_error(e, "Failed to record salary payment")),
        }
    }
}
