use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::FeeService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse, ErrorCode,
    fees::{
        entities::PaymentStatus,
        requests::{FeeListQuery, PayFeeRequest},
        responses::FeeResponse,
    },
    notifications::entities::NotificationKind,
    users::entities::UserRole,
};
use crate::services::{
    conflict, current_user, forbidden, not_found, notify_users, sms_users, storage_error,
};

fn already_paid() -> HttpResponse {
    conflict(ErrorCode::FeeAlreadyPaid, "Fee has already been paid")
}

// 学生只能看到自己的学费
pub async fn list_fees(
    service: &FeeService,
    mut query: FeeListQuery,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role == UserRole::Student {
        query.student_id = Some(user.id);
    }

    let storage = service.get_storage(request)?;
    match storage.list_fees_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Fee list retrieved successfully",
        ))),
        Err(e) => Ok(storage_error(e, "Failed to retrieve fee list")),
    }
}

pub async fn get_fee(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    match storage.get_fee_by_id(id).await {
        Ok(Some(fee)) if user.is_admin() || fee.student_id == user.id => Ok(HttpResponse::Ok()
            .json(ApiResponse::success(FeeResponse { fee }, "Fee retrieved successfully"))),
        Ok(Some(_)) => Ok(forbidden("You can only view your own fees")),
        Ok(None) => Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => Ok(storage_error(e, "Failed to retrieve fee")),
    }
}

pub async fn pay_fee(
    service: &FeeService,
    id: i64,
    req: PayFeeRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_fee_by_id(id).await {
        Ok(Some(fee)) if fee.status == PaymentStatus::Paid => return Ok(already_paid()),
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => return Ok(storage_error(e, "Failed to retrieve fee")),
    }

    let fee = match storage.mark_fee_paid(id, req).await {
        Ok(Some(fee)) => fee,
        // 读取之后被并发支付
        Ok(None) => return Ok(already_paid()),
        Err(e) => return Ok(storage_error(e, "Failed to record payment")),
    };
    info!("Fee {} for student {} marked paid", fee.id, fee.student_id);

    let message = format!(
        "Payment of {:.2} {} received for {}. Thank you.",
        fee.amount,
        AppConfig::get().billing.currency,
        fee.month
    );
    notify_users(
        &storage,
        &[fee.student_id],
        NotificationKind::Fee,
        "Payment received",
        &message,
    )
    .await;
    sms_users(request, &storage, &[fee.student_id], &message).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        FeeResponse { fee },
        "Fee marked as paid",
    )))
}

/// 只能删除未缴纳的学费
pub async fn delete_fee(
    service: &FeeService,
    id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.get_fee_by_id(id).await {
        Ok(Some(fee)) if fee.status == PaymentStatus::Paid => {
            return Ok(conflict(
                ErrorCode::FeeAlreadyPaid,
                "Paid fees cannot be deleted",
            ));
        }
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::FeeNotFound, "Fee not found")),
        Err(e) => return Ok(storage_error(e, "Failed to retrieve fee")),
    }

    match storage.delete_pending_fee(id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Fee deleted"))),
        Ok(false) => Ok(conflict(
            ErrorCode::FeeAlreadyPaid,
            "Paid fees cannot be deleted",
        )),
        Err(e) => Ok(storage_error(e, "Fee deletion failed")),
    }
}
