use std::collections::HashMap;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::FeeService;
use crate::config::AppConfig;
use crate::models::{
    ApiResponse,
    fees::{entities::Fee, requests::GenerateMonthRequest, responses::GenerationResponse},
    notifications::entities::{NewNotification, NotificationKind},
};
use crate::services::{field_error, sms_from_request, storage_error};
use crate::sms::send_batch;
use crate::storage::Storage;
use crate::utils::dates::{current_month, due_date};

pub(crate) fn fee_due_message(fee: &Fee, currency: &str) -> String {
    format!(
        "Tuition fee of {:.2} {} for {} is due on {}.",
        fee.amount, currency, fee.month, fee.due_date
    )
}

/// 幂等：同一学生同一月份只会生成一次
pub async fn generate_fees(
    service: &FeeService,
    req: GenerateMonthRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = AppConfig::get();
    let month = req
        .month
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(current_month);
    let due = match due_date(&month, config.billing.fee_due_day) {
        Ok(due) => due,
        Err(_) => return Ok(field_error("month", "The month must be in YYYY-MM format")),
    };

    let storage = service.get_storage(request)?;
    let generation = match storage.generate_fees(&month, due).await {
        Ok(generation) => generation,
        Err(e) => return Ok(storage_error(e, "Fee generation failed")),
    };
    info!(
        "Generated {} fees for {} ({} skipped)",
        generation.created.len(),
        month,
        generation.skipped
    );

    if !generation.created.is_empty() {
        announce_fees(request, &storage, &generation.created, &config.billing.currency).await;
    }

    Ok(HttpResponse::Created().json(ApiResponse::success(
        GenerationResponse {
            month,
            created: generation.created.len() as u64,
            skipped: generation.skipped,
        },
        "Fees generated",
    )))
}

// 站内通知 + 短信，均为尽力而为
async fn announce_fees(
    request: &HttpRequest,
    storage: &Arc<dyn Storage>,
    fees: &[Fee],
    currency: &str,
) {
    let messages: HashMap<i64, String> = fees
        .iter()
        .map(|fee| (fee.student_id, fee_due_message(fee, currency)))
        .collect();

    let notifications = messages
        .iter()
        .map(|(&user_id, message)| NewNotification {
            user_id,
            announcement_id: None,
            kind: NotificationKind::Fee,
            title: "Tuition fee generated".to_string(),
            message: message.clone(),
        })
        .collect();
    if let Err(e) = storage.create_notifications(notifications).await {
        warn!("Failed to create fee notifications: {}", e);
    }

    let student_ids: Vec<i64> = messages.keys().copied().collect();
    let contacts = match storage.list_contacts(&student_ids).await {
        Ok(contacts) => contacts,
        Err(e) => {
            warn!("Failed to load contacts for fee SMS: {}", e);
            return;
        }
    };
    let sender = sms_from_request(request);
    let sent = send_batch(
        sender.as_ref(),
        contacts.iter().filter_map(|contact| {
            let to = contact.sms_target()?;
            let message = messages.get(&contact.user_id)?;
            Some((to, message.as_str()))
        }),
    )
    .await;
    info!("Fee SMS sent: {}/{}", sent, contacts.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fees::entities::PaymentStatus;
    use chrono::NaiveDate;

    #[test]
    fn test_fee_due_message() {
        let now = chrono::Utc::now();
        let fee = Fee {
            id: 1,
            student_id: 2,
            month: "2025-03".into(),
            amount: 2500.0,
            due_date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            status: PaymentStatus::Pending,
            paid_at: None,
            payment_method: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(
            fee_due_message(&fee, "BDT"),
            "Tuition fee of 2500.00 BDT for 2025-03 is due on 2025-03-10."
        );
    }
}
