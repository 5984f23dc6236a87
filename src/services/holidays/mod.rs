use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::errors::TutorHubError;
use crate::models::{
    ApiResponse, ErrorCode,
    holidays::{
        requests::{CreateHolidayRequest, HolidayListQuery, UpdateHolidayRequest},
        responses::{HolidayListResponse, HolidayResponse},
    },
};
use crate::services::{not_found, storage_error, validation_failed};
use crate::utils::validate::Validator;

super::lazy_service! {
    /// 节假日，当天不能排课
    HolidayService
}

// 同一天只能有一个节假日，重复按校验错误处理
fn duplicate_date() -> HttpResponse {
    HttpResponse::UnprocessableEntity().json(ApiResponse::error_empty(
        ErrorCode::HolidayAlreadyExists,
        "A holiday already exists on this date",
    ))
}

impl HolidayService {
    pub async fn list_holidays(
        &self,
        query: HolidayListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.list_holidays(query.year).await {
            Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                HolidayListResponse { items },
                "Holiday list retrieved successfully",
            ))),
            Err(e) => Ok(storage_error(e, "Failed to retrieve holidays")),
        }
    }

    pub async fn create_holiday(
        &self,
        mut req: CreateHolidayRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        req.title = req.title.trim().to_string();
        let mut validator = Validator::new();
        validator
            .required("title", &req.title)
            .max_len("title", &req.title, 200);
        if let Err(errors) = validator.finish() {
            return Ok(validation_failed(errors));
        }

        let storage = self.get_storage(request)?;
        match storage.get_holiday_by_date(req.holiday_date).await {
            Ok(Some(_)) => return Ok(duplicate_date()),
            Ok(None) => {}
            Err(e) => return Ok(storage_error(e, "Failed to check holidays")),
        }

        match storage.create_holiday(req).await {
            Ok(holiday) => Ok(HttpResponse::Created().json(ApiResponse::success(
                HolidayResponse { holiday },
                "Holiday created successfully",
            ))),
            // 并发插入由唯一索引兜底
            Err(TutorHubError::Conflict(_)) => Ok(duplicate_date()),
            Err(e) => Ok(storage_error(e, "Holiday creation failed")),
        }
    }

    pub async fn update_holiday(
        &self,
        id: i64,
        mut req: UpdateHolidayRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        let mut validator = Validator::new();
        if let Some(title) = req.title.as_mut() {
            *title = title.trim().to_string();
            validator.required("title", title).max_len("title", title, 200);
        }
        if let Err(errors) = validator.finish() {
            return Ok(validation_failed(errors));
        }

        let storage = self.get_storage(request)?;
        if let Some(date) = req.holiday_date {
            match storage.get_holiday_by_date(date).await {
                Ok(Some(other)) if other.id != id => return Ok(duplicate_date()),
                Ok(_) => {}
                Err(e) => return Ok(storage_error(e, "Failed to check holidays")),
            }
        }

        match storage.update_holiday(id, req).await {
            Ok(Some(holiday)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
                HolidayResponse { holiday },
                "Holiday updated successfully",
            ))),
            Ok(None) => Ok(not_found(ErrorCode::HolidayNotFound, "Holiday not found")),
            Err(TutorHubError::Conflict(_)) => Ok(duplicate_date()),
            Err(e) => Ok(storage_error(e, "Holiday update failed")),
        }
    }

    pub async fn delete_holiday(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let storage = self.get_storage(request)?;
        match storage.delete_holiday(id).await {
            Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Holiday deleted"))),
            Ok(false) => Ok(not_found(ErrorCode::HolidayNotFound, "Holiday not found")),
            Err(e) => Ok(storage_error(e, "Holiday deletion failed")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_duplicate_date_is_validation_error() {
        assert_eq!(duplicate_date().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
