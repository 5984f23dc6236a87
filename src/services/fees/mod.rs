pub mod generate;
pub mod manage;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::fees::requests::{FeeListQuery, GenerateMonthRequest, PayFeeRequest};

super::lazy_service! {
    /// 月度学费
    FeeService
}

impl FeeService {
    pub async fn generate_fees(
        &self,
        req: GenerateMonthRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        generate::generate_fees(self, req, request).await
    }

    pub async fn list_fees(
        &self,
        query: FeeListQuery,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::list_fees(self, query, request).await
    }

    pub async fn get_fee(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::get_fee(self, id, request).await
    }

    pub async fn pay_fee(
        &self,
        id: i64,
        req: PayFeeRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        manage::pay_fee(self, id, req, request).await
    }

    pub async fn delete_fee(&self, id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        manage::delete_fee(self, id, request).await
    }
}
