use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::{FeeListQuery, GenerateMonthRequest, PayFeeRequest};
use crate::models::users::entities::UserRole;
use crate::services::FeeService;
use crate::utils::SafeIDI64;

static FEE_SERVICE: Lazy<FeeService> = Lazy::new(FeeService::new_lazy);

// 学生只能看到自己的学费
const FEE_READERS: &[&UserRole] = &[&UserRole::Admin, &UserRole::Student];

pub async fn generate_fees(
    req: HttpRequest,
    body: web::Json<GenerateMonthRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.generate_fees(body.into_inner(), &req).await
}

pub async fn list_fees(
    req: HttpRequest,
    query: web::Query<FeeListQuery>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.list_fees(query.into_inner(), &req).await
}

pub async fn get_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.get_fee(id.0, &req).await
}

pub async fn pay_fee(
    req: HttpRequest,
    id: SafeIDI64,
    payment: web::Json<PayFeeRequest>,
) -> ActixResult<HttpResponse> {
    FEE_SERVICE.pay_fee(id.0, payment.into_inner(), &req).await
}

pub async fn delete_fee(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    FEE_SERVICE.delete_fee(id.0, &req).await
}

// 配置路由
pub fn configure_fee_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/fees")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/generate").route(
                    web::post()
                        .to(generate_fees)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("").route(
                    web::get()
                        .to(list_fees)
                        .wrap(middlewares::RequireRole::new_any(FEE_READERS)),
                ),
            )
            .service(
                web::resource("/{id}/pay").route(
                    web::patch()
                        .to(pay_fee)
                        .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_fee)
                            .wrap(middlewares::RequireRole::new_any(FEE_READERS)),
                    )
                    .route(
                        web::delete()
                            .to(delete_fee)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    ),
            ),
    );
}
