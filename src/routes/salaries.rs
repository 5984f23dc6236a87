use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::fees::requests::GenerateMonthRequest;
use crate::models::salaries::requests::SalaryListQuery;
use crate::models::users::entities::UserRole;
use crate::services::SalaryService;
use crate::utils::SafeIDI64;

static SALARY_SERVICE: Lazy<SalaryService> = Lazy::new(SalaryService::new_lazy);

pub async fn generate_salaries(
    req: HttpRequest,
    body: web::Json<GenerateMonthRequest>,
) -> ActixResult<HttpResponse> {
    SALARY_SERVICE
        .generate_salaries(body.into_inner(), &req)
        .await
}

pub async fn list_salaries(
    req: HttpRequest,
    query: web::Query<SalaryListQuery>,
) -> ActixResult<HttpResponse> {
    SALARY_SERVICE.list_salaries(query.into_inner(), &req).await
}

pub async fn get_salary(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SALARY_SERVICE.get_salary(id.0, &req).await
}

pub async fn pay_salary(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SALARY_SERVICE.pay_salary(id.0, &req).await
}

// 配置路由
pub fn configure_salary_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/salaries")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    // 教师只能看到自己的工资单
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles()))
                    .route("", web::get().to(list_salaries))
                    .route(
                        "/generate",
                        web::post()
                            .to(generate_salaries)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route(
                        "/{id}/pay",
                        web::patch()
                            .to(pay_salary)
                            .wrap(middlewares::RequireRole::new_any(UserRole::admin_roles())),
                    )
                    .route("/{id}", web::get().to(get_salary)),
            ),
    );
}
