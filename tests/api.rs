//! 通过 actix 测试服务驱动完整路由的接口测试

use std::sync::Arc;

use actix_web::{App, http::StatusCode, test, web};
use serde_json::{Value, json};
use uuid::Uuid;

use tutorhub::models::classes::requests::CreateClassRequest;
use tutorhub::models::students::requests::CreateStudentRequest;
use tutorhub::models::subjects::requests::CreateSubjectRequest;
use tutorhub::models::tutors::requests::CreateTutorRequest;
use tutorhub::models::users::entities::{User, UserRole};
use tutorhub::models::users::requests::{NewAdminProfile, NewUser};
use tutorhub::routes;
use tutorhub::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use tutorhub::utils::jwt::JwtUtils;
use tutorhub::utils::{json_error_handler, query_error_handler};

struct Fixture {
    storage: Arc<dyn Storage>,
    admin: User,
}

async fn fixture() -> Fixture {
    let path = std::env::temp_dir().join(format!("tutorhub-api-{}.db", Uuid::new_v4()));
    let storage: Arc<dyn Storage> = Arc::new(
        SeaOrmStorage::connect(&format!("sqlite://{}?mode=rwc", path.display()))
            .await
            .unwrap(),
    );
    let admin = storage
        .create_admin_user(
            new_user("admin", UserRole::Admin),
            NewAdminProfile {
                full_name: "Admin".to_string(),
                phone: None,
                position: None,
            },
        )
        .await
        .unwrap();
    Fixture { storage, admin }
}

fn new_user(username: &str, role: UserRole) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "unused".to_string(),
        role,
    }
}

fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, user.role.as_str()).unwrap();
    ("Authorization", format!("Bearer {token}"))
}

macro_rules! app {
    ($storage:expr) => {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .configure(routes::configure_api_routes),
        )
        .await
    };
}

async fn create_student(storage: &Arc<dyn Storage>, username: &str, class_ids: Vec<i64>) -> User {
    storage
        .create_student(
            new_user(username, UserRole::Student),
            CreateStudentRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: String::new(),
                full_name: format!("Student {username}"),
                phone: None,
                guardian_name: None,
                guardian_phone: Some("01811000002".to_string()),
                address: None,
                date_of_birth: None,
                school: None,
                class_ids,
            },
        )
        .await
        .unwrap()
        .user
}

/// 建立一个教师、班级和科目，返回 (tutor, class_id, subject_id)
async fn teaching_setup(storage: &Arc<dyn Storage>) -> (User, i64, i64) {
    let tutor = storage
        .create_tutor(
            new_user("tutor", UserRole::Tutor),
            CreateTutorRequest {
                username: "tutor".to_string(),
                email: "tutor@example.com".to_string(),
                password: String::new(),
                full_name: "Tutor".to_string(),
                phone: None,
                address: None,
                national_id: None,
                qualification: None,
                specialization: None,
                base_salary: 0.0,
                per_session_rate: 100.0,
            },
        )
        .await
        .unwrap()
        .user;
    let class_id = storage
        .create_class(CreateClassRequest {
            name: "Grade 10".to_string(),
            description: None,
            monthly_fee: 1500.0,
        })
        .await
        .unwrap()
        .id;
    let subject_id = storage
        .create_subject(CreateSubjectRequest {
            class_id,
            tutor_id: Some(tutor.id),
            name: "Physics".to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id;
    (tutor, class_id, subject_id)
}

fn schedule_body(class_id: i64, subject_id: i64, date: &str, start: &str, end: &str) -> Value {
    json!({
        "class_id": class_id,
        "subject_id": subject_id,
        "schedule_date": date,
        "start_time": start,
        "end_time": end,
    })
}

#[actix_web::test]
async fn test_requests_without_token_are_rejected() {
    let fx = fixture().await;
    let app = app!(fx.storage);

    let req = test::TestRequest::get().uri("/api/v1/students").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_students_cannot_manage_holidays() {
    let fx = fixture().await;
    let student = create_student(&fx.storage, "s1", vec![]).await;
    let app = app!(fx.storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/holidays")
        .insert_header(bearer(&student))
        .set_json(json!({"holiday_date": "2026-12-16", "title": "Victory Day"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_duplicate_holiday_is_a_validation_error() {
    let fx = fixture().await;
    let app = app!(fx.storage);
    let body = json!({"holiday_date": "2026-12-16", "title": "Victory Day"});

    let req = test::TestRequest::post()
        .uri("/api/v1/holidays")
        .insert_header(bearer(&fx.admin))
        .set_json(&body)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/v1/holidays")
        .insert_header(bearer(&fx.admin))
        .set_json(&body)
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[actix_web::test]
async fn test_schedule_overlap_and_holiday_rules() {
    let fx = fixture().await;
    let (_tutor, class_id, subject_id) = teaching_setup(&fx.storage).await;
    let app = app!(fx.storage);

    let create = |body: Value| {
        test::TestRequest::post()
            .uri("/api/v1/schedules")
            .insert_header(bearer(&fx.admin))
            .set_json(body)
            .to_request()
    };

    let resp = test::call_service(
        &app,
        create(schedule_body(class_id, subject_id, "2026-03-10", "10:00:00", "11:00:00")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        create(schedule_body(class_id, subject_id, "2026-03-10", "10:30:00", "11:30:00")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        create(schedule_body(class_id, subject_id, "2026-03-10", "11:00:00", "12:00:00")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        create(schedule_body(class_id, subject_id, "2026-03-10", "13:00:00", "12:00:00")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::post()
        .uri("/api/v1/holidays")
        .insert_header(bearer(&fx.admin))
        .set_json(json!({"holiday_date": "2026-03-17", "title": "National Day"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let resp = test::call_service(
        &app,
        create(schedule_body(class_id, subject_id, "2026-03-17", "10:00:00", "11:00:00")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_fee_generation_twice_creates_nothing_new() {
    let fx = fixture().await;
    let (_tutor, class_id, _subject_id) = teaching_setup(&fx.storage).await;
    let student = create_student(&fx.storage, "s1", vec![class_id]).await;
    let app = app!(fx.storage);

    let generate = || {
        test::TestRequest::post()
            .uri("/api/v1/fees/generate")
            .insert_header(bearer(&fx.admin))
            .set_json(json!({"month": "2026-04"}))
            .to_request()
    };

    let first: Value = test::call_and_read_body_json(&app, generate()).await;
    assert_eq!(first["data"]["created"], 1);
    let second: Value = test::call_and_read_body_json(&app, generate()).await;
    assert_eq!(second["data"]["created"], 0);
    assert_eq!(second["data"]["skipped"], 1);

    // 新生成的学费会通知学生
    let req = test::TestRequest::get()
        .uri("/api/v1/notifications/unread-count")
        .insert_header(bearer(&student))
        .to_request();
    let unread: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unread["data"]["unread_count"], 1);
}

#[actix_web::test]
async fn test_cancelling_a_completed_schedule_is_rejected() {
    let fx = fixture().await;
    let (tutor, class_id, subject_id) = teaching_setup(&fx.storage).await;
    let app = app!(fx.storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/schedules")
        .insert_header(bearer(&tutor))
        .set_json(schedule_body(class_id, subject_id, "2026-05-05", "09:00:00", "10:00:00"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["schedule"]["id"].as_i64().unwrap();

    let status = |value: &str| {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/schedules/{id}/status"))
            .insert_header(bearer(&tutor))
            .set_json(json!({"status": value}))
            .to_request()
    };
    assert_eq!(
        test::call_service(&app, status("completed")).await.status(),
        StatusCode::OK
    );
    assert_eq!(
        test::call_service(&app, status("cancelled")).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn test_announcement_fans_out_to_class_students() {
    let fx = fixture().await;
    let (_tutor, class_id, _subject_id) = teaching_setup(&fx.storage).await;
    let enrolled = create_student(&fx.storage, "s1", vec![class_id]).await;
    let outsider = create_student(&fx.storage, "s2", vec![]).await;
    let app = app!(fx.storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/announcements")
        .insert_header(bearer(&fx.admin))
        .set_json(json!({
            "title": "Exam week",
            "message": "Mock tests start Monday",
            "audience": "students",
            "class_id": class_id,
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    for (user, expected) in [(&enrolled, 1), (&outsider, 0)] {
        let req = test::TestRequest::get()
            .uri("/api/v1/notifications/unread-count")
            .insert_header(bearer(user))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["unread_count"], expected);
    }
}

#[actix_web::test]
async fn test_schedule_updates_keep_own_slot_and_stop_once_completed() {
    let fx = fixture().await;
    let (tutor, class_id, subject_id) = teaching_setup(&fx.storage).await;
    let app = app!(fx.storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/schedules")
        .insert_header(bearer(&tutor))
        .set_json(schedule_body(class_id, subject_id, "2026-05-12", "10:00:00", "11:00:00"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["schedule"]["id"].as_i64().unwrap();

    let update = |body: Value| {
        test::TestRequest::put()
            .uri(&format!("/api/v1/schedules/{id}"))
            .insert_header(bearer(&tutor))
            .set_json(body)
            .to_request()
    };

    // 自身原有时段不算冲突
    let req = update(json!({"start_time": "10:00:00", "end_time": "11:00:00", "room": "B2"}));
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["schedule"]["room"], "B2");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/schedules/{id}/status"))
        .insert_header(bearer(&tutor))
        .set_json(json!({"status": "completed"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let resp = test::call_service(&app, update(json!({"room": "C3"}))).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_paid_fees_cannot_be_paid_again_or_deleted() {
    let fx = fixture().await;
    let (_tutor, class_id, _subject_id) = teaching_setup(&fx.storage).await;
    create_student(&fx.storage, "s1", vec![class_id]).await;
    let due = chrono::NaiveDate::from_ymd_opt(2026, 6, 10).unwrap();
    let fee_id = fx.storage.generate_fees("2026-06", due).await.unwrap().created[0].id;
    let app = app!(fx.storage);

    let pay = || {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/fees/{fee_id}/pay"))
            .insert_header(bearer(&fx.admin))
            .set_json(json!({"payment_method": "cash"}))
            .to_request()
    };
    let body: Value = test::call_and_read_body_json(&app, pay()).await;
    assert_eq!(body["data"]["fee"]["status"], "paid");
    assert_eq!(test::call_service(&app, pay()).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/fees/{fee_id}"))
        .insert_header(bearer(&fx.admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_salary_cannot_be_paid_twice() {
    let fx = fixture().await;
    teaching_setup(&fx.storage).await;
    let salary_id = fx.storage.generate_salaries("2026-06").await.unwrap().created[0].id;
    let app = app!(fx.storage);

    let pay = || {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/salaries/{salary_id}/pay"))
            .insert_header(bearer(&fx.admin))
            .to_request()
    };
    assert_eq!(test::call_service(&app, pay()).await.status(), StatusCode::OK);
    assert_eq!(test::call_service(&app, pay()).await.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_attendance_rules_for_enrollment_and_cancelled_schedules() {
    let fx = fixture().await;
    let (tutor, class_id, subject_id) = teaching_setup(&fx.storage).await;
    let enrolled = create_student(&fx.storage, "s1", vec![class_id]).await;
    let outsider = create_student(&fx.storage, "s2", vec![]).await;
    let app = app!(fx.storage);

    let req = test::TestRequest::post()
        .uri("/api/v1/schedules")
        .insert_header(bearer(&tutor))
        .set_json(schedule_body(class_id, subject_id, "2026-05-19", "09:00:00", "10:00:00"))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["schedule"]["id"].as_i64().unwrap();

    let mark = |student_id: i64| {
        test::TestRequest::post()
            .uri(&format!("/api/v1/schedules/{id}/attendance"))
            .insert_header(bearer(&tutor))
            .set_json(json!({"records": [{"student_id": student_id, "status": "present"}]}))
            .to_request()
    };
    assert_eq!(
        test::call_service(&app, mark(outsider.id)).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
    assert_eq!(test::call_service(&app, mark(enrolled.id)).await.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/schedules/{id}/status"))
        .insert_header(bearer(&tutor))
        .set_json(json!({"status": "cancelled"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    assert_eq!(
        test::call_service(&app, mark(enrolled.id)).await.status(),
        StatusCode::CONFLICT
    );
}

#[actix_web::test]
async fn test_admin_cannot_delete_own_account() {
    let fx = fixture().await;
    let app = app!(fx.storage);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/users/{}", fx.admin.id))
        .insert_header(bearer(&fx.admin))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );
}
