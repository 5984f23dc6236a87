//! 基于临时 SQLite 文件的存储层测试

use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use super::SeaOrmStorage;
use crate::entity::{class_students, prelude::*, student_profiles};
use crate::models::attendance::entities::AttendanceStatus;
use crate::models::attendance::requests::{AttendanceRecordInput, AttendanceSummaryQuery};
use crate::models::classes::requests::CreateClassRequest;
use crate::models::holidays::requests::CreateHolidayRequest;
use crate::models::schedules::entities::{ScheduleDraft, ScheduleStatus};
use crate::models::students::{entities::Student, requests::CreateStudentRequest};
use crate::models::subjects::requests::CreateSubjectRequest;
use crate::models::tutors::{entities::Tutor, requests::CreateTutorRequest};
use crate::models::users::{entities::UserRole, requests::NewUser};
use crate::storage::Storage;

async fn test_storage() -> SeaOrmStorage {
    let path = std::env::temp_dir().join(format!("tutorhub-test-{}.db", Uuid::new_v4()));
    SeaOrmStorage::connect(&format!("sqlite://{}?mode=rwc", path.display()))
        .await
        .unwrap()
}

fn new_user(username: &str, role: UserRole) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_string(),
        role,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

async fn student(storage: &SeaOrmStorage, username: &str, class_ids: Vec<i64>) -> Student {
    storage
        .create_student(
            new_user(username, UserRole::Student),
            CreateStudentRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: String::new(),
                full_name: format!("Student {username}"),
                phone: Some("01711000001".to_string()),
                guardian_name: Some("Guardian".to_string()),
                guardian_phone: Some("01811000002".to_string()),
                address: Some("12 Lake Road".to_string()),
                date_of_birth: None,
                school: None,
                class_ids,
            },
        )
        .await
        .unwrap()
}

async fn tutor(storage: &SeaOrmStorage, username: &str) -> Tutor {
    storage
        .create_tutor(
            new_user(username, UserRole::Tutor),
            CreateTutorRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: String::new(),
                full_name: format!("Tutor {username}"),
                phone: None,
                address: None,
                national_id: Some("1990123456789".to_string()),
                qualification: None,
                specialization: None,
                base_salary: 1000.0,
                per_session_rate: 250.5,
            },
        )
        .await
        .unwrap()
}

async fn class(storage: &SeaOrmStorage, name: &str, monthly_fee: f64) -> i64 {
    storage
        .create_class(CreateClassRequest {
            name: name.to_string(),
            description: None,
            monthly_fee,
        })
        .await
        .unwrap()
        .id
}

async fn subject(storage: &SeaOrmStorage, class_id: i64, tutor_id: i64) -> i64 {
    storage
        .create_subject(CreateSubjectRequest {
            class_id,
            tutor_id: Some(tutor_id),
            name: "Mathematics".to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id
}

fn draft(class_id: i64, subject_id: i64, tutor_id: i64, start: &str, end: &str) -> ScheduleDraft {
    ScheduleDraft {
        class_id,
        subject_id,
        tutor_id,
        schedule_date: date("2026-03-10"),
        start_time: time(start),
        end_time: time(end),
        room: None,
        notes: None,
    }
}

#[tokio::test]
async fn test_duplicate_holiday_date_conflicts() {
    let storage = test_storage().await;
    let holiday = CreateHolidayRequest {
        holiday_date: date("2026-12-16"),
        title: "Victory Day".to_string(),
        description: None,
    };
    storage.create_holiday(holiday.clone()).await.unwrap();

    let err = storage.create_holiday(holiday).await.unwrap_err();
    assert!(err.is_conflict());
    assert!(
        storage
            .get_holiday_by_date(date("2026-12-16"))
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn test_overlapping_schedule_conflicts_but_back_to_back_is_allowed() {
    let storage = test_storage().await;
    let tutor = tutor(&storage, "t1").await;
    let class_id = class(&storage, "Grade 9", 1500.0).await;
    let subject_id = subject(&storage, class_id, tutor.user.id).await;

    let first = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "10:00", "11:00"))
        .await
        .unwrap();

    let err = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "10:30", "11:30"))
        .await
        .unwrap_err();
    assert!(err.is_conflict());

    storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "11:00", "12:00"))
        .await
        .unwrap();

    // 取消的课程不再占用时间段
    storage
        .update_schedule_status(first.id, ScheduleStatus::Upcoming, ScheduleStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();
    storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "10:15", "10:45"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_status_update_requires_expected_current_status() {
    let storage = test_storage().await;
    let tutor = tutor(&storage, "t1").await;
    let class_id = class(&storage, "Grade 9", 0.0).await;
    let subject_id = subject(&storage, class_id, tutor.user.id).await;
    let schedule = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "09:00", "10:00"))
        .await
        .unwrap();

    let done = storage
        .update_schedule_status(schedule.id, ScheduleStatus::Upcoming, ScheduleStatus::Completed)
        .await
        .unwrap();
    assert_eq!(done.map(|s| s.status), Some(ScheduleStatus::Completed));

    let again = storage
        .update_schedule_status(schedule.id, ScheduleStatus::Upcoming, ScheduleStatus::Cancelled)
        .await
        .unwrap();
    assert!(again.is_none());
}

#[tokio::test]
async fn test_fee_generation_is_idempotent() {
    let storage = test_storage().await;
    let math = class(&storage, "Math", 1200.0).await;
    let physics = class(&storage, "Physics", 800.5).await;
    let both = student(&storage, "s1", vec![math, physics]).await;
    student(&storage, "s2", vec![math]).await;
    // 没有班级的学生不生成学费
    student(&storage, "s3", vec![]).await;

    let first = storage
        .generate_fees("2026-03", date("2026-03-10"))
        .await
        .unwrap();
    assert_eq!(first.created.len(), 2);
    assert_eq!(first.skipped, 0);
    let fee = first
        .created
        .iter()
        .find(|f| f.student_id == both.user.id)
        .unwrap();
    assert!((fee.amount - 2000.5).abs() < f64::EPSILON);
    assert_eq!(fee.due_date, date("2026-03-10"));

    let second = storage
        .generate_fees("2026-03", date("2026-03-10"))
        .await
        .unwrap();
    assert!(second.created.is_empty());
    assert_eq!(second.skipped, 2);
    assert_eq!(Fees::find().count(&storage.db).await.unwrap(), 2);
}

#[tokio::test]
async fn test_salary_generation_counts_completed_sessions() {
    let storage = test_storage().await;
    let tutor = tutor(&storage, "t1").await;
    let class_id = class(&storage, "Grade 9", 0.0).await;
    let subject_id = subject(&storage, class_id, tutor.user.id).await;
    let done = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "09:00", "10:00"))
        .await
        .unwrap();
    storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "10:00", "11:00"))
        .await
        .unwrap();
    storage
        .update_schedule_status(done.id, ScheduleStatus::Upcoming, ScheduleStatus::Completed)
        .await
        .unwrap();

    let generated = storage.generate_salaries("2026-03").await.unwrap();
    assert_eq!(generated.created.len(), 1);
    let salary = &generated.created[0];
    assert_eq!(salary.sessions_count, 1);
    assert!((salary.total_amount - 1250.5).abs() < f64::EPSILON);

    let again = storage.generate_salaries("2026-03").await.unwrap();
    assert!(again.created.is_empty());
    assert_eq!(again.skipped, 1);
}

#[tokio::test]
async fn test_deleting_user_cascades_profile_and_enrollment() {
    let storage = test_storage().await;
    let class_id = class(&storage, "Grade 9", 1000.0).await;
    let s = student(&storage, "s1", vec![class_id]).await;
    assert!(storage.is_student_enrolled(class_id, s.user.id).await.unwrap());

    assert!(storage.delete_user(s.user.id).await.unwrap());

    assert!(storage.get_student(s.user.id).await.unwrap().is_none());
    let profiles = StudentProfiles::find()
        .filter(student_profiles::Column::UserId.eq(s.user.id))
        .count(&storage.db)
        .await
        .unwrap();
    assert_eq!(profiles, 0);
    let enrollments = ClassStudents::find()
        .filter(class_students::Column::StudentId.eq(s.user.id))
        .count(&storage.db)
        .await
        .unwrap();
    assert_eq!(enrollments, 0);
}

#[tokio::test]
async fn test_attendance_summary_counts_completed_schedules_only() {
    let storage = test_storage().await;
    let tutor = tutor(&storage, "t1").await;
    let class_id = class(&storage, "Grade 9", 0.0).await;
    let subject_id = subject(&storage, class_id, tutor.user.id).await;
    let s = student(&storage, "s1", vec![class_id]).await;

    let completed = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "09:00", "10:00"))
        .await
        .unwrap();
    let pending = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "10:00", "11:00"))
        .await
        .unwrap();

    for (schedule_id, status) in [
        (completed.id, AttendanceStatus::Late),
        (pending.id, AttendanceStatus::Absent),
    ] {
        storage
            .mark_attendance(
                schedule_id,
                tutor.user.id,
                vec![AttendanceRecordInput {
                    student_id: s.user.id,
                    status,
                    remarks: None,
                }],
            )
            .await
            .unwrap();
    }
    storage
        .update_schedule_status(
            completed.id,
            ScheduleStatus::Upcoming,
            ScheduleStatus::Completed,
        )
        .await
        .unwrap();

    let summary = storage
        .attendance_summary(
            s.user.id,
            AttendanceSummaryQuery {
                date_from: None,
                date_to: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.late, 1);
    assert_eq!(summary.absent, 0);
    assert!((summary.attendance_rate - 100.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_marking_attendance_twice_updates_in_place() {
    let storage = test_storage().await;
    let tutor = tutor(&storage, "t1").await;
    let class_id = class(&storage, "Grade 9", 0.0).await;
    let subject_id = subject(&storage, class_id, tutor.user.id).await;
    let s = student(&storage, "s1", vec![class_id]).await;
    let schedule = storage
        .create_schedule(draft(class_id, subject_id, tutor.user.id, "09:00", "10:00"))
        .await
        .unwrap();

    for status in [AttendanceStatus::Absent, AttendanceStatus::Present] {
        storage
            .mark_attendance(
                schedule.id,
                tutor.user.id,
                vec![AttendanceRecordInput {
                    student_id: s.user.id,
                    status,
                    remarks: None,
                }],
            )
            .await
            .unwrap();
    }

    let records = storage.list_attendance(schedule.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].status, AttendanceStatus::Present);
}

#[tokio::test]
async fn test_sensitive_columns_are_encrypted_at_rest() {
    let storage = test_storage().await;
    let s = student(&storage, "s1", vec![]).await;

    let row = StudentProfiles::find()
        .filter(student_profiles::Column::UserId.eq(s.user.id))
        .one(&storage.db)
        .await
        .unwrap()
        .unwrap();
    let stored_phone = row.guardian_phone.unwrap();
    assert_ne!(stored_phone, "01811000002");
    assert!(!stored_phone.contains("01811000002"));
    assert_ne!(row.address.as_deref(), Some("12 Lake Road"));

    let loaded = storage.get_student(s.user.id).await.unwrap().unwrap();
    assert_eq!(loaded.profile.guardian_phone.as_deref(), Some("01811000002"));
    assert_eq!(loaded.profile.address.as_deref(), Some("12 Lake Road"));
}

#[tokio::test]
async fn test_large_notification_fanout_is_written_in_batches() {
    use crate::models::announcements::{entities::Audience, requests::CreateAnnouncementRequest};
    use crate::models::notifications::entities::{NewNotification, NotificationKind};

    let storage = test_storage().await;
    let user_id = student(&storage, "s1", vec![]).await.user.id;

    let items: Vec<_> = (0..5000)
        .map(|i| NewNotification {
            user_id,
            announcement_id: None,
            kind: NotificationKind::Fee,
            title: format!("Fee #{i}"),
            message: "Monthly fee generated".to_string(),
        })
        .collect();
    assert_eq!(storage.create_notifications(items).await.unwrap(), 5000);
    assert_eq!(storage.count_unread_notifications(user_id).await.unwrap(), 5000);

    let recipients = vec![user_id; 5001];
    let announcement = storage
        .create_announcement(
            CreateAnnouncementRequest {
                title: "Exam week".to_string(),
                message: "Exams start on Monday".to_string(),
                audience: Audience::All,
                class_id: None,
                send_sms: false,
            },
            user_id,
            &recipients,
        )
        .await
        .unwrap();
    assert_eq!(
        Notifications::find()
            .filter(crate::entity::notifications::Column::AnnouncementId.eq(announcement.id))
            .count(&storage.db)
            .await
            .unwrap(),
        5001
    );
}
