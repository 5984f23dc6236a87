//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod announcements;
mod attendance;
mod classes;
mod dashboard;
mod fees;
mod holidays;
mod materials;
mod notifications;
mod salaries;
mod schedules;
mod students;
mod subjects;
mod tutors;
mod users;

#[cfg(test)]
mod tests;

use crate::config::AppConfig;
use crate::errors::{Result, TutorHubError};
use crate::utils::FieldCipher;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
    pub(crate) cipher: &'static FieldCipher,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect(&config.database.url).await
    }

    /// 连接指定数据库并运行迁移
    pub async fn connect(url: &str) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;
        let cipher = FieldCipher::global()?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| TutorHubError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage initialized, database: {}", db_url);

        Ok(Self { db, cipher })
    }

    /// SQLite 专用连接（WAL + pragma 优化，外键约束开启）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TutorHubError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| TutorHubError::database_connection(format!("SQLite connect failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| TutorHubError::database_connection(format!("Cannot connect to database: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TutorHubError::database_config(format!(
                "Cannot infer database type from '{url}'. Supported: sqlite://, postgres://, mysql:// or a .db/.sqlite path"
            )))
        }
    }
}

// Storage trait 实现
use crate::models::{
    announcements::{
        entities::{Announcement, Audience},
        requests::{AnnouncementListQuery, CreateAnnouncementRequest},
        responses::AnnouncementListResponse,
    },
    attendance::{
        entities::{Attendance, AttendanceSummary},
        requests::{AttendanceRecordInput, AttendanceSummaryQuery},
    },
    classes::{
        entities::{Class, ClassStudent},
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::{ClassListResponse, EnrollmentResult},
    },
    dashboard::responses::DashboardSummary,
    fees::{
        entities::{Fee, FeeGeneration},
        requests::{FeeListQuery, PayFeeRequest},
        responses::FeeListResponse,
    },
    holidays::{
        entities::Holiday,
        requests::{CreateHolidayRequest, UpdateHolidayRequest},
    },
    materials::{
        entities::{Material, NewMaterial},
        requests::MaterialListQuery,
        responses::MaterialListResponse,
    },
    notifications::{
        entities::NewNotification,
        requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
    salaries::{
        entities::{Salary, SalaryGeneration},
        requests::SalaryListQuery,
        responses::SalaryListResponse,
    },
    schedules::{
        entities::{Schedule, ScheduleDraft, ScheduleStatus},
        requests::ScheduleListQuery,
        responses::ScheduleListResponse,
    },
    students::{
        entities::{Student, StudentProfile},
        requests::{CreateStudentRequest, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    subjects::{
        entities::Subject,
        requests::{CreateSubjectRequest, SubjectListQuery, UpdateSubjectRequest},
    },
    tutors::{
        entities::{Tutor, TutorProfile},
        requests::{CreateTutorRequest, TutorListQuery, UpdateTutorRequest},
        responses::TutorListResponse,
    },
    users::{
        entities::{AdminProfile, Contact, User, UserStatus},
        requests::{NewAdminProfile, NewUser, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 账号管理方法
    async fn create_admin_user(&self, user: NewUser, profile: NewAdminProfile) -> Result<User> {
        self.create_admin_user_impl(user, profile).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>> {
        self.update_user_status_impl(id, status).await
    }

    async fn update_user_password(&self, id: i64, password_hash: String) -> Result<bool> {
        self.update_user_password_impl(id, password_hash).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn get_admin_profile(&self, user_id: i64) -> Result<Option<AdminProfile>> {
        self.get_admin_profile_impl(user_id).await
    }

    async fn list_contacts(&self, user_ids: &[i64]) -> Result<Vec<Contact>> {
        self.list_contacts_impl(user_ids).await
    }

    // 学生管理方法
    async fn create_student(&self, user: NewUser, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(user, req).await
    }

    async fn get_student(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_impl(id).await
    }

    async fn get_student_profile(&self, user_id: i64) -> Result<Option<StudentProfile>> {
        self.get_student_profile_impl(user_id).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(&self, id: i64, req: UpdateStudentRequest) -> Result<Option<Student>> {
        self.update_student_impl(id, req).await
    }

    async fn delete_student(&self, id: i64) -> Result<bool> {
        self.delete_student_impl(id).await
    }

    async fn update_student_photo(&self, id: i64, photo_path: &str) -> Result<bool> {
        self.update_student_photo_impl(id, photo_path).await
    }

    // 教师管理方法
    async fn create_tutor(&self, user: NewUser, req: CreateTutorRequest) -> Result<Tutor> {
        self.create_tutor_impl(user, req).await
    }

    async fn get_tutor(&self, id: i64) -> Result<Option<Tutor>> {
        self.get_tutor_impl(id).await
    }

    async fn get_tutor_profile(&self, user_id: i64) -> Result<Option<TutorProfile>> {
        self.get_tutor_profile_impl(user_id).await
    }

    async fn list_tutors_with_pagination(
        &self,
        query: TutorListQuery,
    ) -> Result<TutorListResponse> {
        self.list_tutors_with_pagination_impl(query).await
    }

    async fn update_tutor(&self, id: i64, req: UpdateTutorRequest) -> Result<Option<Tutor>> {
        self.update_tutor_impl(id, req).await
    }

    async fn delete_tutor(&self, id: i64) -> Result<bool> {
        self.delete_tutor_impl(id).await
    }

    async fn update_tutor_photo(&self, id: i64, photo_path: &str) -> Result<bool> {
        self.update_tutor_photo_impl(id, photo_path).await
    }

    // 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>> {
        self.list_class_students_impl(class_id).await
    }

    async fn enroll_students(
        &self,
        class_id: i64,
        student_ids: &[i64],
    ) -> Result<EnrollmentResult> {
        self.enroll_students_impl(class_id, student_ids).await
    }

    async fn unenroll_student(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.unenroll_student_impl(class_id, student_id).await
    }

    async fn is_student_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.is_student_enrolled_impl(class_id, student_id).await
    }

    async fn tutor_teaches_class(&self, tutor_id: i64, class_id: i64) -> Result<bool> {
        self.tutor_teaches_class_impl(tutor_id, class_id).await
    }

    // 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(subject).await
    }

    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(subject_id).await
    }

    async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>> {
        self.list_subjects_impl(query).await
    }

    async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(subject_id, update).await
    }

    async fn delete_subject(&self, subject_id: i64) -> Result<bool> {
        self.delete_subject_impl(subject_id).await
    }

    // 课程安排方法
    async fn create_schedule(&self, draft: ScheduleDraft) -> Result<Schedule> {
        self.create_schedule_impl(draft).await
    }

    async fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<Schedule>> {
        self.get_schedule_by_id_impl(schedule_id).await
    }

    async fn list_schedules_with_pagination(
        &self,
        query: ScheduleListQuery,
    ) -> Result<ScheduleListResponse> {
        self.list_schedules_with_pagination_impl(query).await
    }

    async fn update_schedule(
        &self,
        schedule_id: i64,
        draft: ScheduleDraft,
    ) -> Result<Option<Schedule>> {
        self.update_schedule_impl(schedule_id, draft).await
    }

    async fn update_schedule_status(
        &self,
        schedule_id: i64,
        from: ScheduleStatus,
        to: ScheduleStatus,
    ) -> Result<Option<Schedule>> {
        self.update_schedule_status_impl(schedule_id, from, to).await
    }

    async fn delete_schedule(&self, schedule_id: i64) -> Result<bool> {
        self.delete_schedule_impl(schedule_id).await
    }

    // 考勤方法
    async fn mark_attendance(
        &self,
        schedule_id: i64,
        marked_by: i64,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Vec<Attendance>> {
        self.mark_attendance_impl(schedule_id, marked_by, records).await
    }

    async fn list_attendance(&self, schedule_id: i64) -> Result<Vec<Attendance>> {
        self.list_attendance_impl(schedule_id).await
    }

    async fn attendance_summary(
        &self,
        student_id: i64,
        query: AttendanceSummaryQuery,
    ) -> Result<AttendanceSummary> {
        self.attendance_summary_impl(student_id, query).await
    }

    // 学费方法
    async fn generate_fees(&self, month: &str, due_date: NaiveDate) -> Result<FeeGeneration> {
        self.generate_fees_impl(month, due_date).await
    }

    async fn get_fee_by_id(&self, fee_id: i64) -> Result<Option<Fee>> {
        self.get_fee_by_id_impl(fee_id).await
    }

    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse> {
        self.list_fees_with_pagination_impl(query).await
    }

    async fn mark_fee_paid(&self, fee_id: i64, payment: PayFeeRequest) -> Result<Option<Fee>> {
        self.mark_fee_paid_impl(fee_id, payment).await
    }

    async fn delete_pending_fee(&self, fee_id: i64) -> Result<bool> {
        self.delete_pending_fee_impl(fee_id).await
    }

    // 工资方法
    async fn generate_salaries(&self, month: &str) -> Result<SalaryGeneration> {
        self.generate_salaries_impl(month).await
    }

    async fn get_salary_by_id(&self, salary_id: i64) -> Result<Option<Salary>> {
        self.get_salary_by_id_impl(salary_id).await
    }

    async fn list_salaries_with_pagination(
        &self,
        query: SalaryListQuery,
    ) -> Result<SalaryListResponse> {
        self.list_salaries_with_pagination_impl(query).await
    }

    async fn mark_salary_paid(&self, salary_id: i64) -> Result<Option<Salary>> {
        self.mark_salary_paid_impl(salary_id).await
    }

    // 学习资料方法
    async fn create_material(&self, material: NewMaterial) -> Result<Material> {
        self.create_material_impl(material).await
    }

    async fn get_material_by_id(&self, material_id: i64) -> Result<Option<Material>> {
        self.get_material_by_id_impl(material_id).await
    }

    async fn list_materials_with_pagination(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse> {
        self.list_materials_with_pagination_impl(query).await
    }

    async fn delete_material(&self, material_id: i64) -> Result<bool> {
        self.delete_material_impl(material_id).await
    }

    // 公告方法
    async fn resolve_audience(
        &self,
        audience: Audience,
        class_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        self.resolve_audience_impl(audience, class_id).await
    }

    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        created_by: i64,
        recipients: &[i64],
    ) -> Result<Announcement> {
        self.create_announcement_impl(req, created_by, recipients).await
    }

    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        self.list_announcements_with_pagination_impl(query).await
    }

    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool> {
        self.delete_announcement_impl(announcement_id).await
    }

    // 通知方法
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<u64> {
        self.create_notifications_impl(notifications).await
    }

    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query).await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(user_id, notification_id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, user_id: i64, notification_id: i64) -> Result<bool> {
        self.delete_notification_impl(user_id, notification_id).await
    }

    // 节假日方法
    async fn create_holiday(&self, holiday: CreateHolidayRequest) -> Result<Holiday> {
        self.create_holiday_impl(holiday).await
    }

    async fn get_holiday_by_id(&self, holiday_id: i64) -> Result<Option<Holiday>> {
        self.get_holiday_by_id_impl(holiday_id).await
    }

    async fn get_holiday_by_date(&self, date: NaiveDate) -> Result<Option<Holiday>> {
        self.get_holiday_by_date_impl(date).await
    }

    async fn list_holidays(&self, year: Option<i32>) -> Result<Vec<Holiday>> {
        self.list_holidays_impl(year).await
    }

    async fn update_holiday(
        &self,
        holiday_id: i64,
        update: UpdateHolidayRequest,
    ) -> Result<Option<Holiday>> {
        self.update_holiday_impl(holiday_id, update).await
    }

    async fn delete_holiday(&self, holiday_id: i64) -> Result<bool> {
        self.delete_holiday_impl(holiday_id).await
    }

    // 统计方法
    async fn dashboard_summary(&self, today: NaiveDate, month: &str) -> Result<DashboardSummary> {
        self.dashboard_summary_impl(today, month).await
    }
}

/// `ON CONFLICT DO NOTHING` 未插入时部分驱动返回 RecordNotInserted，统一视为 0 行
pub(crate) fn inserted_rows(result: std::result::Result<u64, DbErr>) -> Result<u64> {
    match result {
        Ok(rows) => Ok(rows),
        Err(DbErr::RecordNotInserted) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("tutorhub.db").unwrap(),
            "sqlite://tutorhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/db").is_ok());
        assert!(SeaOrmStorage::build_database_url("ftp://nope").is_err());
    }

    #[test]
    fn test_inserted_rows() {
        assert_eq!(inserted_rows(Ok(1)).unwrap(), 1);
        assert_eq!(inserted_rows(Err(DbErr::RecordNotInserted)).unwrap(), 0);
        assert!(inserted_rows(Err(DbErr::Custom("x".into()))).is_err());
    }
}
