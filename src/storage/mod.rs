use std::sync::Arc;

use chrono::NaiveDate;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 账号管理方法
    // 创建管理员账号及档案
    async fn create_admin_user(&self, user: NewUser, profile: NewAdminProfile) -> Result<User>;
    // 通过ID获取账号
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名或邮箱获取账号
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出账号
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 修改账号状态
    async fn update_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>>;
    // 修改密码哈希
    async fn update_user_password(&self, id: i64, password_hash: String) -> Result<bool>;
    // 更新最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 删除账号（级联删除档案、班级关系等）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 账号总数
    async fn count_users(&self) -> Result<u64>;
    async fn get_admin_profile(&self, user_id: i64) -> Result<Option<AdminProfile>>;
    // 获取一批账号的联系方式（已解密）
    async fn list_contacts(&self, user_ids: &[i64]) -> Result<Vec<Contact>>;

    /// 学生管理方法
    async fn create_student(&self, user: NewUser, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_profile(&self, user_id: i64) -> Result<Option<StudentProfile>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(&self, id: i64, req: UpdateStudentRequest)
    -> Result<Option<Student>>;
    async fn delete_student(&self, id: i64) -> Result<bool>;
    async fn update_student_photo(&self, id: i64, photo_path: &str) -> Result<bool>;

    /// 教师管理方法
    async fn create_tutor(&self, user: NewUser, req: CreateTutorRequest) -> Result<Tutor>;
    async fn get_tutor(&self, id: i64) -> Result<Option<Tutor>>;
    async fn get_tutor_profile(&self, user_id: i64) -> Result<Option<TutorProfile>>;
    async fn list_tutors_with_pagination(&self, query: TutorListQuery)
    -> Result<TutorListResponse>;
    async fn update_tutor(&self, id: i64, req: UpdateTutorRequest) -> Result<Option<Tutor>>;
    async fn delete_tutor(&self, id: i64) -> Result<bool>;
    async fn update_tutor_photo(&self, id: i64, photo_path: &str) -> Result<bool>;

    /// 班级管理方法
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(&self, query: ClassListQuery)
    -> Result<ClassListResponse>;
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    // 班级学生
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<ClassStudent>>;
    // 批量加入班级，已加入的忽略
    async fn enroll_students(&self, class_id: i64, student_ids: &[i64])
    -> Result<EnrollmentResult>;
    async fn unenroll_student(&self, class_id: i64, student_id: i64) -> Result<bool>;
    async fn is_student_enrolled(&self, class_id: i64, student_id: i64) -> Result<bool>;
    // 教师是否在该班级任课
    async fn tutor_teaches_class(&self, tutor_id: i64, class_id: i64) -> Result<bool>;

    /// 科目管理方法
    async fn create_subject(&self, subject: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    async fn list_subjects(&self, query: SubjectListQuery) -> Result<Vec<Subject>>;
    async fn update_subject(
        &self,
        subject_id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, subject_id: i64) -> Result<bool>;

    /// 课程安排方法
    // 创建课程，时间冲突返回 Conflict
    async fn create_schedule(&self, draft: ScheduleDraft) -> Result<Schedule>;
    async fn get_schedule_by_id(&self, schedule_id: i64) -> Result<Option<Schedule>>;
    async fn list_schedules_with_pagination(
        &self,
        query: ScheduleListQuery,
    ) -> Result<ScheduleListResponse>;
    // 更新课程，冲突检测排除自身
    async fn update_schedule(&self, schedule_id: i64, draft: ScheduleDraft)
    -> Result<Option<Schedule>>;
    // 仅当当前状态仍为 from 时更新
    async fn update_schedule_status(
        &self,
        schedule_id: i64,
        from: ScheduleStatus,
        to: ScheduleStatus,
    ) -> Result<Option<Schedule>>;
    async fn delete_schedule(&self, schedule_id: i64) -> Result<bool>;

    /// 考勤方法
    // 按 (课程, 学生) upsert
    async fn mark_attendance(
        &self,
        schedule_id: i64,
        marked_by: i64,
        records: Vec<AttendanceRecordInput>,
    ) -> Result<Vec<Attendance>>;
    async fn list_attendance(&self, schedule_id: i64) -> Result<Vec<Attendance>>;
    async fn attendance_summary(
        &self,
        student_id: i64,
        query: AttendanceSummaryQuery,
    ) -> Result<AttendanceSummary>;

    /// 学费方法
    // 幂等生成某月学费
    async fn generate_fees(&self, month: &str, due_date: NaiveDate) -> Result<FeeGeneration>;
    async fn get_fee_by_id(&self, fee_id: i64) -> Result<Option<Fee>>;
    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse>;
    // 仅 pending 的学费可以缴纳，返回 None 表示状态已变化
    async fn mark_fee_paid(&self, fee_id: i64, payment: PayFeeRequest) -> Result<Option<Fee>>;
    // 仅删除 pending 的学费
    async fn delete_pending_fee(&self, fee_id: i64) -> Result<bool>;

    /// 工资方法
    async fn generate_salaries(&self, month: &str) -> Result<SalaryGeneration>;
    async fn get_salary_by_id(&self, salary_id: i64) -> Result<Option<Salary>>;
    async fn list_salaries_with_pagination(
        &self,
        query: SalaryListQuery,
    ) -> Result<SalaryListResponse>;
    async fn mark_salary_paid(&self, salary_id: i64) -> Result<Option<Salary>>;

    /// 学习资料方法
    async fn create_material(&self, material: NewMaterial) -> Result<Material>;
    async fn get_material_by_id(&self, material_id: i64) -> Result<Option<Material>>;
    async fn list_materials_with_pagination(
        &self,
        query: MaterialListQuery,
    ) -> Result<MaterialListResponse>;
    async fn delete_material(&self, material_id: i64) -> Result<bool>;

    /// 公告方法
    // 按受众与班级范围解析收件人（仅启用账号）
    async fn resolve_audience(&self, audience: Audience, class_id: Option<i64>)
    -> Result<Vec<i64>>;
    // 写入公告并为每个收件人生成通知
    async fn create_announcement(
        &self,
        req: CreateAnnouncementRequest,
        created_by: i64,
        recipients: &[i64],
    ) -> Result<Announcement>;
    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse>;
    async fn delete_announcement(&self, announcement_id: i64) -> Result<bool>;

    /// 通知方法
    async fn create_notifications(&self, notifications: Vec<NewNotification>) -> Result<u64>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_notification_read(&self, user_id: i64, notification_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;
    async fn delete_notification(&self, user_id: i64, notification_id: i64) -> Result<bool>;

    /// 节假日方法
    async fn create_holiday(&self, holiday: CreateHolidayRequest) -> Result<Holiday>;
    async fn get_holiday_by_id(&self, holiday_id: i64) -> Result<Option<Holiday>>;
    async fn get_holiday_by_date(&self, date: NaiveDate) -> Result<Option<Holiday>>;
    async fn list_holidays(&self, year: Option<i32>) -> Result<Vec<Holiday>>;
    async fn update_holiday(
        &self,
        holiday_id: i64,
        update: UpdateHolidayRequest,
    ) -> Result<Option<Holiday>>;
    async fn delete_holiday(&self, holiday_id: i64) -> Result<bool>;

    /// 统计方法
    async fn dashboard_summary(&self, today: NaiveDate, month: &str) -> Result<DashboardSummary>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
