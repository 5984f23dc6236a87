pub mod announcements;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod fees;
pub mod holidays;
pub mod materials;
pub mod notifications;
pub mod salaries;
pub mod schedules;
pub mod students;
pub mod subjects;
pub mod tutors;
pub mod users;

pub use common::{
    ApiResponse, FieldErrors, PaginatedResponse, PaginationInfo, PaginationQuery, page_params,
};

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 业务错误码，0 表示成功
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    ValidationFailed = 1001,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证 2xxx
    Unauthorized = 2000,
    AuthFailed = 2001,
    AccountInactive = 2002,
    Forbidden = 2003,
    RefreshTokenMissing = 2004,
    RefreshTokenInvalid = 2005,
    PasswordPolicyViolation = 2006,

    // 用户与档案 3xxx
    UserNotFound = 3000,
    UserAlreadyExists = 3001,
    CanNotDeleteCurrentUser = 3002,
    StudentNotFound = 3010,
    TutorNotFound = 3020,

    // 班级与科目 4xxx
    ClassNotFound = 4000,
    ClassAlreadyExists = 4001,
    SubjectNotFound = 4010,
    SubjectAlreadyExists = 4011,

    // 课程安排与考勤 5xxx
    ScheduleNotFound = 5000,
    ScheduleConflict = 5001,
    ScheduleOnHoliday = 5002,
    InvalidStatusTransition = 5003,
    AttendanceNotAllowed = 5010,

    // 财务 6xxx
    FeeNotFound = 6000,
    FeeAlreadyPaid = 6001,
    SalaryNotFound = 6010,
    SalaryAlreadyPaid = 6011,

    // 文件 7xxx
    FileNotFound = 7000,
    FileTypeNotAllowed = 7001,
    FileSizeExceeded = 7002,
    FileUploadFailed = 7003,
    MaterialNotFound = 7010,

    // 公告、通知与节假日 8xxx
    AnnouncementNotFound = 8000,
    NotificationNotFound = 8010,
    HolidayNotFound = 8020,
    HolidayAlreadyExists = 8021,
}
