//! 预导入模块，方便使用

pub use super::admin_profiles::{
    ActiveModel as AdminProfileActiveModel, Entity as AdminProfiles, Model as AdminProfileModel,
};
pub use super::announcements::{
    ActiveModel as AnnouncementActiveModel, Entity as Announcements, Model as AnnouncementModel,
};
pub use super::attendances::{
    ActiveModel as AttendanceActiveModel, Entity as Attendances, Model as AttendanceModel,
};
pub use super::class_schedules::{
    ActiveModel as ScheduleActiveModel, Entity as ClassSchedules, Model as ScheduleModel,
};
pub use super::class_students::{
    ActiveModel as ClassStudentActiveModel, Entity as ClassStudents, Model as ClassStudentModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::fees::{ActiveModel as FeeActiveModel, Entity as Fees, Model as FeeModel};
pub use super::holidays::{
    ActiveModel as HolidayActiveModel, Entity as Holidays, Model as HolidayModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::salaries::{
    ActiveModel as SalaryActiveModel, Entity as Salaries, Model as SalaryModel,
};
pub use super::student_profiles::{
    ActiveModel as StudentProfileActiveModel, Entity as StudentProfiles,
    Model as StudentProfileModel,
};
pub use super::study_materials::{
    ActiveModel as MaterialActiveModel, Entity as StudyMaterials, Model as MaterialModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::tutor_profiles::{
    ActiveModel as TutorProfileActiveModel, Entity as TutorProfiles, Model as TutorProfileModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
