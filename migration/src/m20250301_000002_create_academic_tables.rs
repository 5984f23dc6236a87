use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Classes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Classes::Description).text().null())
                    .col(
                        ColumnDef::new(Classes::MonthlyFee)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 班级-学生关联表
        manager
            .create_table(
                Table::create()
                    .table(ClassStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassStudents::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassStudents::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassStudents::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassStudents::Table, ClassStudents::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassStudents::Table, ClassStudents::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 科目表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::TutorId).big_integer().null())
                    .col(ColumnDef::new(Subjects::Name).string().not_null())
                    .col(ColumnDef::new(Subjects::Description).text().null())
                    .col(ColumnDef::new(Subjects::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Subjects::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Subjects::Table, Subjects::TutorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 节假日表
        manager
            .create_table(
                Table::create()
                    .table(Holidays::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Holidays::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Holidays::HolidayDate)
                            .date()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Holidays::Title).string().not_null())
                    .col(ColumnDef::new(Holidays::Description).text().null())
                    .col(ColumnDef::new(Holidays::CreatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程安排表
        manager
            .create_table(
                Table::create()
                    .table(ClassSchedules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassSchedules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::SubjectId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::TutorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::ScheduleDate)
                            .date()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassSchedules::StartTime).time().not_null())
                    .col(ColumnDef::new(ClassSchedules::EndTime).time().not_null())
                    .col(ColumnDef::new(ClassSchedules::Room).string().null())
                    .col(ColumnDef::new(ClassSchedules::Notes).text().null())
                    .col(ColumnDef::new(ClassSchedules::Status).string().not_null())
                    .col(
                        ColumnDef::new(ClassSchedules::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassSchedules::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassSchedules::Table, ClassSchedules::TutorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 考勤表
        manager
            .create_table(
                Table::create()
                    .table(Attendances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Attendances::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Attendances::ScheduleId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Attendances::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Attendances::Status).string().not_null())
                    .col(ColumnDef::new(Attendances::Remarks).text().null())
                    .col(ColumnDef::new(Attendances::MarkedBy).big_integer().null())
                    .col(ColumnDef::new(Attendances::MarkedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::ScheduleId)
                            .to(ClassSchedules::Table, ClassSchedules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Attendances::Table, Attendances::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_class_students_class_student")
                    .table(ClassStudents::Table)
                    .col(ClassStudents::ClassId)
                    .col(ClassStudents::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subjects_class_name")
                    .table(Subjects::Table)
                    .col(Subjects::ClassId)
                    .col(Subjects::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedules_tutor_date")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::TutorId)
                    .col(ClassSchedules::ScheduleDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_schedules_class_date")
                    .table(ClassSchedules::Table)
                    .col(ClassSchedules::ClassId)
                    .col(ClassSchedules::ScheduleDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_attendances_schedule_student")
                    .table(Attendances::Table)
                    .col(Attendances::ScheduleId)
                    .col(Attendances::StudentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attendances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassSchedules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Holidays::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Classes {
    Table,
    Id,
    Name,
    Description,
    MonthlyFee,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ClassStudents {
    Table,
    Id,
    ClassId,
    StudentId,
    EnrolledAt,
}

#[derive(DeriveIden)]
pub(crate) enum Subjects {
    Table,
    Id,
    ClassId,
    TutorId,
    Name,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Holidays {
    Table,
    Id,
    HolidayDate,
    Title,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassSchedules {
    Table,
    Id,
    ClassId,
    SubjectId,
    TutorId,
    ScheduleDate,
    StartTime,
    EndTime,
    Room,
    Notes,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Attendances {
    Table,
    Id,
    ScheduleId,
    StudentId,
    Status,
    Remarks,
    MarkedBy,
    MarkedAt,
}
