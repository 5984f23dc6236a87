use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 学生档案（phone / guardian_phone / address 为密文）
        manager
            .create_table(
                Table::create()
                    .table(StudentProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(StudentProfiles::FullName).string().not_null())
                    .col(ColumnDef::new(StudentProfiles::Phone).text().null())
                    .col(ColumnDef::new(StudentProfiles::GuardianName).string().null())
                    .col(ColumnDef::new(StudentProfiles::GuardianPhone).text().null())
                    .col(ColumnDef::new(StudentProfiles::Address).text().null())
                    .col(ColumnDef::new(StudentProfiles::DateOfBirth).date().null())
                    .col(ColumnDef::new(StudentProfiles::School).string().null())
                    .col(ColumnDef::new(StudentProfiles::PhotoPath).string().null())
                    .col(
                        ColumnDef::new(StudentProfiles::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentProfiles::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentProfiles::Table, StudentProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师档案（phone / address / national_id 为密文）
        manager
            .create_table(
                Table::create()
                    .table(TutorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TutorProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(TutorProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(TutorProfiles::FullName).string().not_null())
                    .col(ColumnDef::new(TutorProfiles::Phone).text().null())
                    .col(ColumnDef::new(TutorProfiles::Address).text().null())
                    .col(ColumnDef::new(TutorProfiles::NationalId).text().null())
                    .col(ColumnDef::new(TutorProfiles::Qualification).string().null())
                    .col(ColumnDef::new(TutorProfiles::Specialization).string().null())
                    .col(
                        ColumnDef::new(TutorProfiles::BaseSalary)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(TutorProfiles::PerSessionRate)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(TutorProfiles::PhotoPath).string().null())
                    .col(
                        ColumnDef::new(TutorProfiles::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TutorProfiles::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(TutorProfiles::Table, TutorProfiles::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 管理员档案
        manager
            .create_table(
                Table::create()
                    .table(AdminProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdminProfiles::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AdminProfiles::FullName).string().not_null())
                    .col(ColumnDef::new(AdminProfiles::Phone).text().null())
                    .col(ColumnDef::new(AdminProfiles::Position).string().null())
                    .col(
                        ColumnDef::new(AdminProfiles::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdminProfiles::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AdminProfiles::Table, AdminProfiles::UserId)
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
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_status")
                    .table(Users::Table)
                    .col(Users::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TutorProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StudentProfiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum StudentProfiles {
    Table,
    Id,
    UserId,
    FullName,
    Phone,
    GuardianName,
    GuardianPhone,
    Address,
    DateOfBirth,
    School,
    PhotoPath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TutorProfiles {
    Table,
    Id,
    UserId,
    FullName,
    Phone,
    Address,
    NationalId,
    Qualification,
    Specialization,
    BaseSalary,
    PerSessionRate,
    PhotoPath,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AdminProfiles {
    Table,
    Id,
    UserId,
    FullName,
    Phone,
    Position,
    CreatedAt,
    UpdatedAt,
}
