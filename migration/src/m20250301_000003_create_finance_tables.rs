use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_core_tables::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 学费表
        manager
            .create_table(
                Table::create()
                    .table(Fees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Fees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Fees::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Fees::Month).string_len(7).not_null())
                    .col(ColumnDef::new(Fees::Amount).double().not_null())
                    .col(ColumnDef::new(Fees::DueDate).date().not_null())
                    .col(ColumnDef::new(Fees::Status).string().not_null())
                    .col(ColumnDef::new(Fees::PaidAt).big_integer().null())
                    .col(ColumnDef::new(Fees::PaymentMethod).string().null())
                    .col(ColumnDef::new(Fees::Notes).text().null())
                    .col(ColumnDef::new(Fees::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Fees::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Fees::Table, Fees::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 工资表
        manager
            .create_table(
                Table::create()
                    .table(Salaries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Salaries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Salaries::TutorId).big_integer().not_null())
                    .col(ColumnDef::new(Salaries::Month).string_len(7).not_null())
                    .col(ColumnDef::new(Salaries::BaseAmount).double().not_null())
                    .col(ColumnDef::new(Salaries::SessionsCount).integer().not_null())
                    .col(ColumnDef::new(Salaries::SessionAmount).double().not_null())
                    .col(ColumnDef::new(Salaries::TotalAmount).double().not_null())
                    .col(ColumnDef::new(Salaries::Status).string().not_null())
                    .col(ColumnDef::new(Salaries::PaidAt).big_integer().null())
                    .col(ColumnDef::new(Salaries::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Salaries::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Salaries::Table, Salaries::TutorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 每个学生每月仅一条学费
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_fees_student_month")
                    .table(Fees::Table)
                    .col(Fees::StudentId)
                    .col(Fees::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_salaries_tutor_month")
                    .table(Salaries::Table)
                    .col(Salaries::TutorId)
                    .col(Salaries::Month)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_fees_status")
                    .table(Fees::Table)
                    .col(Fees::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Salaries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Fees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Fees {
    Table,
    Id,
    StudentId,
    Month,
    Amount,
    DueDate,
    Status,
    PaidAt,
    PaymentMethod,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Salaries {
    Table,
    Id,
    TutorId,
    Month,
    BaseAmount,
    SessionsCount,
    SessionAmount,
    TotalAmount,
    Status,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}
