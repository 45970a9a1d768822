use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `portfolio_skills` pivot table.
#[derive(DeriveIden)]
enum PortfolioSkills {
    Table,
    Id,
    PortfolioId,
    SkillId,
    ProficiencyLevel,
    CreatedAt,
    UpdatedAt,
}

/// Re-declare parent table identifiers for foreign-key references.
#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Skills {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PortfolioSkills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PortfolioSkills::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PortfolioSkills::PortfolioId).integer().not_null())
                    .col(ColumnDef::new(PortfolioSkills::SkillId).integer().not_null())
                    // 1-5 scale
                    .col(
                        ColumnDef::new(PortfolioSkills::ProficiencyLevel)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(PortfolioSkills::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PortfolioSkills::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_skills_portfolio_id")
                            .from(PortfolioSkills::Table, PortfolioSkills::PortfolioId)
                            .to(Portfolios::Table, Portfolios::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_portfolio_skills_skill_id")
                            .from(PortfolioSkills::Table, PortfolioSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One link per (portfolio, skill) pair.
        manager
            .create_index(
                Index::create()
                    .name("uq_portfolio_skills_portfolio_skill")
                    .table(PortfolioSkills::Table)
                    .col(PortfolioSkills::PortfolioId)
                    .col(PortfolioSkills::SkillId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PortfolioSkills::Table).to_owned())
            .await
    }
}
