use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Portfolios {
    Table,
    Name,
    Title,
    Location,
}

#[derive(DeriveIden)]
enum PortfolioSkills {
    Table,
    SkillId,
}

#[derive(DeriveIden)]
enum Experiences {
    Table,
    PortfolioId,
    StartDate,
    EndDate,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    PortfolioId,
    Featured,
}

#[derive(DeriveIden)]
enum Education {
    Table,
    PortfolioId,
    Institution,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on portfolios (name, title) for search
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_name_title")
                    .table(Portfolios::Table)
                    .col(Portfolios::Name)
                    .col(Portfolios::Title)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_portfolios_location")
                    .table(Portfolios::Table)
                    .col(Portfolios::Location)
                    .to_owned(),
            )
            .await?;

        // The unique (portfolio_id, skill_id) index already covers lookups by portfolio.
        manager
            .create_index(
                Index::create()
                    .name("idx_portfolio_skills_skill_id")
                    .table(PortfolioSkills::Table)
                    .col(PortfolioSkills::SkillId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_experiences_portfolio_id")
                    .table(Experiences::Table)
                    .col(Experiences::PortfolioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_experiences_dates")
                    .table(Experiences::Table)
                    .col(Experiences::StartDate)
                    .col(Experiences::EndDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_portfolio_id")
                    .table(Projects::Table)
                    .col(Projects::PortfolioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_projects_featured")
                    .table(Projects::Table)
                    .col(Projects::Featured)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_education_portfolio_id")
                    .table(Education::Table)
                    .col(Education::PortfolioId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_education_institution")
                    .table(Education::Table)
                    .col(Education::Institution)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            "idx_portfolios_name_title",
            "idx_portfolios_location",
            "idx_portfolio_skills_skill_id",
            "idx_experiences_portfolio_id",
            "idx_experiences_dates",
            "idx_projects_portfolio_id",
            "idx_projects_featured",
            "idx_education_portfolio_id",
            "idx_education_institution",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
