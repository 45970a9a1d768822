//! `/api/admin/*`: full CRUD for every entity. Every handler takes an
//! [`AdminKey`](crate::auth::admin_key::AdminKey), so nothing here runs
//! without a valid `X-Admin-Key` header.

pub mod education;
pub mod experiences;
pub mod portfolios;
pub mod projects;
pub mod skills;

use actix_web::web;
use sea_orm::DatabaseConnection;

use crate::db::portfolio as portfolio_db;
use crate::errors::AppError;
use crate::validation::{Validated, ValidationErrors};

/// Default page size for admin listings.
pub const ADMIN_PER_PAGE: u64 = 20;
/// Skills are short rows; the admin UI shows more per page.
pub const SKILLS_PER_PAGE: u64 = 50;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/portfolios")
            .route("", web::get().to(portfolios::list_portfolios))
            .route("", web::post().to(portfolios::create_portfolio))
            .route("/{id}", web::put().to(portfolios::update_portfolio))
            .route("/{id}", web::delete().to(portfolios::delete_portfolio))
            .route("/{id}/skills/sync", web::post().to(portfolios::sync_skills)),
    );

    cfg.service(
        web::scope("/projects")
            .route("", web::get().to(projects::list_projects))
            .route("", web::post().to(projects::create_project))
            .route("/{id}", web::put().to(projects::update_project))
            .route("/{id}", web::delete().to(projects::delete_project)),
    );

    cfg.service(
        web::scope("/experiences")
            .route("", web::get().to(experiences::list_experiences))
            .route("", web::post().to(experiences::create_experience))
            .route("/{id}", web::put().to(experiences::update_experience))
            .route("/{id}", web::delete().to(experiences::delete_experience)),
    );

    cfg.service(
        web::scope("/education")
            .route("", web::get().to(education::list_education))
            .route("", web::post().to(education::create_education))
            .route("/{id}", web::put().to(education::update_education))
            .route("/{id}", web::delete().to(education::delete_education)),
    );

    cfg.service(
        web::scope("/skills")
            .route("", web::get().to(skills::list_skills))
            .route("", web::post().to(skills::create_skill))
            .route("/{id}", web::put().to(skills::update_skill))
            .route("/{id}", web::delete().to(skills::delete_skill)),
    );
}

/// Reject a `portfolio_id` that does not reference an existing portfolio.
pub(crate) async fn check_portfolio_ref(
    db: &DatabaseConnection,
    validated: &Validated,
) -> Result<(), AppError> {
    if !validated.has("portfolio_id") {
        return Ok(());
    }

    let exists = match validated.int32("portfolio_id") {
        Some(id) => portfolio_db::portfolio_exists(db, id).await?,
        None => false,
    };
    if exists {
        Ok(())
    } else {
        ValidationErrors::single("portfolio_id", "The selected portfolio id is invalid.").into_result()
    }
}

/// Validated input that still failed to convert (an id outside `i32`, say).
pub(crate) fn unprocessable() -> AppError {
    AppError::invalid("form", "The given data was invalid.")
}
