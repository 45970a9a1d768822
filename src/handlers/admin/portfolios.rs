use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::ADMIN_PER_PAGE;
use crate::auth::admin_key::AdminKey;
use crate::config::AppConfig;
use crate::db::portfolio::{self as portfolio_db, ListOrder, PortfolioFilter};
use crate::db::skills as skill_db;
use crate::errors::AppError;
use crate::handlers::derived_context;
use crate::handlers::portfolios::{create_from_form, update_from_form};
use crate::models::portfolio::{
    self, ADMIN_CREATE_RULES, ADMIN_UPDATE_RULES, PortfolioWithSkills, SYNC_SKILLS_RULES,
};
use crate::models::{Deleted, PaginationQuery, query_flag};
use crate::models::derived::DerivedContext;
use crate::storage::ImageStore;
use crate::validation::{RequestForm, ValidationErrors, validate};

#[derive(Debug, Deserialize)]
pub struct AdminPortfolioQuery {
    pub simple: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/admin/portfolios — newest first with `{id, name}` skills;
/// `?simple=1` returns every `{id, name, title}` ordered by name instead.
pub async fn list_portfolios(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<AdminPortfolioQuery>,
) -> Result<HttpResponse, AppError> {
    if query_flag(query.simple.as_deref()) {
        let summaries = portfolio_db::list_simple(db.get_ref()).await?;
        return Ok(HttpResponse::Ok().json(summaries));
    }

    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let mut page = portfolio_db::find_portfolios(
        db.get_ref(),
        &PortfolioFilter::All,
        ListOrder::Newest,
        pagination.page(),
        pagination.per_page_or(ADMIN_PER_PAGE),
    )
    .await?;

    let rows = std::mem::take(&mut page.data);
    let ctx = derived_context(&config);
    let items = portfolio_db::with_skills(db.get_ref(), rows, &ctx).await?;
    Ok(HttpResponse::Ok().json(page.with_data(items)))
}

/// POST /api/admin/portfolios — JSON or multipart with a `profile_image` file.
pub async fn create_portfolio(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<ImageStore>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let created = create_from_form(db.get_ref(), &store, form, ADMIN_CREATE_RULES).await?;

    let body = with_skills(db.get_ref(), created, &derived_context(&config)).await?;
    Ok(HttpResponse::Created().json(body))
}

/// PUT /api/admin/portfolios/{id} — partial update; no file keeps the current image.
pub async fn update_portfolio(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<ImageStore>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let existing = find_portfolio(db.get_ref(), path.into_inner()).await?;

    let form = RequestForm::from_request(&req, payload).await?;
    let updated = update_from_form(db.get_ref(), &store, existing, form, ADMIN_UPDATE_RULES).await?;

    let body = with_skills(db.get_ref(), updated, &derived_context(&config)).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/admin/portfolios/{id}
pub async fn delete_portfolio(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = portfolio_db::delete_portfolio(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Portfolio not found"));
    }

    tracing::info!(portfolio_id = id, "portfolio deleted");
    Ok(HttpResponse::Ok().json(Deleted { deleted: true }))
}

/// POST /api/admin/portfolios/{id}/skills/sync — body `{skill_ids: [int]}`.
pub async fn sync_skills(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let existing = find_portfolio(db.get_ref(), path.into_inner()).await?;

    let form = RequestForm::from_request(&req, payload).await?;
    let validated = validate(form, SYNC_SKILLS_RULES).map_err(AppError::Validation)?;

    let mut skill_ids = Vec::new();
    let mut errors = ValidationErrors::new();
    for id in validated.integer_list("skill_ids").unwrap_or_default() {
        match i32::try_from(id) {
            Ok(id) => skill_ids.push(id),
            Err(_) => errors.add("skill_ids", format!("The selected skill id {id} is invalid.")),
        }
    }
    for id in skill_db::missing_skill_ids(db.get_ref(), &skill_ids).await? {
        errors.add("skill_ids", format!("The selected skill id {id} is invalid."));
    }
    errors.into_result()?;

    portfolio_db::sync_skills(db.get_ref(), existing.id, &skill_ids).await?;
    tracing::info!(portfolio_id = existing.id, skills = skill_ids.len(), "portfolio skills synced");

    let body = with_skills(db.get_ref(), existing, &derived_context(&config)).await?;
    Ok(HttpResponse::Ok().json(body))
}

async fn find_portfolio(db: &DatabaseConnection, id: i32) -> Result<portfolio::Model, AppError> {
    portfolio_db::get_portfolio_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found("Portfolio not found"))
}

async fn with_skills(
    db: &DatabaseConnection,
    item: portfolio::Model,
    ctx: &DerivedContext,
) -> Result<PortfolioWithSkills, AppError> {
    let mut items = portfolio_db::with_skills(db, vec![item], ctx).await?;
    items
        .pop()
        .ok_or_else(|| AppError::not_found("Portfolio not found"))
}
