use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::derived_context;
use crate::auth::admin_key::AdminKey;
use crate::config::AppConfig;
use crate::db::portfolio::{self as portfolio_db, ListOrder, PortfolioFilter};
use crate::errors::AppError;
use crate::models::derived::DerivedContext;
use crate::models::portfolio::{
    self, CREATE_DEFAULTS, CreatePortfolio, PUBLIC_CREATE_RULES, PUBLIC_UPDATE_RULES,
    PortfolioDetail, UpdatePortfolio,
};
use crate::models::{ApiResponse, PaginationQuery};
use crate::storage::ImageStore;
use crate::validation::{FieldRule, RequestForm, ValidationErrors, Validated, validate};

/// Maximum length of a search or skill-filter term.
const MAX_TERM_CHARS: usize = 255;
const PROFILE_DIR: &str = "profiles";

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct SkillFilterQuery {
    pub skill: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/portfolios — paginated list with every relation loaded.
pub async fn list_portfolios(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    list_filtered(db.get_ref(), &config, PortfolioFilter::All, &query).await
}

/// GET /api/portfolios/search?q= — match on profile text or skill names.
pub async fn search_portfolios(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let term = required_term("q", query.q.as_deref())?;
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };

    list_filtered(db.get_ref(), &config, PortfolioFilter::Search(term), &pagination).await
}

/// GET /api/portfolios/filter?skill= — portfolios with a matching skill.
pub async fn filter_portfolios(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<SkillFilterQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let term = required_term("skill", query.skill.as_deref())?;
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };

    list_filtered(db.get_ref(), &config, PortfolioFilter::Skill(term), &pagination).await
}

async fn list_filtered(
    db: &DatabaseConnection,
    config: &AppConfig,
    filter: PortfolioFilter,
    pagination: &PaginationQuery,
) -> Result<HttpResponse, AppError> {
    let ctx = derived_context(config);
    let mut page = portfolio_db::find_portfolios(
        db,
        &filter,
        ListOrder::Oldest,
        pagination.page(),
        pagination.per_page(),
    )
    .await?;

    let rows = std::mem::take(&mut page.data);
    let details = portfolio_db::load_details(db, rows, &ctx).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::ok(page.with_data(details))))
}

fn required_term(field: &str, value: Option<&str>) -> Result<String, AppError> {
    let term = value.map(str::trim).unwrap_or_default();
    if term.is_empty() {
        return Err(AppError::invalid(field, format!("The {field} field is required.")));
    }
    if term.chars().count() > MAX_TERM_CHARS {
        return Err(AppError::invalid(
            field,
            format!("The {field} field must not be greater than {MAX_TERM_CHARS} characters."),
        ));
    }
    Ok(term.to_string())
}

/// GET /api/portfolios/stats — totals and skill/location histograms.
pub async fn portfolio_stats(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let stats = portfolio_db::portfolio_stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// GET /api/portfolios/{id}
pub async fn get_portfolio(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let detail = load_detail(db.get_ref(), id, &derived_context(&config)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(detail)))
}

/// POST /api/portfolios — envelope-style create (admin key required).
pub async fn create_portfolio(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<ImageStore>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let created = create_from_form(db.get_ref(), &store, form, PUBLIC_CREATE_RULES).await?;

    let detail = load_detail(db.get_ref(), created.id, &derived_context(&config)).await?;
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        detail,
        "Portfolio created successfully",
    )))
}

/// PUT /api/portfolios/{id} — envelope-style partial update (admin key required).
pub async fn update_portfolio(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<ImageStore>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let existing = portfolio_db::get_portfolio_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Portfolio not found"))?;

    let form = RequestForm::from_request(&req, payload).await?;
    update_from_form(db.get_ref(), &store, existing, form, PUBLIC_UPDATE_RULES).await?;

    let detail = load_detail(db.get_ref(), id, &derived_context(&config)).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        detail,
        "Portfolio updated successfully",
    )))
}

/// DELETE /api/portfolios/{id} (admin key required).
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
    Ok(HttpResponse::Ok().json(ApiResponse::message("Portfolio deleted successfully")))
}

async fn load_detail(
    db: &DatabaseConnection,
    id: i32,
    ctx: &DerivedContext,
) -> Result<PortfolioDetail, AppError> {
    portfolio_db::get_portfolio_detail(db, id, ctx)
        .await?
        .ok_or_else(|| AppError::not_found("Portfolio not found"))
}

// ── Shared write path (also used by the admin handlers) ──

/// Validate `form` against `rules`, store any uploaded image and insert the portfolio.
pub(crate) async fn create_from_form(
    db: &DatabaseConnection,
    store: &ImageStore,
    form: RequestForm,
    rules: &[FieldRule],
) -> Result<portfolio::Model, AppError> {
    let mut validated = validate(form, rules).map_err(AppError::Validation)?;
    validated.apply_defaults(CREATE_DEFAULTS);
    check_email(db, &validated, None).await?;

    let upload = validated.take_file("profile_image");
    let mut input = CreatePortfolio::from_validated(&validated);
    if let Some(file) = upload {
        input.profile_image = Some(store.store(PROFILE_DIR, &file).await?);
    }

    let created = portfolio_db::insert_portfolio(db, input).await?;
    tracing::info!(portfolio_id = created.id, "portfolio created");
    Ok(created)
}

/// Validate `form` as a partial update of `existing` and persist it.
pub(crate) async fn update_from_form(
    db: &DatabaseConnection,
    store: &ImageStore,
    existing: portfolio::Model,
    form: RequestForm,
    rules: &[FieldRule],
) -> Result<portfolio::Model, AppError> {
    let mut validated = validate(form, rules).map_err(AppError::Validation)?;
    check_email(db, &validated, Some(existing.id)).await?;

    let upload = validated.take_file("profile_image");
    let mut input = UpdatePortfolio::from_validated(&validated);
    if let Some(file) = upload {
        input.profile_image = Some(Some(store.store(PROFILE_DIR, &file).await?));
    }

    let updated = portfolio_db::update_portfolio(db, existing.id, input).await?;
    tracing::info!(portfolio_id = updated.id, "portfolio updated");
    Ok(updated)
}

async fn check_email(
    db: &DatabaseConnection,
    validated: &Validated,
    except_id: Option<i32>,
) -> Result<(), AppError> {
    let Some(email) = validated.text("email") else {
        return Ok(());
    };
    if portfolio_db::email_taken(db, &email, except_id).await? {
        return ValidationErrors::single("email", "The email has already been taken.").into_result();
    }
    Ok(())
}
