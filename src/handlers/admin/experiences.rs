use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::{ADMIN_PER_PAGE, check_portfolio_ref, unprocessable};
use crate::auth::admin_key::AdminKey;
use crate::config::AppConfig;
use crate::db::experiences as experience_db;
use crate::db::portfolio as portfolio_db;
use crate::errors::AppError;
use crate::handlers::derived_context;
use crate::models::experiences::{
    CREATE_DEFAULTS, CREATE_RULES, CreateExperience, ExperienceView, ExperienceWithPortfolio,
    UPDATE_RULES, UpdateExperience,
};
use crate::models::{Deleted, PaginationQuery, query_flag};
use crate::validation::{RequestForm, validate};

#[derive(Debug, Deserialize)]
pub struct ExperienceListQuery {
    pub current: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/admin/experiences — newest first, `?current=1` for current roles.
pub async fn list_experiences(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<ExperienceListQuery>,
) -> Result<HttpResponse, AppError> {
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let mut page = experience_db::find_experiences(
        db.get_ref(),
        query_flag(query.current.as_deref()),
        pagination.page(),
        pagination.per_page_or(ADMIN_PER_PAGE),
    )
    .await?;

    let rows = std::mem::take(&mut page.data);
    let ids = rows.iter().map(|r| r.portfolio_id).collect();
    let refs = portfolio_db::portfolio_refs(db.get_ref(), ids).await?;
    let ctx = derived_context(&config);

    let items: Vec<ExperienceWithPortfolio> = rows
        .into_iter()
        .map(|row| ExperienceWithPortfolio {
            portfolio: refs.get(&row.portfolio_id).cloned(),
            experience: ExperienceView::new(row, &ctx),
        })
        .collect();
    Ok(HttpResponse::Ok().json(page.with_data(items)))
}

/// POST /api/admin/experiences
pub async fn create_experience(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let mut validated = validate(form, CREATE_RULES).map_err(AppError::Validation)?;
    validated.apply_defaults(CREATE_DEFAULTS);
    check_portfolio_ref(db.get_ref(), &validated).await?;

    let input = CreateExperience::from_validated(&validated).ok_or_else(unprocessable)?;
    let created = experience_db::insert_experience(db.get_ref(), input).await?;
    tracing::info!(
        experience_id = created.id,
        portfolio_id = created.portfolio_id,
        "experience created"
    );

    Ok(HttpResponse::Created().json(ExperienceView::new(created, &derived_context(&config))))
}

/// PUT /api/admin/experiences/{id}
pub async fn update_experience(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    experience_db::get_experience_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Experience not found"))?;

    let form = RequestForm::from_request(&req, payload).await?;
    let validated = validate(form, UPDATE_RULES).map_err(AppError::Validation)?;
    check_portfolio_ref(db.get_ref(), &validated).await?;

    let updated =
        experience_db::update_experience(db.get_ref(), id, UpdateExperience::from_validated(&validated))
            .await?;
    tracing::info!(experience_id = id, "experience updated");

    Ok(HttpResponse::Ok().json(ExperienceView::new(updated, &derived_context(&config))))
}

/// DELETE /api/admin/experiences/{id}
pub async fn delete_experience(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = experience_db::delete_experience(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Experience not found"));
    }

    tracing::info!(experience_id = id, "experience deleted");
    Ok(HttpResponse::Ok().json(Deleted { deleted: true }))
}
