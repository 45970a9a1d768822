use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::{ADMIN_PER_PAGE, check_portfolio_ref, unprocessable};
use crate::auth::admin_key::AdminKey;
use crate::config::AppConfig;
use crate::db::portfolio as portfolio_db;
use crate::db::projects as project_db;
use crate::errors::AppError;
use crate::handlers::derived_context;
use crate::models::derived::DerivedContext;
use crate::models::projects::{
    self, CREATE_DEFAULTS, CREATE_RULES, CreateProject, ProjectView, ProjectWithPortfolio,
    UPDATE_RULES, UpdateProject,
};
use crate::models::{Deleted, PaginationQuery, query_flag};
use crate::storage::ImageStore;
use crate::validation::{RequestForm, validate};

const PROJECT_DIR: &str = "projects";

#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub featured: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/admin/projects — newest first, `?featured=1` for featured only.
pub async fn list_projects(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    query: web::Query<ProjectListQuery>,
) -> Result<HttpResponse, AppError> {
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let mut page = project_db::find_projects(
        db.get_ref(),
        query_flag(query.featured.as_deref()),
        pagination.page(),
        pagination.per_page_or(ADMIN_PER_PAGE),
    )
    .await?;

    let rows = std::mem::take(&mut page.data);
    let items = with_portfolio(db.get_ref(), rows, &derived_context(&config)).await?;
    Ok(HttpResponse::Ok().json(page.with_data(items)))
}

/// POST /api/admin/projects — JSON or multipart with an `image` file.
pub async fn create_project(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<ImageStore>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let mut validated = validate(form, CREATE_RULES).map_err(AppError::Validation)?;
    validated.apply_defaults(CREATE_DEFAULTS);
    check_portfolio_ref(db.get_ref(), &validated).await?;

    let upload = validated.take_file("image");
    let mut input = CreateProject::from_validated(&validated).ok_or_else(unprocessable)?;
    if let Some(file) = upload {
        input.image = Some(store.store(PROJECT_DIR, &file).await?);
    }

    let created = project_db::insert_project(db.get_ref(), input).await?;
    tracing::info!(project_id = created.id, portfolio_id = created.portfolio_id, "project created");

    let body = single_with_portfolio(db.get_ref(), created, &derived_context(&config)).await?;
    Ok(HttpResponse::Created().json(body))
}

/// PUT /api/admin/projects/{id} — partial update; no file keeps the current image.
pub async fn update_project(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    store: web::Data<ImageStore>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    project_db::get_project_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Project not found"))?;

    let form = RequestForm::from_request(&req, payload).await?;
    let mut validated = validate(form, UPDATE_RULES).map_err(AppError::Validation)?;
    check_portfolio_ref(db.get_ref(), &validated).await?;

    let upload = validated.take_file("image");
    let mut input = UpdateProject::from_validated(&validated);
    if let Some(file) = upload {
        input.image = Some(Some(store.store(PROJECT_DIR, &file).await?));
    }

    let updated = project_db::update_project(db.get_ref(), id, input).await?;
    tracing::info!(project_id = id, "project updated");

    let body = single_with_portfolio(db.get_ref(), updated, &derived_context(&config)).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// DELETE /api/admin/projects/{id}
pub async fn delete_project(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = project_db::delete_project(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Project not found"));
    }

    tracing::info!(project_id = id, "project deleted");
    Ok(HttpResponse::Ok().json(Deleted { deleted: true }))
}

async fn with_portfolio(
    db: &DatabaseConnection,
    rows: Vec<projects::Model>,
    ctx: &DerivedContext,
) -> Result<Vec<ProjectWithPortfolio>, AppError> {
    let ids = rows.iter().map(|r| r.portfolio_id).collect();
    let refs = portfolio_db::portfolio_refs(db, ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| ProjectWithPortfolio {
            portfolio: refs.get(&row.portfolio_id).cloned(),
            project: ProjectView::new(row, ctx),
        })
        .collect())
}

async fn single_with_portfolio(
    db: &DatabaseConnection,
    row: projects::Model,
    ctx: &DerivedContext,
) -> Result<ProjectWithPortfolio, AppError> {
    let mut items = with_portfolio(db, vec![row], ctx).await?;
    items.pop().ok_or_else(|| AppError::not_found("Project not found"))
}
