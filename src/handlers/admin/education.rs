use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::{ADMIN_PER_PAGE, check_portfolio_ref, unprocessable};
use crate::auth::admin_key::AdminKey;
use crate::db::education::{self as education_db, EducationFilter};
use crate::db::portfolio as portfolio_db;
use crate::errors::AppError;
use crate::models::education::{
    CREATE_DEFAULTS, CREATE_RULES, CreateEducation, EducationView, EducationWithPortfolio,
    UPDATE_RULES, UpdateEducation,
};
use crate::models::{Deleted, PaginationQuery};
use crate::validation::{RequestForm, validate};

#[derive(Debug, Deserialize)]
pub struct EducationListQuery {
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/admin/education — newest first, optional `?institution=` / `?degree=` substrings.
pub async fn list_education(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    query: web::Query<EducationListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = EducationFilter {
        institution: query.institution,
        degree: query.degree,
    };

    let mut page = education_db::find_education(
        db.get_ref(),
        &filter,
        pagination.page(),
        pagination.per_page_or(ADMIN_PER_PAGE),
    )
    .await?;

    let rows = std::mem::take(&mut page.data);
    let ids = rows.iter().map(|r| r.portfolio_id).collect();
    let refs = portfolio_db::portfolio_refs(db.get_ref(), ids).await?;

    let items: Vec<EducationWithPortfolio> = rows
        .into_iter()
        .map(|row| EducationWithPortfolio {
            portfolio: refs.get(&row.portfolio_id).cloned(),
            education: EducationView::from(row),
        })
        .collect();
    Ok(HttpResponse::Ok().json(page.with_data(items)))
}

/// POST /api/admin/education
pub async fn create_education(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let mut validated = validate(form, CREATE_RULES).map_err(AppError::Validation)?;
    validated.apply_defaults(CREATE_DEFAULTS);
    check_portfolio_ref(db.get_ref(), &validated).await?;

    let input = CreateEducation::from_validated(&validated).ok_or_else(unprocessable)?;
    let created = education_db::insert_education(db.get_ref(), input).await?;
    tracing::info!(
        education_id = created.id,
        portfolio_id = created.portfolio_id,
        "education created"
    );

    Ok(HttpResponse::Created().json(EducationView::from(created)))
}

/// PUT /api/admin/education/{id}
pub async fn update_education(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    education_db::get_education_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Education not found"))?;

    let form = RequestForm::from_request(&req, payload).await?;
    let validated = validate(form, UPDATE_RULES).map_err(AppError::Validation)?;
    check_portfolio_ref(db.get_ref(), &validated).await?;

    let updated =
        education_db::update_education(db.get_ref(), id, UpdateEducation::from_validated(&validated))
            .await?;
    tracing::info!(education_id = id, "education updated");

    Ok(HttpResponse::Ok().json(EducationView::from(updated)))
}

/// DELETE /api/admin/education/{id}
pub async fn delete_education(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = education_db::delete_education(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Education not found"));
    }

    tracing::info!(education_id = id, "education deleted");
    Ok(HttpResponse::Ok().json(Deleted { deleted: true }))
}
