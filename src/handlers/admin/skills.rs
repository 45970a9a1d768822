use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use super::SKILLS_PER_PAGE;
use crate::auth::admin_key::AdminKey;
use crate::db::skills::{self as skill_db, SkillFilter};
use crate::errors::AppError;
use crate::handlers::skills::create_from_form;
use crate::models::skills::{UPDATE_RULES, UpdateSkill};
use crate::models::{Deleted, PaginationQuery, query_flag};
use crate::validation::{RequestForm, ValidationErrors, validate};

#[derive(Debug, Deserialize)]
pub struct SkillListQuery {
    pub category: Option<String>,
    pub popular: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

/// GET /api/admin/skills — by name, 50 per page.
pub async fn list_skills(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    query: web::Query<SkillListQuery>,
) -> Result<HttpResponse, AppError> {
    let query = query.into_inner();
    let pagination = PaginationQuery {
        page: query.page,
        per_page: query.per_page,
    };
    let filter = SkillFilter {
        category: query.category.filter(|c| !c.trim().is_empty()),
        popular_only: query_flag(query.popular.as_deref()),
    };

    let page = skill_db::find_skills(
        db.get_ref(),
        &filter,
        pagination.page(),
        pagination.per_page_or(SKILLS_PER_PAGE),
    )
    .await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/admin/skills
pub async fn create_skill(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let skill = create_from_form(db.get_ref(), form).await?;
    Ok(HttpResponse::Created().json(skill))
}

/// PUT /api/admin/skills/{id}
pub async fn update_skill(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    skill_db::get_skill_by_id(db.get_ref(), id)
        .await?
        .ok_or_else(|| AppError::not_found("Skill not found"))?;

    let form = RequestForm::from_request(&req, payload).await?;
    let validated = validate(form, UPDATE_RULES).map_err(AppError::Validation)?;
    let input = UpdateSkill::from_validated(&validated);

    if let Some(name) = input.name.as_deref() {
        if skill_db::name_taken(db.get_ref(), name, Some(id)).await? {
            return Err(AppError::Validation(ValidationErrors::single(
                "name",
                "The name has already been taken.",
            )));
        }
    }

    let updated = skill_db::update_skill(db.get_ref(), id, input).await?;
    tracing::info!(skill_id = id, "skill updated");
    Ok(HttpResponse::Ok().json(updated))
}

/// DELETE /api/admin/skills/{id} — portfolio links to it are removed too.
pub async fn delete_skill(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let result = skill_db::delete_skill(db.get_ref(), id).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Skill not found"));
    }

    tracing::info!(skill_id = id, "skill deleted");
    Ok(HttpResponse::Ok().json(Deleted { deleted: true }))
}
