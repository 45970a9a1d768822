use actix_web::{HttpRequest, HttpResponse, web};
use sea_orm::DatabaseConnection;
use serde::Deserialize;

use crate::auth::admin_key::AdminKey;
use crate::db::skills as skill_db;
use crate::errors::AppError;
use crate::models::ApiResponse;
use crate::models::skills::{self, CREATE_DEFAULTS, CREATE_RULES, CreateSkill};
use crate::validation::{RequestForm, ValidationErrors, validate};

#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

/// GET /api/skills — every skill name, alphabetically.
pub async fn list_skill_names(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let names = skill_db::all_skill_names(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(names)))
}

/// GET /api/skills/popular
pub async fn popular_skills(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let names = skill_db::popular_skill_names(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(names)))
}

/// GET /api/skills/category?category= — full skill rows in one category.
pub async fn skills_by_category(
    db: web::Data<DatabaseConnection>,
    query: web::Query<CategoryQuery>,
) -> Result<HttpResponse, AppError> {
    let category = query.category.as_deref().map(str::trim).unwrap_or_default();
    if category.is_empty() {
        return Err(AppError::invalid("category", "The category field is required."));
    }
    if category.chars().count() > 255 {
        return Err(AppError::invalid(
            "category",
            "The category field must not be greater than 255 characters.",
        ));
    }

    let skills = skill_db::skills_by_category(db.get_ref(), category).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(skills)))
}

/// GET /api/skills/stats
pub async fn skill_stats(db: web::Data<DatabaseConnection>) -> Result<HttpResponse, AppError> {
    let stats = skill_db::skill_stats(db.get_ref()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(stats)))
}

/// POST /api/skills (admin key required).
pub async fn create_skill(
    _admin: AdminKey,
    db: web::Data<DatabaseConnection>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, AppError> {
    let form = RequestForm::from_request(&req, payload).await?;
    let skill = create_from_form(db.get_ref(), form).await?;

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        skill,
        "Skill created successfully",
    )))
}

/// Validate and insert a skill; shared with the admin API.
pub(crate) async fn create_from_form(
    db: &DatabaseConnection,
    form: RequestForm,
) -> Result<skills::Model, AppError> {
    let mut validated = validate(form, CREATE_RULES).map_err(AppError::Validation)?;
    validated.apply_defaults(CREATE_DEFAULTS);

    let input = CreateSkill::from_validated(&validated);
    if skill_db::name_taken(db, &input.name, None).await? {
        return Err(AppError::Validation(ValidationErrors::single(
            "name",
            "The name has already been taken.",
        )));
    }

    let skill = skill_db::insert_skill(db, input).await?;
    tracing::info!(skill_id = skill.id, name = %skill.name, "skill created");
    Ok(skill)
}
