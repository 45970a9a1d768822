use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func};
use sea_orm::*;

use super::{contains_pattern, fetch_page};
use crate::models::education::{self, CreateEducation, UpdateEducation};
use crate::models::Paginated;

/// Substring filters for the admin education listing.
#[derive(Debug, Clone, Default)]
pub struct EducationFilter {
    pub institution: Option<String>,
    pub degree: Option<String>,
}

/// Insert a new education record.
pub async fn insert_education(
    db: &DatabaseConnection,
    input: CreateEducation,
) -> Result<education::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_education = education::ActiveModel {
        portfolio_id: Set(input.portfolio_id),
        institution: Set(input.institution),
        degree: Set(input.degree),
        field: Set(input.field),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        gpa: Set(input.gpa),
        sort_order: Set(input.sort_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_education.insert(db).await
}

pub async fn get_education_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<education::Model>, DbErr> {
    education::Entity::find_by_id(id).one(db).await
}

pub async fn find_education(
    db: &DatabaseConnection,
    filter: &EducationFilter,
    page: u64,
    per_page: u64,
) -> Result<Paginated<education::Model>, DbErr> {
    let mut query = education::Entity::find();

    let substring_filters = [
        (education::Column::Institution, filter.institution.as_deref()),
        (education::Column::Degree, filter.degree.as_deref()),
    ];
    for (column, term) in substring_filters {
        if let Some(term) = term.filter(|t| !t.trim().is_empty()) {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(column))).like(contains_pattern(term)),
            );
        }
    }

    fetch_page(db, query.order_by_desc(education::Column::Id), page, per_page).await
}

/// Update an existing education record.
pub async fn update_education(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateEducation,
) -> Result<education::Model, DbErr> {
    let item = education::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Education not found".to_string()))?;

    let mut active: education::ActiveModel = item.into();

    if let Some(portfolio_id) = input.portfolio_id {
        active.portfolio_id = Set(portfolio_id);
    }
    if let Some(institution) = input.institution {
        active.institution = Set(institution);
    }
    if let Some(degree) = input.degree {
        active.degree = Set(degree);
    }
    if let Some(field) = input.field {
        active.field = Set(field);
    }
    if let Some(start_date) = input.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = input.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(gpa) = input.gpa {
        active.gpa = Set(gpa);
    }
    if let Some(sort_order) = input.sort_order {
        active.sort_order = Set(sort_order);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn delete_education(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    education::Entity::delete_by_id(id).exec(db).await
}
