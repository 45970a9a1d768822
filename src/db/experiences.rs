use sea_orm::*;

use super::fetch_page;
use crate::models::experiences::{self, CreateExperience, UpdateExperience};
use crate::models::Paginated;

/// Insert a new experience.
pub async fn insert_experience(
    db: &DatabaseConnection,
    input: CreateExperience,
) -> Result<experiences::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_experience = experiences::ActiveModel {
        portfolio_id: Set(input.portfolio_id),
        company: Set(input.company),
        position: Set(input.position),
        start_date: Set(input.start_date),
        end_date: Set(input.end_date),
        description: Set(input.description),
        is_current_role: Set(input.is_current_role),
        sort_order: Set(input.sort_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_experience.insert(db).await
}

pub async fn get_experience_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<experiences::Model>, DbErr> {
    experiences::Entity::find_by_id(id).one(db).await
}

/// Newest first; `current_only` keeps roles flagged as current.
pub async fn find_experiences(
    db: &DatabaseConnection,
    current_only: bool,
    page: u64,
    per_page: u64,
) -> Result<Paginated<experiences::Model>, DbErr> {
    let mut query = experiences::Entity::find();
    if current_only {
        query = query.filter(experiences::Column::IsCurrentRole.eq(true));
    }

    fetch_page(
        db,
        query.order_by_desc(experiences::Column::Id),
        page,
        per_page,
    )
    .await
}

/// Update an existing experience.
pub async fn update_experience(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateExperience,
) -> Result<experiences::Model, DbErr> {
    let item = experiences::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Experience not found".to_string()))?;

    let mut active: experiences::ActiveModel = item.into();

    if let Some(portfolio_id) = input.portfolio_id {
        active.portfolio_id = Set(portfolio_id);
    }
    if let Some(company) = input.company {
        active.company = Set(company);
    }
    if let Some(position) = input.position {
        active.position = Set(position);
    }
    if let Some(start_date) = input.start_date {
        active.start_date = Set(start_date);
    }
    if let Some(end_date) = input.end_date {
        active.end_date = Set(end_date);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(is_current_role) = input.is_current_role {
        active.is_current_role = Set(is_current_role);
    }
    if let Some(sort_order) = input.sort_order {
        active.sort_order = Set(sort_order);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn delete_experience(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    experiences::Entity::delete_by_id(id).exec(db).await
}
