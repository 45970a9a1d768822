use sea_orm::*;

use super::fetch_page;
use crate::models::projects::{self, CreateProject, UpdateProject};
use crate::models::Paginated;

/// Insert a new project.
pub async fn insert_project(
    db: &DatabaseConnection,
    input: CreateProject,
) -> Result<projects::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_project = projects::ActiveModel {
        portfolio_id: Set(input.portfolio_id),
        title: Set(input.title),
        description: Set(input.description),
        image: Set(input.image),
        technologies: Set(input.technologies),
        live_url: Set(input.live_url),
        github_url: Set(input.github_url),
        featured: Set(input.featured),
        sort_order: Set(input.sort_order),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_project.insert(db).await
}

pub async fn get_project_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<projects::Model>, DbErr> {
    projects::Entity::find_by_id(id).one(db).await
}

/// Newest first; `featured_only` keeps featured projects.
pub async fn find_projects(
    db: &DatabaseConnection,
    featured_only: bool,
    page: u64,
    per_page: u64,
) -> Result<Paginated<projects::Model>, DbErr> {
    let mut query = projects::Entity::find();
    if featured_only {
        query = query.filter(projects::Column::Featured.eq(true));
    }

    fetch_page(db, query.order_by_desc(projects::Column::Id), page, per_page).await
}

/// Update an existing project.
pub async fn update_project(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateProject,
) -> Result<projects::Model, DbErr> {
    let item = projects::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Project not found".to_string()))?;

    let mut active: projects::ActiveModel = item.into();

    if let Some(portfolio_id) = input.portfolio_id {
        active.portfolio_id = Set(portfolio_id);
    }
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(description) = input.description {
        active.description = Set(description);
    }
    if let Some(image) = input.image {
        active.image = Set(image);
    }
    if let Some(technologies) = input.technologies {
        active.technologies = Set(technologies);
    }
    if let Some(live_url) = input.live_url {
        active.live_url = Set(live_url);
    }
    if let Some(github_url) = input.github_url {
        active.github_url = Set(github_url);
    }
    if let Some(featured) = input.featured {
        active.featured = Set(featured);
    }
    if let Some(sort_order) = input.sort_order {
        active.sort_order = Set(sort_order);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

pub async fn delete_project(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    projects::Entity::delete_by_id(id).exec(db).await
}
