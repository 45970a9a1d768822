use sea_orm::*;
use std::collections::BTreeSet;

use super::fetch_page;
use crate::models::skills::{self, CreateSkill, SkillStats, UpdateSkill};
use crate::models::Paginated;

/// Filters for the admin skill listing.
#[derive(Debug, Clone, Default)]
pub struct SkillFilter {
    /// Exact category match.
    pub category: Option<String>,
    pub popular_only: bool,
}

/// Insert a new skill.
pub async fn insert_skill(db: &DatabaseConnection, input: CreateSkill) -> Result<skills::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_skill = skills::ActiveModel {
        name: Set(input.name),
        category: Set(input.category),
        is_popular: Set(input.is_popular),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_skill.insert(db).await
}

pub async fn get_skill_by_id(db: &DatabaseConnection, id: i32) -> Result<Option<skills::Model>, DbErr> {
    skills::Entity::find_by_id(id).one(db).await
}

pub async fn find_skill_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<skills::Model>, DbErr> {
    skills::Entity::find()
        .filter(skills::Column::Name.eq(name))
        .one(db)
        .await
}

/// Whether another skill already uses `name`.
pub async fn name_taken(
    db: &DatabaseConnection,
    name: &str,
    except_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = skills::Entity::find().filter(skills::Column::Name.eq(name));
    if let Some(id) = except_id {
        query = query.filter(skills::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Ids from `ids` that have no skill row, in ascending order.
pub async fn missing_skill_ids(db: &DatabaseConnection, ids: &[i32]) -> Result<Vec<i32>, DbErr> {
    let wanted: BTreeSet<i32> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let found: BTreeSet<i32> = skills::Entity::find()
        .select_only()
        .column(skills::Column::Id)
        .filter(skills::Column::Id.is_in(wanted.iter().copied()))
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(wanted.difference(&found).copied().collect())
}

/// Every skill name, alphabetically.
pub async fn all_skill_names(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    skills::Entity::find()
        .select_only()
        .column(skills::Column::Name)
        .order_by_asc(skills::Column::Name)
        .into_tuple()
        .all(db)
        .await
}

pub async fn popular_skill_names(db: &DatabaseConnection) -> Result<Vec<String>, DbErr> {
    skills::Entity::find()
        .select_only()
        .column(skills::Column::Name)
        .filter(skills::Column::IsPopular.eq(true))
        .order_by_asc(skills::Column::Name)
        .into_tuple()
        .all(db)
        .await
}

pub async fn skills_by_category(
    db: &DatabaseConnection,
    category: &str,
) -> Result<Vec<skills::Model>, DbErr> {
    skills::Entity::find()
        .filter(skills::Column::Category.eq(category))
        .order_by_asc(skills::Column::Name)
        .all(db)
        .await
}

/// Totals and the distinct, non-null categories.
pub async fn skill_stats(db: &DatabaseConnection) -> Result<SkillStats, DbErr> {
    let total = skills::Entity::find().count(db).await?;
    let popular = skills::Entity::find()
        .filter(skills::Column::IsPopular.eq(true))
        .count(db)
        .await?;
    let categories: Vec<String> = skills::Entity::find()
        .select_only()
        .column(skills::Column::Category)
        .distinct()
        .filter(skills::Column::Category.is_not_null())
        .order_by_asc(skills::Column::Category)
        .into_tuple()
        .all(db)
        .await?;

    Ok(SkillStats {
        total,
        popular,
        categories,
    })
}

/// Admin listing, ordered by name.
pub async fn find_skills(
    db: &DatabaseConnection,
    filter: &SkillFilter,
    page: u64,
    per_page: u64,
) -> Result<Paginated<skills::Model>, DbErr> {
    let mut query = skills::Entity::find();
    if let Some(category) = filter.category.as_deref() {
        query = query.filter(skills::Column::Category.eq(category));
    }
    if filter.popular_only {
        query = query.filter(skills::Column::IsPopular.eq(true));
    }

    fetch_page(
        db,
        query
            .order_by_asc(skills::Column::Name)
            .order_by_asc(skills::Column::Id),
        page,
        per_page,
    )
    .await
}

/// Update an existing skill.
pub async fn update_skill(
    db: &DatabaseConnection,
    id: i32,
    input: UpdateSkill,
) -> Result<skills::Model, DbErr> {
    let item = skills::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Skill not found".to_string()))?;

    let mut active: skills::ActiveModel = item.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(category) = input.category {
        active.category = Set(category);
    }
    if let Some(is_popular) = input.is_popular {
        active.is_popular = Set(is_popular);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a skill; its portfolio links cascade.
pub async fn delete_skill(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    skills::Entity::delete_by_id(id).exec(db).await
}
