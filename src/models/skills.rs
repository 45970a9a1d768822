use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::validation::{FieldDefault, FieldRule, Kind, Validated};

/// SeaORM entity for the `skills` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "skills")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub category: Option<String>,
    pub is_popular: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::portfolio_skills::Entity")]
    PortfolioSkills,
}

impl Related<super::portfolio_skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PortfolioSkills.def()
    }
}

impl Related<super::portfolio::Entity> for Entity {
    fn to() -> RelationDef {
        super::portfolio_skills::Relation::Portfolio.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::portfolio_skills::Relation::Skill.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── Request rules ──

pub const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("name", Kind::Text { max: Some(255) }),
    FieldRule::nullable("category", Kind::Text { max: Some(255) }),
    FieldRule::nullable("is_popular", Kind::Boolean),
];

pub const UPDATE_RULES: &[FieldRule] = &[
    CREATE_RULES[0].relaxed(),
    CREATE_RULES[1],
    CREATE_RULES[2],
];

pub const CREATE_DEFAULTS: &[(&str, FieldDefault)] = &[("is_popular", FieldDefault::False)];

// ── DTOs ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSkill {
    pub name: String,
    pub category: Option<String>,
    pub is_popular: bool,
}

impl CreateSkill {
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            name: form.text("name").unwrap_or_default(),
            category: form.text("category"),
            is_popular: form.boolean("is_popular").unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub category: Option<Option<String>>,
    pub is_popular: Option<bool>,
}

impl UpdateSkill {
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            name: form.text("name"),
            category: form.nullable_text("category"),
            // A null flag keeps the stored value.
            is_popular: form.boolean("is_popular"),
        }
    }
}

/// `{id, name}` as preloaded on admin portfolio rows.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct SkillRef {
    pub id: i32,
    pub name: String,
}

/// Proficiency carried by the portfolio ↔ skill link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPivot {
    pub portfolio_id: i32,
    pub skill_id: i32,
    pub proficiency_level: i32,
}

/// A skill as attached to one portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedSkill {
    #[serde(flatten)]
    pub skill: Model,
    pub pivot: SkillPivot,
}

/// Aggregate counts for `GET /skills/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillStats {
    pub total: u64,
    pub popular: u64,
    pub categories: Vec<String>,
}
