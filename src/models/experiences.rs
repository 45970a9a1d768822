use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::derived::{DerivedContext, experience_duration};
use super::portfolio::PortfolioRef;
use crate::validation::{FieldDefault, FieldRule, Kind, Validated};

/// SeaORM entity for the `experiences` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "experiences")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub portfolio_id: i32,
    pub company: String,
    pub position: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub is_current_role: bool,
    pub sort_order: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::portfolio::Entity",
        from = "Column::PortfolioId",
        to = "super::portfolio::Column::Id",
        on_delete = "Cascade"
    )]
    Portfolio,
}

impl Related<super::portfolio::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Portfolio.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── Request rules ──

pub const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("portfolio_id", Kind::Integer),
    FieldRule::required("company", Kind::Text { max: Some(255) }),
    FieldRule::required("position", Kind::Text { max: Some(255) }),
    FieldRule::required("start_date", Kind::Date),
    FieldRule::nullable("end_date", Kind::Date),
    FieldRule::nullable("description", Kind::Text { max: None }),
    FieldRule::nullable("is_current_role", Kind::Boolean),
    FieldRule::nullable("sort_order", Kind::Integer),
];

pub const UPDATE_RULES: &[FieldRule] = &[
    CREATE_RULES[0].relaxed(),
    CREATE_RULES[1].relaxed(),
    CREATE_RULES[2].relaxed(),
    CREATE_RULES[3].relaxed(),
    CREATE_RULES[4],
    CREATE_RULES[5],
    CREATE_RULES[6],
    CREATE_RULES[7],
];

pub const CREATE_DEFAULTS: &[(&str, FieldDefault)] = &[
    ("description", FieldDefault::EmptyText),
    ("is_current_role", FieldDefault::False),
    ("sort_order", FieldDefault::Zero),
];

// ── DTOs ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateExperience {
    pub portfolio_id: i32,
    pub company: String,
    pub position: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub description: String,
    pub is_current_role: bool,
    pub sort_order: i32,
}

impl CreateExperience {
    /// `None` when a required field failed to convert (e.g. an id outside `i32`).
    pub fn from_validated(form: &Validated) -> Option<Self> {
        Some(Self {
            portfolio_id: form.int32("portfolio_id")?,
            company: form.text("company")?,
            position: form.text("position")?,
            start_date: form.date("start_date")?,
            end_date: form.date("end_date"),
            description: form.text("description").unwrap_or_default(),
            is_current_role: form.boolean("is_current_role").unwrap_or_default(),
            sort_order: form.int32("sort_order").unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateExperience {
    pub portfolio_id: Option<i32>,
    pub company: Option<String>,
    pub position: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Option<Date>>,
    pub description: Option<String>,
    pub is_current_role: Option<bool>,
    pub sort_order: Option<i32>,
}

impl UpdateExperience {
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            portfolio_id: form.int32("portfolio_id"),
            company: form.text("company"),
            position: form.text("position"),
            start_date: form.date("start_date"),
            end_date: form.nullable_date("end_date"),
            description: form.nullable_text("description").map(Option::unwrap_or_default),
            is_current_role: form.boolean("is_current_role"),
            sort_order: form.int32("sort_order"),
        }
    }
}

/// An experience row plus its human-readable duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceView {
    #[serde(flatten)]
    pub experience: Model,
    pub duration: String,
}

impl ExperienceView {
    pub fn new(experience: Model, ctx: &DerivedContext) -> Self {
        let duration = experience_duration(experience.start_date, experience.end_date, ctx.today);
        Self {
            experience,
            duration,
        }
    }
}

/// Admin listing shape with the owning portfolio preloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceWithPortfolio {
    #[serde(flatten)]
    pub experience: ExperienceView,
    pub portfolio: Option<PortfolioRef>,
}
