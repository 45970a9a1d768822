use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::derived::education_duration;
use super::portfolio::PortfolioRef;
use crate::validation::{FieldDefault, FieldRule, Kind, Validated};

/// SeaORM entity for the `education` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "education")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub portfolio_id: i32,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: Date,
    pub end_date: Date,
    pub gpa: Option<String>,
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

// Unlike experiences, an education record always has an end date.
pub const CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("portfolio_id", Kind::Integer),
    FieldRule::required("institution", Kind::Text { max: Some(255) }),
    FieldRule::required("degree", Kind::Text { max: Some(255) }),
    FieldRule::required("field", Kind::Text { max: Some(255) }),
    FieldRule::required("start_date", Kind::Date),
    FieldRule::required("end_date", Kind::Date),
    FieldRule::nullable("gpa", Kind::Text { max: Some(10) }),
    FieldRule::nullable("sort_order", Kind::Integer),
];

pub const UPDATE_RULES: &[FieldRule] = &[
    CREATE_RULES[0].relaxed(),
    CREATE_RULES[1].relaxed(),
    CREATE_RULES[2].relaxed(),
    CREATE_RULES[3].relaxed(),
    CREATE_RULES[4].relaxed(),
    CREATE_RULES[5].relaxed(),
    CREATE_RULES[6],
    CREATE_RULES[7],
];

pub const CREATE_DEFAULTS: &[(&str, FieldDefault)] = &[("sort_order", FieldDefault::Zero)];

// ── DTOs ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEducation {
    pub portfolio_id: i32,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub start_date: Date,
    pub end_date: Date,
    pub gpa: Option<String>,
    pub sort_order: i32,
}

impl CreateEducation {
    pub fn from_validated(form: &Validated) -> Option<Self> {
        Some(Self {
            portfolio_id: form.int32("portfolio_id")?,
            institution: form.text("institution")?,
            degree: form.text("degree")?,
            field: form.text("field")?,
            start_date: form.date("start_date")?,
            end_date: form.date("end_date")?,
            gpa: form.text("gpa"),
            sort_order: form.int32("sort_order").unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateEducation {
    pub portfolio_id: Option<i32>,
    pub institution: Option<String>,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub gpa: Option<Option<String>>,
    pub sort_order: Option<i32>,
}

impl UpdateEducation {
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            portfolio_id: form.int32("portfolio_id"),
            institution: form.text("institution"),
            degree: form.text("degree"),
            field: form.text("field"),
            start_date: form.date("start_date"),
            end_date: form.date("end_date"),
            gpa: form.nullable_text("gpa"),
            sort_order: form.int32("sort_order"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationView {
    #[serde(flatten)]
    pub education: Model,
    pub duration: String,
}

impl From<Model> for EducationView {
    fn from(education: Model) -> Self {
        let duration = education_duration(education.start_date, education.end_date);
        Self {
            education,
            duration,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationWithPortfolio {
    #[serde(flatten)]
    pub education: EducationView,
    pub portfolio: Option<PortfolioRef>,
}
