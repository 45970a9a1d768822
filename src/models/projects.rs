use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::derived::DerivedContext;
use super::portfolio::PortfolioRef;
use crate::validation::rules::normalize_string_list;
use crate::validation::{FieldDefault, FieldRule, Kind, Validated};

/// Ordered technology names, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Technologies(pub Vec<String>);

impl Technologies {
    /// Normalize request input: a native list of strings or a JSON-encoded one.
    /// Any other shape is rejected rather than treated as empty.
    pub fn from_input(value: &Value) -> Option<Self> {
        normalize_string_list(value).map(Self)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// SeaORM entity for the `projects` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub portfolio_id: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub technologies: Technologies,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
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
    FieldRule::required("title", Kind::Text { max: Some(255) }),
    FieldRule::required("description", Kind::Text { max: None }),
    FieldRule::nullable("technologies", Kind::StringList),
    FieldRule::nullable("live_url", Kind::Url),
    FieldRule::nullable("github_url", Kind::Url),
    FieldRule::nullable("featured", Kind::Boolean),
    FieldRule::nullable("sort_order", Kind::Integer),
    FieldRule::nullable("image", Kind::Image { max_kib: 4096 }),
];

pub const UPDATE_RULES: &[FieldRule] = &[
    CREATE_RULES[0].relaxed(),
    CREATE_RULES[1].relaxed(),
    CREATE_RULES[2].relaxed(),
    CREATE_RULES[3],
    CREATE_RULES[4],
    CREATE_RULES[5],
    CREATE_RULES[6],
    CREATE_RULES[7],
    CREATE_RULES[8],
];

pub const CREATE_DEFAULTS: &[(&str, FieldDefault)] = &[
    ("technologies", FieldDefault::EmptyList),
    ("featured", FieldDefault::False),
    ("sort_order", FieldDefault::Zero),
];

// ── DTOs ──

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProject {
    pub portfolio_id: i32,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub technologies: Technologies,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub sort_order: i32,
}

impl CreateProject {
    pub fn from_validated(form: &Validated) -> Option<Self> {
        Some(Self {
            portfolio_id: form.int32("portfolio_id")?,
            title: form.text("title")?,
            description: form.text("description")?,
            image: form.text("image"),
            technologies: form
                .value("technologies")
                .and_then(Technologies::from_input)
                .unwrap_or_default(),
            live_url: form.text("live_url"),
            github_url: form.text("github_url"),
            featured: form.boolean("featured").unwrap_or_default(),
            sort_order: form.int32("sort_order").unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateProject {
    pub portfolio_id: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<Option<String>>,
    pub technologies: Option<Technologies>,
    pub live_url: Option<Option<String>>,
    pub github_url: Option<Option<String>>,
    pub featured: Option<bool>,
    pub sort_order: Option<i32>,
}

impl UpdateProject {
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            portfolio_id: form.int32("portfolio_id"),
            title: form.text("title"),
            description: form.text("description"),
            image: form.nullable_text("image"),
            // An explicit null clears the list.
            technologies: form
                .value("technologies")
                .map(|v| Technologies::from_input(v).unwrap_or_default()),
            live_url: form.nullable_text("live_url"),
            github_url: form.nullable_text("github_url"),
            featured: form.boolean("featured"),
            sort_order: form.int32("sort_order"),
        }
    }
}

/// A project row plus its absolute image URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Model,
    pub image_url: Option<String>,
}

impl ProjectView {
    pub fn new(project: Model, ctx: &DerivedContext) -> Self {
        Self {
            image_url: ctx.image_url(project.image.as_deref()),
            project,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectWithPortfolio {
    #[serde(flatten)]
    pub project: ProjectView,
    pub portfolio: Option<PortfolioRef>,
}
