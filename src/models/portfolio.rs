use sea_orm::FromQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::derived::DerivedContext;
use super::education::EducationView;
use super::experiences::ExperienceView;
use super::projects::ProjectView;
use super::skills::{LinkedSkill, SkillRef};
use crate::validation::{FieldDefault, FieldRule, Kind, Validated};

/// Named profile links (`linkedin`, `github`, `website`, ...), stored as a JSON object.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct SocialLinks(pub BTreeMap<String, String>);

/// SeaORM entity for the `portfolios` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "portfolios")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub title: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub location: String,
    #[sea_orm(column_type = "Text")]
    pub bio: String,
    pub profile_image: Option<String>,
    #[sea_orm(column_type = "Json", nullable)]
    pub social_links: Option<SocialLinks>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::experiences::Entity")]
    Experiences,
    #[sea_orm(has_many = "super::projects::Entity")]
    Projects,
    #[sea_orm(has_many = "super::education::Entity")]
    Education,
    #[sea_orm(has_many = "super::portfolio_skills::Entity")]
    PortfolioSkills,
}

impl Related<super::experiences::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Experiences.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::education::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Education.def()
    }
}

impl Related<super::portfolio_skills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PortfolioSkills.def()
    }
}

impl Related<super::skills::Entity> for Entity {
    fn to() -> RelationDef {
        super::portfolio_skills::Relation::Skill.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::portfolio_skills::Relation::Portfolio.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── Request rules ──

const SOCIAL_LINKS: FieldRule = FieldRule::nullable("social_links", Kind::UrlMap);

/// Rules for the envelope-style `POST /portfolios`.
pub const PUBLIC_CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("name", Kind::Text { max: Some(255) }),
    FieldRule::required("title", Kind::Text { max: Some(255) }),
    FieldRule::required("email", Kind::Email { max: 255 }),
    FieldRule::required("phone", Kind::Text { max: Some(20) }),
    FieldRule::required("location", Kind::Text { max: Some(255) }),
    FieldRule::required("bio", Kind::Text { max: None }),
    FieldRule::nullable("profile_image", Kind::Image { max_kib: 3072 }),
    SOCIAL_LINKS,
];

pub const PUBLIC_UPDATE_RULES: &[FieldRule] = &[
    PUBLIC_CREATE_RULES[0].relaxed(),
    PUBLIC_CREATE_RULES[1].relaxed(),
    PUBLIC_CREATE_RULES[2].relaxed(),
    PUBLIC_CREATE_RULES[3].relaxed(),
    PUBLIC_CREATE_RULES[4].relaxed(),
    PUBLIC_CREATE_RULES[5].relaxed(),
    PUBLIC_CREATE_RULES[6],
    SOCIAL_LINKS,
];

/// Rules for `POST /admin/portfolios` (multipart with a `profile_image` file).
pub const ADMIN_CREATE_RULES: &[FieldRule] = &[
    FieldRule::required("name", Kind::Text { max: Some(255) }),
    FieldRule::required("title", Kind::Text { max: Some(255) }),
    FieldRule::required("email", Kind::Email { max: 255 }),
    FieldRule::required("phone", Kind::Text { max: Some(255) }),
    FieldRule::required("location", Kind::Text { max: Some(255) }),
    FieldRule::nullable("bio", Kind::Text { max: None }),
    FieldRule::nullable("profile_image", Kind::Image { max_kib: 3072 }),
    SOCIAL_LINKS,
];

pub const ADMIN_UPDATE_RULES: &[FieldRule] = &[
    ADMIN_CREATE_RULES[0].relaxed(),
    ADMIN_CREATE_RULES[1].relaxed(),
    ADMIN_CREATE_RULES[2].relaxed(),
    ADMIN_CREATE_RULES[3].relaxed(),
    ADMIN_CREATE_RULES[4].relaxed(),
    ADMIN_CREATE_RULES[5],
    ADMIN_CREATE_RULES[6],
    SOCIAL_LINKS,
];

pub const CREATE_DEFAULTS: &[(&str, FieldDefault)] = &[("bio", FieldDefault::EmptyText)];

pub const SYNC_SKILLS_RULES: &[FieldRule] =
    &[FieldRule::nullable("skill_ids", Kind::IntegerList)];

// ── DTOs ──

#[derive(Debug, Clone, PartialEq)]
pub struct CreatePortfolio {
    pub name: String,
    pub title: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub bio: String,
    pub profile_image: Option<String>,
    pub social_links: Option<SocialLinks>,
}

impl CreatePortfolio {
    /// Build from a validated create form; the caller has already applied [`CREATE_DEFAULTS`]
    /// and resolved any uploaded image into `profile_image`.
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            name: form.text("name").unwrap_or_default(),
            title: form.text("title").unwrap_or_default(),
            email: form.text("email").unwrap_or_default(),
            phone: form.text("phone").unwrap_or_default(),
            location: form.text("location").unwrap_or_default(),
            bio: form.text("bio").unwrap_or_default(),
            profile_image: form.text("profile_image"),
            social_links: form.string_map("social_links").flatten().map(SocialLinks),
        }
    }
}

/// Partial update. Outer `None` leaves a column untouched; `Some(None)` clears a nullable one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdatePortfolio {
    pub name: Option<String>,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<Option<String>>,
    pub social_links: Option<Option<SocialLinks>>,
}

impl UpdatePortfolio {
    pub fn from_validated(form: &Validated) -> Self {
        Self {
            name: form.text("name"),
            title: form.text("title"),
            email: form.text("email"),
            phone: form.text("phone"),
            location: form.text("location"),
            // bio is NOT NULL; an explicit null clears it to empty text.
            bio: form
                .nullable_text("bio")
                .map(|bio| bio.unwrap_or_default()),
            profile_image: form.nullable_text("profile_image"),
            social_links: form
                .string_map("social_links")
                .map(|links| links.map(SocialLinks)),
        }
    }
}

/// Minimal `{id, name, title}` row for `GET /admin/portfolios?simple=1`.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub id: i32,
    pub name: String,
    pub title: String,
}

/// `{id, name}` preloaded on child records in admin listings.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, Serialize, Deserialize)]
pub struct PortfolioRef {
    pub id: i32,
    pub name: String,
}

/// A portfolio with every child collection loaded and derived fields computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioDetail {
    #[serde(flatten)]
    pub portfolio: Model,
    pub profile_image_url: Option<String>,
    pub skills: Vec<LinkedSkill>,
    pub experiences: Vec<ExperienceView>,
    pub projects: Vec<ProjectView>,
    pub education: Vec<EducationView>,
}

impl PortfolioDetail {
    pub fn skill_names(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.skill.name.as_str())
    }
}

/// Admin listing/mutation shape: the portfolio plus `skills:[{id,name}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioWithSkills {
    #[serde(flatten)]
    pub portfolio: Model,
    pub profile_image_url: Option<String>,
    pub skills: Vec<SkillRef>,
}

impl PortfolioWithSkills {
    pub fn new(portfolio: Model, skills: Vec<SkillRef>, ctx: &DerivedContext) -> Self {
        Self {
            profile_image_url: ctx.image_url(portfolio.profile_image.as_deref()),
            portfolio,
            skills,
        }
    }
}

/// Aggregate counts for `GET /portfolios/stats`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total: u64,
    #[serde(rename = "bySkill")]
    pub by_skill: Vec<CountEntry>,
    #[serde(rename = "byLocation")]
    pub by_location: Vec<CountEntry>,
}

/// One histogram bucket, ordered by descending count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub name: String,
    pub count: u64,
}

/// Count occurrences and order by count (desc), then name, keeping at most `limit` buckets.
pub fn histogram<'a>(values: impl IntoIterator<Item = &'a str>, limit: Option<usize>) -> Vec<CountEntry> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }

    let mut entries: Vec<CountEntry> = counts
        .into_iter()
        .map(|(name, count)| CountEntry {
            name: name.to_string(),
            count,
        })
        .collect();
    entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    if let Some(limit) = limit {
        entries.truncate(limit);
    }
    entries
}
