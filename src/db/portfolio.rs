use sea_orm::prelude::Expr;
use sea_orm::sea_query::{ExprTrait, Func, LikeExpr, Query};
use sea_orm::*;
use std::collections::{BTreeSet, HashMap};

use super::{contains_pattern, fetch_page};
use crate::models::derived::DerivedContext;
use crate::models::education::{self, EducationView};
use crate::models::experiences::{self, ExperienceView};
use crate::models::portfolio::{
    self, CreatePortfolio, PortfolioDetail, PortfolioRef, PortfolioStats, PortfolioSummary,
    PortfolioWithSkills, UpdatePortfolio, histogram,
};
use crate::models::portfolio_skills::{self, DEFAULT_PROFICIENCY};
use crate::models::projects::{self, ProjectView};
use crate::models::skills::{self, LinkedSkill, SkillPivot, SkillRef};
use crate::models::Paginated;

/// Number of skill buckets reported by [`portfolio_stats`].
pub const TOP_SKILLS: usize = 10;

/// Which portfolios a listing should contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortfolioFilter {
    All,
    /// Name, title, bio, location or any linked skill name contains the term.
    Search(String),
    /// Any linked skill name contains the term.
    Skill(String),
}

/// Listing order: public pages read oldest first, admin pages newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Oldest,
    Newest,
}

/// Insert a new portfolio.
pub async fn insert_portfolio(
    db: &DatabaseConnection,
    input: CreatePortfolio,
) -> Result<portfolio::Model, DbErr> {
    let now = chrono::Utc::now();
    let new_portfolio = portfolio::ActiveModel {
        name: Set(input.name),
        title: Set(input.title),
        email: Set(input.email),
        phone: Set(input.phone),
        location: Set(input.location),
        bio: Set(input.bio),
        profile_image: Set(input.profile_image),
        social_links: Set(input.social_links),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    new_portfolio.insert(db).await
}

/// Fetch a single portfolio row by ID.
pub async fn get_portfolio_by_id(
    db: &DatabaseConnection,
    id: i32,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id).one(db).await
}

pub async fn portfolio_exists(db: &DatabaseConnection, id: i32) -> Result<bool, DbErr> {
    let count = portfolio::Entity::find()
        .filter(portfolio::Column::Id.eq(id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Whether another portfolio already uses `email`.
pub async fn email_taken(
    db: &DatabaseConnection,
    email: &str,
    except_id: Option<i32>,
) -> Result<bool, DbErr> {
    let mut query = portfolio::Entity::find().filter(portfolio::Column::Email.eq(email));
    if let Some(id) = except_id {
        query = query.filter(portfolio::Column::Id.ne(id));
    }
    Ok(query.count(db).await? > 0)
}

/// Update an existing portfolio; only fields present in `input` change.
pub async fn update_portfolio(
    db: &DatabaseConnection,
    id: i32,
    input: UpdatePortfolio,
) -> Result<portfolio::Model, DbErr> {
    let item = portfolio::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("Portfolio not found".to_string()))?;

    let mut active: portfolio::ActiveModel = item.into();

    if let Some(name) = input.name {
        active.name = Set(name);
    }
    if let Some(title) = input.title {
        active.title = Set(title);
    }
    if let Some(email) = input.email {
        active.email = Set(email);
    }
    if let Some(phone) = input.phone {
        active.phone = Set(phone);
    }
    if let Some(location) = input.location {
        active.location = Set(location);
    }
    if let Some(bio) = input.bio {
        active.bio = Set(bio);
    }
    if let Some(profile_image) = input.profile_image {
        active.profile_image = Set(profile_image);
    }
    if let Some(social_links) = input.social_links {
        active.social_links = Set(social_links);
    }
    active.updated_at = Set(chrono::Utc::now());

    active.update(db).await
}

/// Delete a portfolio; children and pivot rows go with it via `ON DELETE CASCADE`.
pub async fn delete_portfolio(db: &DatabaseConnection, id: i32) -> Result<DeleteResult, DbErr> {
    portfolio::Entity::delete_by_id(id).exec(db).await
}

/// One page of portfolio rows matching `filter`.
pub async fn find_portfolios(
    db: &DatabaseConnection,
    filter: &PortfolioFilter,
    order: ListOrder,
    page: u64,
    per_page: u64,
) -> Result<Paginated<portfolio::Model>, DbErr> {
    let mut query = portfolio::Entity::find();

    match filter {
        PortfolioFilter::All => {}
        PortfolioFilter::Search(term) => {
            let pattern = contains_pattern(term);
            let mut matches = Condition::any();
            for column in [
                portfolio::Column::Name,
                portfolio::Column::Title,
                portfolio::Column::Bio,
                portfolio::Column::Location,
            ] {
                matches = matches.add(
                    Expr::expr(Func::lower(Expr::col((portfolio::Entity, column))))
                        .like(pattern.clone()),
                );
            }
            matches = matches.add(portfolio::Column::Id.in_subquery(skill_match(pattern.clone())));
            query = query.filter(matches);
        }
        PortfolioFilter::Skill(term) => {
            let pattern = contains_pattern(term);
            query = query.filter(portfolio::Column::Id.in_subquery(skill_match(pattern)));
        }
    }

    query = match order {
        ListOrder::Oldest => query.order_by_asc(portfolio::Column::Id),
        ListOrder::Newest => query.order_by_desc(portfolio::Column::Id),
    };

    fetch_page(db, query, page, per_page).await
}

/// `SELECT portfolio_id FROM portfolio_skills JOIN skills ... WHERE LOWER(skills.name) LIKE ?`
fn skill_match(pattern: LikeExpr) -> sea_orm::sea_query::SelectStatement {
    Query::select()
        .column((portfolio_skills::Entity, portfolio_skills::Column::PortfolioId))
        .from(portfolio_skills::Entity)
        .inner_join(
            skills::Entity,
            Expr::col((skills::Entity, skills::Column::Id))
                .equals((portfolio_skills::Entity, portfolio_skills::Column::SkillId)),
        )
        .and_where(
            Expr::expr(Func::lower(Expr::col((skills::Entity, skills::Column::Name))))
                .like(pattern),
        )
        .to_owned()
}

/// Fetch one portfolio with every relation loaded.
pub async fn get_portfolio_detail(
    db: &DatabaseConnection,
    id: i32,
    ctx: &DerivedContext,
) -> Result<Option<PortfolioDetail>, DbErr> {
    let Some(item) = get_portfolio_by_id(db, id).await? else {
        return Ok(None);
    };
    let mut details = load_details(db, vec![item], ctx).await?;
    Ok(details.pop())
}

/// Attach skills (with pivot), experiences, projects and education to each
/// portfolio, batching one query per relation.
pub async fn load_details(
    db: &DatabaseConnection,
    portfolios: Vec<portfolio::Model>,
    ctx: &DerivedContext,
) -> Result<Vec<PortfolioDetail>, DbErr> {
    if portfolios.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = portfolios.iter().map(|p| p.id).collect();

    let mut skills_by_portfolio: HashMap<i32, Vec<LinkedSkill>> = HashMap::new();
    for (link, skill) in linked_skills(db, Some(ids.clone())).await? {
        skills_by_portfolio
            .entry(link.portfolio_id)
            .or_default()
            .push(LinkedSkill {
                skill,
                pivot: SkillPivot {
                    portfolio_id: link.portfolio_id,
                    skill_id: link.skill_id,
                    proficiency_level: link.proficiency_level,
                },
            });
    }

    let mut experiences_by_portfolio: HashMap<i32, Vec<ExperienceView>> = HashMap::new();
    let experience_rows = experiences::Entity::find()
        .filter(experiences::Column::PortfolioId.is_in(ids.clone()))
        .order_by_desc(experiences::Column::StartDate)
        .order_by_asc(experiences::Column::Id)
        .all(db)
        .await?;
    for row in experience_rows {
        experiences_by_portfolio
            .entry(row.portfolio_id)
            .or_default()
            .push(ExperienceView::new(row, ctx));
    }

    let mut projects_by_portfolio: HashMap<i32, Vec<ProjectView>> = HashMap::new();
    let project_rows = projects::Entity::find()
        .filter(projects::Column::PortfolioId.is_in(ids.clone()))
        .order_by_desc(projects::Column::Featured)
        .order_by_asc(projects::Column::SortOrder)
        .order_by_asc(projects::Column::Id)
        .all(db)
        .await?;
    for row in project_rows {
        projects_by_portfolio
            .entry(row.portfolio_id)
            .or_default()
            .push(ProjectView::new(row, ctx));
    }

    let mut education_by_portfolio: HashMap<i32, Vec<EducationView>> = HashMap::new();
    let education_rows = education::Entity::find()
        .filter(education::Column::PortfolioId.is_in(ids))
        .order_by_desc(education::Column::StartDate)
        .order_by_asc(education::Column::Id)
        .all(db)
        .await?;
    for row in education_rows {
        education_by_portfolio
            .entry(row.portfolio_id)
            .or_default()
            .push(EducationView::from(row));
    }

    Ok(portfolios
        .into_iter()
        .map(|portfolio| {
            let id = portfolio.id;
            PortfolioDetail {
                profile_image_url: ctx.image_url(portfolio.profile_image.as_deref()),
                portfolio,
                skills: skills_by_portfolio.remove(&id).unwrap_or_default(),
                experiences: experiences_by_portfolio.remove(&id).unwrap_or_default(),
                projects: projects_by_portfolio.remove(&id).unwrap_or_default(),
                education: education_by_portfolio.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

/// Pivot rows joined to their skill, ordered by skill name. `None` loads every link.
async fn linked_skills(
    db: &DatabaseConnection,
    portfolio_ids: Option<Vec<i32>>,
) -> Result<Vec<(portfolio_skills::Model, skills::Model)>, DbErr> {
    let mut query = portfolio_skills::Entity::find().find_also_related(skills::Entity);
    if let Some(ids) = portfolio_ids {
        query = query.filter(portfolio_skills::Column::PortfolioId.is_in(ids));
    }

    let rows = query
        .order_by_asc(skills::Column::Name)
        .order_by_asc(portfolio_skills::Column::Id)
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(link, skill)| skill.map(|skill| (link, skill)))
        .collect())
}

/// `{id, name}` skill refs for each portfolio, as preloaded on admin rows.
pub async fn skill_refs_for(
    db: &DatabaseConnection,
    portfolio_ids: Vec<i32>,
) -> Result<HashMap<i32, Vec<SkillRef>>, DbErr> {
    if portfolio_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let mut refs: HashMap<i32, Vec<SkillRef>> = HashMap::new();
    for (link, skill) in linked_skills(db, Some(portfolio_ids)).await? {
        refs.entry(link.portfolio_id).or_default().push(SkillRef {
            id: skill.id,
            name: skill.name,
        });
    }
    Ok(refs)
}

/// Pair each portfolio with its `{id, name}` skills.
pub async fn with_skills(
    db: &DatabaseConnection,
    portfolios: Vec<portfolio::Model>,
    ctx: &DerivedContext,
) -> Result<Vec<PortfolioWithSkills>, DbErr> {
    let ids = portfolios.iter().map(|p| p.id).collect();
    let mut refs = skill_refs_for(db, ids).await?;

    Ok(portfolios
        .into_iter()
        .map(|portfolio| {
            let skills = refs.remove(&portfolio.id).unwrap_or_default();
            PortfolioWithSkills::new(portfolio, skills, ctx)
        })
        .collect())
}

/// `[{id, name, title}]` for every portfolio, ordered by name.
pub async fn list_simple(db: &DatabaseConnection) -> Result<Vec<PortfolioSummary>, DbErr> {
    portfolio::Entity::find()
        .select_only()
        .column(portfolio::Column::Id)
        .column(portfolio::Column::Name)
        .column(portfolio::Column::Title)
        .order_by_asc(portfolio::Column::Name)
        .into_model::<PortfolioSummary>()
        .all(db)
        .await
}

/// `{id, name}` for the given portfolio ids.
pub async fn portfolio_refs(
    db: &DatabaseConnection,
    ids: Vec<i32>,
) -> Result<HashMap<i32, PortfolioRef>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = portfolio::Entity::find()
        .select_only()
        .column(portfolio::Column::Id)
        .column(portfolio::Column::Name)
        .filter(portfolio::Column::Id.is_in(ids))
        .into_model::<PortfolioRef>()
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| (r.id, r)).collect())
}

/// Totals plus skill and location histograms across every portfolio.
pub async fn portfolio_stats(db: &DatabaseConnection) -> Result<PortfolioStats, DbErr> {
    let total = portfolio::Entity::find().count(db).await?;

    let links = linked_skills(db, None).await?;
    let by_skill = histogram(
        links.iter().map(|(_, skill)| skill.name.as_str()),
        Some(TOP_SKILLS),
    );

    let locations: Vec<String> = portfolio::Entity::find()
        .select_only()
        .column(portfolio::Column::Location)
        .into_tuple()
        .all(db)
        .await?;
    let by_location = histogram(locations.iter().map(String::as_str), None);

    Ok(PortfolioStats {
        total,
        by_skill,
        by_location,
    })
}

/// Replace the portfolio's skill set with exactly `skill_ids` in one transaction.
///
/// Links that stay keep their pivot row (and proficiency); new links start at
/// [`DEFAULT_PROFICIENCY`]. Callers check that every id exists first.
pub async fn sync_skills(
    db: &DatabaseConnection,
    portfolio_id: i32,
    skill_ids: &[i32],
) -> Result<(), DbErr> {
    let wanted: BTreeSet<i32> = skill_ids.iter().copied().collect();

    let txn = db.begin().await?;

    let current: BTreeSet<i32> = portfolio_skills::Entity::find()
        .filter(portfolio_skills::Column::PortfolioId.eq(portfolio_id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|link| link.skill_id)
        .collect();

    let stale: Vec<i32> = current.difference(&wanted).copied().collect();
    if !stale.is_empty() {
        portfolio_skills::Entity::delete_many()
            .filter(portfolio_skills::Column::PortfolioId.eq(portfolio_id))
            .filter(portfolio_skills::Column::SkillId.is_in(stale))
            .exec(&txn)
            .await?;
    }

    let now = chrono::Utc::now();
    for skill_id in wanted.difference(&current) {
        portfolio_skills::ActiveModel {
            portfolio_id: Set(portfolio_id),
            skill_id: Set(*skill_id),
            proficiency_level: Set(DEFAULT_PROFICIENCY),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await
}

/// Attach a skill at a given proficiency; used when seeding.
pub async fn attach_skill(
    db: &DatabaseConnection,
    portfolio_id: i32,
    skill_id: i32,
    proficiency_level: i32,
) -> Result<portfolio_skills::Model, DbErr> {
    let now = chrono::Utc::now();
    portfolio_skills::ActiveModel {
        portfolio_id: Set(portfolio_id),
        skill_id: Set(skill_id),
        proficiency_level: Set(proficiency_level),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}
