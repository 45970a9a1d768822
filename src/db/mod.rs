pub mod education;
pub mod experiences;
pub mod portfolio;
pub mod projects;
pub mod seed;
pub mod skills;

use sea_orm::sea_query::LikeExpr;
use sea_orm::*;

use crate::models::Paginated;

/// Connect a SeaORM connection pool to `database_url`.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Run `query` as one page: a count over the whole filter plus an offset/limit fetch.
pub(crate) async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    page: u64,
    per_page: u64,
) -> Result<Paginated<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
{
    let total = query.clone().count(db).await?;
    let Some(offset) = page_offset(page, per_page, total) else {
        return Ok(Paginated::new(Vec::new(), page, per_page, total));
    };

    let rows = query.offset(offset).limit(per_page).all(db).await?;

    Ok(Paginated::new(rows, page, per_page, total))
}

/// `%term%`, lower-cased, for case-insensitive `LIKE` against `LOWER(column)`.
/// `%` and `_` in the term match literally.
pub(crate) fn contains_pattern(term: &str) -> LikeExpr {
    let mut escaped = String::with_capacity(term.len() + 2);
    for c in term.trim().to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    LikeExpr::new(format!("%{escaped}%")).escape('\\')
}

/// Row offset of `page`, or `None` when it lies beyond `total` rows.
fn page_offset(page: u64, per_page: u64, total: u64) -> Option<u64> {
    page.saturating_sub(1)
        .checked_mul(per_page)
        .filter(|offset| *offset < total)
}
