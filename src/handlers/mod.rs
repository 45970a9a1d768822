pub mod admin;
pub mod health;
pub mod portfolios;
pub mod skills;

use actix_web::web;

use crate::config::AppConfig;
use crate::errors::{path_error, query_error};
use crate::models::derived::DerivedContext;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error));

    cfg.route("/health", web::get().to(health::health));

    // ── Portfolio routes (reads are public, writes need X-Admin-Key) ──
    // Fixed segments are registered ahead of `/{id}`.
    cfg.service(
        web::scope("/portfolios")
            .route("", web::get().to(portfolios::list_portfolios))
            .route("", web::post().to(portfolios::create_portfolio))
            .route("/search", web::get().to(portfolios::search_portfolios))
            .route("/filter", web::get().to(portfolios::filter_portfolios))
            .route("/stats", web::get().to(portfolios::portfolio_stats))
            .route("/{id}", web::get().to(portfolios::get_portfolio))
            .route("/{id}", web::put().to(portfolios::update_portfolio))
            .route("/{id}", web::delete().to(portfolios::delete_portfolio)),
    );

    // ── Skill routes ──
    cfg.service(
        web::scope("/skills")
            .route("", web::get().to(skills::list_skill_names))
            .route("", web::post().to(skills::create_skill))
            .route("/popular", web::get().to(skills::popular_skills))
            .route("/category", web::get().to(skills::skills_by_category))
            .route("/stats", web::get().to(skills::skill_stats)),
    );

    // ── Admin routes (all gated by the AdminKey extractor) ──
    cfg.service(web::scope("/admin").configure(admin::init_routes));
}

/// Derived-field inputs for this request: the configured asset base and today's date.
pub(crate) fn derived_context(config: &AppConfig) -> DerivedContext {
    DerivedContext::new(config.public_asset_base.clone())
}
