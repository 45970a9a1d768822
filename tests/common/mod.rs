//! Shared setup for the HTTP integration tests: an in-memory SQLite database
//! migrated with the `migration` crate and an app wired like `main.rs`.
#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::json;
use uuid::Uuid;

use portfolio_directory::config::AppConfig;
use portfolio_directory::db::{experiences as experience_db, portfolio as portfolio_db};
use portfolio_directory::db::{projects as project_db, skills as skill_db};
use portfolio_directory::handlers;
use portfolio_directory::models::experiences::CreateExperience;
use portfolio_directory::models::portfolio::{self, CreatePortfolio};
use portfolio_directory::models::projects::{CreateProject, Technologies};
use portfolio_directory::models::skills::{self, CreateSkill};
use portfolio_directory::storage::ImageStore;

pub const ADMIN_KEY: &str = "test-admin-key";
pub const ASSET_BASE: &str = "http://assets.test";

pub async fn setup_db() -> DatabaseConnection {
    // One pooled connection keeps the in-memory database alive for the whole test.
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&db, None).await.expect("migrations failed");
    db
}

pub fn test_config(admin_key: Option<&str>) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        admin_key: admin_key.map(str::to_string),
        public_asset_base: ASSET_BASE.to_string(),
        storage_dir: std::env::temp_dir().join(format!("portfolio-directory-{}", Uuid::new_v4())),
        app_name: "Portfolio Directory".to_string(),
        app_version: "test".to_string(),
        run_migrations: true,
        seed_demo_data: false,
    }
}

pub fn app(
    db: DatabaseConnection,
    config: AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let store = ImageStore::new(config.storage_dir.clone());
    App::new()
        .app_data(web::Data::new(db))
        .app_data(web::Data::new(config))
        .app_data(web::Data::new(store))
        .service(web::scope("/api").configure(handlers::init_routes))
}

pub fn portfolio_input(name: &str, email: &str) -> CreatePortfolio {
    CreatePortfolio {
        name: name.to_string(),
        title: "Software Engineer".to_string(),
        email: email.to_string(),
        phone: "+62 812-0000-0000".to_string(),
        location: "Jakarta, Indonesia".to_string(),
        bio: "Builds things.".to_string(),
        profile_image: None,
        social_links: None,
    }
}

pub async fn insert_portfolio(db: &DatabaseConnection, name: &str, email: &str) -> portfolio::Model {
    portfolio_db::insert_portfolio(db, portfolio_input(name, email))
        .await
        .expect("insert portfolio")
}

pub async fn insert_skill(db: &DatabaseConnection, name: &str) -> skills::Model {
    skill_db::insert_skill(
        db,
        CreateSkill {
            name: name.to_string(),
            category: Some("Frontend Framework".to_string()),
            is_popular: false,
        },
    )
    .await
    .expect("insert skill")
}

pub async fn insert_experience(db: &DatabaseConnection, portfolio_id: i32) {
    experience_db::insert_experience(
        db,
        CreateExperience {
            portfolio_id,
            company: "Acme".to_string(),
            position: "Engineer".to_string(),
            start_date: NaiveDate::from_ymd_opt(2022, 1, 1).expect("valid date"),
            end_date: None,
            description: String::new(),
            is_current_role: true,
            sort_order: 0,
        },
    )
    .await
    .expect("insert experience");
}

pub async fn insert_project(db: &DatabaseConnection, portfolio_id: i32) {
    project_db::insert_project(
        db,
        CreateProject {
            portfolio_id,
            title: "Dashboard".to_string(),
            description: "Internal dashboard".to_string(),
            image: Some("/storage/projects/dashboard.png".to_string()),
            technologies: Technologies(vec!["Rust".to_string()]),
            live_url: None,
            github_url: None,
            featured: true,
            sort_order: 0,
        },
    )
    .await
    .expect("insert project");
}

/// A valid admin portfolio payload with a unique email.
pub fn portfolio_payload(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "title": "Backend Developer",
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "phone": "+62 811-1111-1111",
        "location": "Bandung, Indonesia",
        "bio": "Writes services.",
    })
}
