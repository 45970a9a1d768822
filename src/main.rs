use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use portfolio_directory::auth::admin_key::ADMIN_KEY_HEADER;
use portfolio_directory::config::AppConfig;
use portfolio_directory::create_pool;
use portfolio_directory::db::seed;
use portfolio_directory::handlers;
use portfolio_directory::storage::{ImageStore, PUBLIC_PREFIX};
use std::io;
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env().map_err(io::Error::other)?;
    if config.admin_key.is_none() {
        tracing::warn!("ADMIN_KEY is not set; every admin request will be rejected");
    }

    let db = create_pool(&config.database_url)
        .await
        .map_err(io::Error::other)?;
    tracing::info!("Connected to database");

    if config.run_migrations {
        Migrator::up(&db, None).await.map_err(io::Error::other)?;
        tracing::info!("Migrations applied");
    }
    if config.seed_demo_data {
        seed::seed_demo_data(&db).await.map_err(io::Error::other)?;
    }

    let store = ImageStore::new(config.storage_dir.clone());
    tokio::fs::create_dir_all(store.root()).await?;

    let bind_addr = config.bind_addr();
    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        "Server running at http://{bind_addr}"
    );

    let db_data = web::Data::new(db);
    let config_data = web::Data::new(config);
    let store_data = web::Data::new(store);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .allowed_header(ADMIN_KEY_HEADER)
            .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(db_data.clone())
            .app_data(config_data.clone())
            .app_data(store_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes))
            .service(Files::new(PUBLIC_PREFIX, store_data.root().clone()))
    })
    .bind(&bind_addr)?
    .run()
    .await
}
