use std::collections::HashMap;

use portfolio_directory::config::{AppConfig, ConfigError};
use portfolio_directory::storage::ImageStore;
use portfolio_directory::validation::UploadedFile;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

#[test]
fn test_defaults() {
    let config = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/db")])).unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.admin_key, None);
    assert_eq!(config.public_asset_base, "http://localhost:8080");
    assert!(config.run_migrations);
    assert!(!config.seed_demo_data);
    assert_eq!(config.bind_addr(), "0.0.0.0:8080");
}

#[test]
fn test_database_url_is_required() {
    let err = AppConfig::from_lookup(lookup(&[("DATABASE_URL", "   ")])).unwrap_err();
    assert!(matches!(err, ConfigError::Missing("DATABASE_URL")));
}

#[test]
fn test_overrides() {
    let config = AppConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/db"),
        ("PORT", "9000"),
        ("ADMIN_KEY", "secret"),
        ("PUBLIC_ASSET_BASE", "https://cdn.example.com/"),
        ("SEED_DEMO_DATA", "yes"),
        ("RUN_MIGRATIONS", "off"),
    ]))
    .unwrap();
    assert_eq!(config.port, 9000);
    assert_eq!(config.admin_key.as_deref(), Some("secret"));
    assert_eq!(config.public_asset_base, "https://cdn.example.com");
    assert!(config.seed_demo_data);
    assert!(!config.run_migrations);
}

#[test]
fn test_blank_admin_key_disables_admin() {
    let config = AppConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/db"),
        ("ADMIN_KEY", ""),
    ]))
    .unwrap();
    assert_eq!(config.admin_key, None);
}

#[test]
fn test_invalid_values() {
    let err = AppConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/db"),
        ("PORT", "eighty"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "PORT", .. }));

    let err = AppConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://localhost/db"),
        ("SEED_DEMO_DATA", "sometimes"),
    ]))
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "SEED_DEMO_DATA", .. }));
}

#[tokio::test]
async fn test_image_store_writes_under_root() {
    let root = std::env::temp_dir().join(format!("portfolio-store-{}", uuid::Uuid::new_v4()));
    let store = ImageStore::new(&root);
    let file = UploadedFile {
        file_name: Some("avatar.PNG".to_string()),
        content_type: Some("image/png".to_string()),
        bytes: vec![1, 2, 3],
    };

    let path = store.store("profiles", &file).await.unwrap();
    assert!(path.starts_with("/storage/profiles/"));
    assert!(path.ends_with(".png"));

    let on_disk = root.join(path.trim_start_matches("/storage/"));
    assert_eq!(std::fs::read(on_disk).unwrap(), vec![1, 2, 3]);
    std::fs::remove_dir_all(root).ok();
}
