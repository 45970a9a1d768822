use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Server settings, read once at startup and shared as `web::Data<AppConfig>`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    /// `None` disables the admin API entirely.
    pub admin_key: Option<String>,
    pub public_asset_base: String,
    pub storage_dir: PathBuf,
    pub app_name: String,
    pub app_version: String,
    pub run_migrations: bool,
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let port = match var("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid { name: "PORT", value: raw })?,
            None => 8080,
        };

        Ok(Self {
            database_url,
            port,
            admin_key: var("ADMIN_KEY"),
            public_asset_base: var("PUBLIC_ASSET_BASE")
                .unwrap_or_else(|| "http://localhost:8080".to_string())
                .trim_end_matches('/')
                .to_string(),
            storage_dir: var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./storage")),
            app_name: var("APP_NAME").unwrap_or_else(|| "Portfolio Directory".to_string()),
            app_version: var("APP_VERSION").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
            run_migrations: flag(var("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?,
            seed_demo_data: flag(var("SEED_DEMO_DATA"), "SEED_DEMO_DATA", false)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn flag(raw: Option<String>, name: &'static str, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid { name, value: raw }),
    }
}
