use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Directory templates and other assets are served from.
    pub static_dir: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let static_dir = std::env::var("STATIC_DIR").unwrap_or_else(|_| "static".into());
        Ok(Self {
            database_url,
            static_dir,
        })
    }
}
