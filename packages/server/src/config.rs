use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued bearer tokens.
    #[serde(default = "default_token_ttl_days")]
    pub token_ttl_days: i64,
}

fn default_token_ttl_days() -> i64 {
    7
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Directory holding uploaded credential photos.
    pub assets_dir: String,
    /// Public URL prefix under which `assets_dir` is served.
    pub public_base_url: String,
    /// Image shown when neither the credential nor its competition has one.
    pub placeholder_image_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Send the owner a receipt when they delete a credential.
    pub notify_on_delete: bool,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            notify_on_delete: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_days", 7)?
            .set_default("storage.assets_dir", "./data/assets")?
            .set_default("storage.public_base_url", "http://127.0.0.1:3000/assets")?
            .set_default(
                "storage.placeholder_image_url",
                "/images/credential-placeholder.png",
            )?
            .set_default("notifications.notify_on_delete", true)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., COSBAII__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("COSBAII").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
