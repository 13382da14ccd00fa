use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Hosted platform providing identity and the admin user API.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PlatformConfig {
    pub url: String,
    /// Privileged key used for admin user operations. Never sent to clients.
    pub service_role_key: String,
    /// Public key sent as `apikey` on token lookups; the service key is used when empty.
    #[serde(default)]
    pub anon_key: String,
}

/// S3-compatible object storage (Cloudflare R2).
///
/// Every credential field is optional so the server can start without
/// storage; upload requests then fail with a configuration error.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    pub account_id: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub bucket: Option<String>,
    pub public_url: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_expires_secs")]
    pub expires_secs: u64,
}

fn default_region() -> String {
    "auto".to_string()
}

fn default_expires_secs() -> u64 {
    domain::media::UPLOAD_URL_TTL_SECS
}

/// Storage credentials with every field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageCredentials {
    pub account_id: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket: String,
    pub public_url: String,
    pub region: String,
}

impl StorageConfig {
    /// `None` unless every credential is set and non-empty.
    pub fn credentials(&self) -> Option<StorageCredentials> {
        let field = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };
        Some(StorageCredentials {
            account_id: field(&self.account_id)?,
            access_key_id: field(&self.access_key_id)?,
            secret_access_key: field(&self.secret_access_key)?,
            bucket: field(&self.bucket)?,
            public_url: field(&self.public_url)?,
            region: self.region.clone(),
        })
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccountsConfig {
    pub email_domain: String,
    pub password_length: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub platform: PlatformConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub accounts: AccountsConfig,
}

impl AppConfig {
    pub fn load(config_dir: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::builder(config_dir, &run_mode)?.build()?.try_deserialize()
    }

    fn builder(
        config_dir: &str,
        run_mode: &str,
    ) -> Result<config::builder::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite://fieldops.db?mode=rwc")?
            .set_default("platform.url", "http://localhost:54321")?
            .set_default("platform.service_role_key", "")?
            .set_default("platform.anon_key", "")?
            .set_default("storage.region", "auto")?
            .set_default("storage.expires_secs", 3600)?
            .set_default("accounts.email_domain", "fieldops.local")?
            .set_default("accounts.password_length", 8)?
            // config/default.toml
            .add_source(File::with_name(&format!("{}/default", config_dir)).required(false))
            // config/{RUN_MODE}.toml
            .add_source(File::with_name(&format!("{}/{}", config_dir, run_mode)).required(false))
            // Environment variables (e.g. FIELDOPS__PLATFORM__URL=https://...)
            .add_source(Environment::with_prefix("FIELDOPS").separator("__")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_files() {
        let config: AppConfig = AppConfig::builder("does-not-exist", "test")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.accounts.email_domain, "fieldops.local");
        assert_eq!(config.accounts.password_length, 8);
        assert_eq!(config.storage.expires_secs, 3600);
        assert!(config.storage.credentials().is_none());
    }

    #[test]
    fn storage_credentials_require_every_field() {
        let mut storage = StorageConfig {
            account_id: Some("acc".into()),
            access_key_id: Some("key".into()),
            secret_access_key: Some("secret".into()),
            bucket: Some("media".into()),
            public_url: Some("https://cdn.example.com".into()),
            region: "auto".into(),
            expires_secs: 3600,
        };
        assert_eq!(storage.credentials().unwrap().bucket, "media");

        storage.bucket = Some("  ".into());
        assert!(storage.credentials().is_none());
    }
}
