pub mod api;
pub mod error;
pub mod functions;
pub mod state;

use anyhow::Context;
use application::accounts::AccountSettings;
use domain::platform::UploadSigner;
use infrastructure::{
    AppConfig, PlatformAuthClient, R2Presigner, SeaOrmReferenceRepository, SeaOrmUserRepository,
    SeaOrmWorkEntryRepository,
};
use sea_orm::DatabaseConnection;
use state::{AppState, Ports};
use std::sync::Arc;
use tracing::{info, warn};

/// Wire the sea-orm repositories and platform adapters into the services.
pub fn setup_app_state(
    config: &AppConfig,
    db: DatabaseConnection,
) -> anyhow::Result<Arc<AppState>> {
    if config.platform.service_role_key.is_empty() {
        warn!("platform.service_role_key is empty; admin user operations will fail");
    }
    let platform = Arc::new(
        PlatformAuthClient::new(&config.platform).context("Failed to build platform client")?,
    );

    let signer: Option<Arc<dyn UploadSigner>> = match config.storage.credentials() {
        Some(credentials) => {
            info!(bucket = %credentials.bucket, "✅ Object storage configured");
            Some(Arc::new(R2Presigner::new(credentials)))
        }
        None => {
            warn!("Object storage credentials missing; upload URLs are disabled");
            None
        }
    };

    let ports = Ports {
        identity: platform.clone(),
        auth_admin: platform,
        signer,
        reference: Arc::new(SeaOrmReferenceRepository::new(db.clone())),
        users: Arc::new(SeaOrmUserRepository::new(db.clone())),
        entries: Arc::new(SeaOrmWorkEntryRepository::new(db)),
    };
    let settings = AccountSettings {
        email_domain: config.accounts.email_domain.clone(),
        password_length: config.accounts.password_length,
    };

    Ok(Arc::new(AppState::new(
        ports,
        settings,
        config.storage.expires_secs,
    )))
}
