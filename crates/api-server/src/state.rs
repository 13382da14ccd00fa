use application::accounts::AccountSettings;
use application::{AccountService, Authenticator, EntryService, ReferenceService, UploadService};
use domain::entry::WorkEntryRepository;
use domain::platform::{AuthAdmin, IdentityProvider, UploadSigner};
use domain::reference::ReferenceRepository;
use domain::user::UserRepository;
use std::sync::Arc;

/// Adapters the services are built from.
pub struct Ports {
    pub identity: Arc<dyn IdentityProvider>,
    pub auth_admin: Arc<dyn AuthAdmin>,
    pub signer: Option<Arc<dyn UploadSigner>>,
    pub reference: Arc<dyn ReferenceRepository>,
    pub users: Arc<dyn UserRepository>,
    pub entries: Arc<dyn WorkEntryRepository>,
}

pub struct AppState {
    pub auth: Authenticator,
    pub accounts: AccountService,
    pub entries: EntryService,
    pub reference: ReferenceService,
    pub uploads: UploadService,
}

impl AppState {
    pub fn new(ports: Ports, settings: AccountSettings, upload_ttl_secs: u64) -> Self {
        Self {
            auth: Authenticator::new(ports.identity, ports.users.clone()),
            accounts: AccountService::new(
                ports.auth_admin,
                ports.users.clone(),
                ports.reference.clone(),
                settings,
            ),
            entries: EntryService::new(ports.entries, ports.reference.clone(), ports.users),
            reference: ReferenceService::new(ports.reference),
            uploads: UploadService::new(ports.signer).with_ttl(upload_ttl_secs),
        }
    }
}
