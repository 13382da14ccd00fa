use chrono::Utc;
use domain::DomainError;
use domain::error::Result;
use domain::media::{self, PresignedUpload, UPLOAD_URL_TTL_SECS, UploadRequest};
use domain::platform::UploadSigner;
use domain::user::AuthUser;
use std::sync::Arc;
use tracing::info;

const KEY_SUFFIX_LEN: usize = 13;

/// Hands out presigned PUT URLs for entry attachments.
#[derive(Clone)]
pub struct UploadService {
    signer: Option<Arc<dyn UploadSigner>>,
    ttl_secs: u64,
    clock: fn() -> i64,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

impl UploadService {
    /// `signer` is `None` when storage credentials are not configured; every
    /// request then fails with a configuration error.
    pub fn new(signer: Option<Arc<dyn UploadSigner>>) -> Self {
        Self {
            signer,
            ttl_secs: UPLOAD_URL_TTL_SECS,
            clock: now_millis,
        }
    }

    pub fn with_ttl(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = ttl_secs;
        self
    }

    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.signer.is_some()
    }

    fn signer(&self) -> Result<&Arc<dyn UploadSigner>> {
        self.signer.as_ref().ok_or_else(|| {
            DomainError::Configuration(
                "Missing R2 configuration. Please check environment variables.".to_string(),
            )
        })
    }

    /// Fails with the configuration error when storage credentials are missing.
    pub fn ensure_configured(&self) -> Result<()> {
        self.signer().map(|_| ())
    }

    pub fn presign(
        &self,
        requested_by: &AuthUser,
        request: &UploadRequest,
    ) -> Result<PresignedUpload> {
        let signer = self.signer()?;

        let upload = request.validate()?;
        let suffix = media::random_suffix(&mut rand::thread_rng(), KEY_SUFFIX_LEN);
        let key = media::object_key(upload.folder, &upload.file_name, (self.clock)(), &suffix);

        info!(%key, user_id = %requested_by.id, "[UPLOAD] Generating presigned URL");
        let upload_url = signer.presign_put(&key, self.ttl_secs)?;
        let file_url = signer.public_url(&key);

        Ok(PresignedUpload {
            upload_url,
            file_url,
            key,
        })
    }
}
