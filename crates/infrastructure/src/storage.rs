//! Presigned PUT URLs for S3-compatible object storage (Cloudflare R2),
//! signed with AWS Signature Version 4 query parameters.

use crate::config::StorageCredentials;
use chrono::{DateTime, Utc};
use domain::DomainError;
use domain::platform::UploadSigner;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// RFC 3986 unreserved characters pass through; everything else is `%XX`.
const SIGV4_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Object keys keep their `/` separators.
const SIGV4_ENCODE_PATH: &AsciiSet = &SIGV4_ENCODE.remove(b'/');

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SERVICE: &str = "s3";

pub struct R2Presigner {
    credentials: StorageCredentials,
    clock: fn() -> DateTime<Utc>,
}

impl R2Presigner {
    pub fn new(credentials: StorageCredentials) -> Self {
        Self {
            credentials,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    fn host(&self) -> String {
        format!("{}.r2.cloudflarestorage.com", self.credentials.account_id)
    }

    /// Presigned PUT URL for `key`, valid for `expires_secs` from `now`.
    pub fn presign_put_at(
        &self,
        key: &str,
        expires_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let creds = &self.credentials;
        let timestamp = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();
        let host = self.host();

        let scope = format!("{}/{}/{}/aws4_request", date, creds.region, SERVICE);
        let credential = format!("{}/{}", creds.access_key_id, scope);

        let canonical_uri = format!(
            "/{}/{}",
            uri_encode(&creds.bucket, SIGV4_ENCODE),
            uri_encode(key, SIGV4_ENCODE_PATH)
        );
        // Parameter names are already in byte order.
        let canonical_query = format!(
            "X-Amz-Algorithm={}&X-Amz-Credential={}&X-Amz-Date={}&X-Amz-Expires={}&X-Amz-SignedHeaders=host",
            ALGORITHM,
            uri_encode(&credential, SIGV4_ENCODE),
            timestamp,
            expires_secs
        );
        let canonical_request = format!(
            "PUT\n{}\n{}\nhost:{}\n\nhost\nUNSIGNED-PAYLOAD",
            canonical_uri, canonical_query, host
        );

        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            timestamp,
            scope,
            hex::encode(Sha256::digest(canonical_request.as_bytes()))
        );

        let k_date = hmac(format!("AWS4{}", creds.secret_access_key).as_bytes(), &date)?;
        let k_region = hmac(&k_date, &creds.region)?;
        let k_service = hmac(&k_region, SERVICE)?;
        let k_signing = hmac(&k_service, "aws4_request")?;
        let signature = hex::encode(hmac(&k_signing, &string_to_sign)?);

        Ok(format!(
            "https://{}{}?{}&X-Amz-Signature={}",
            host, canonical_uri, canonical_query, signature
        ))
    }
}

impl UploadSigner for R2Presigner {
    fn presign_put(&self, key: &str, expires_secs: u64) -> Result<String, DomainError> {
        self.presign_put_at(key, expires_secs, (self.clock)())
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.credentials.public_url.trim_end_matches('/'),
            key
        )
    }
}

fn hmac(key: &[u8], data: &str) -> Result<Vec<u8>, DomainError> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| DomainError::Configuration(format!("Invalid signing key: {}", e)))?;
    mac.update(data.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

fn uri_encode(input: &str, set: &'static AsciiSet) -> String {
    utf8_percent_encode(input, set).to_string()
}
