//! Upload requests for photos and videos attached to work entries.
//!
//! Files never pass through this service: a client asks for a presigned PUT
//! URL, uploads straight to object storage and then submits the public URL
//! with its work entry.

use crate::error::{DomainError, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Seconds a presigned upload URL stays valid.
pub const UPLOAD_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadFolder {
    Images,
    Videos,
}

impl UploadFolder {
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadFolder::Images => "images",
            UploadFolder::Videos => "videos",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "images" => Some(UploadFolder::Images),
            "videos" => Some(UploadFolder::Videos),
            _ => None,
        }
    }

    pub fn file_check(&self) -> FileCheck {
        match self {
            UploadFolder::Images => FileCheck::PHOTO,
            UploadFolder::Videos => FileCheck::VIDEO,
        }
    }
}

/// Size and MIME limits for one kind of attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileCheck {
    pub max_size_mb: u64,
    /// Exact MIME types or `type/*` wildcards. Empty allows any type.
    pub allowed_types: &'static [&'static str],
}

impl FileCheck {
    pub const PHOTO: FileCheck = FileCheck {
        max_size_mb: 10,
        allowed_types: &["image/*"],
    };

    pub const VIDEO: FileCheck = FileCheck {
        max_size_mb: 100,
        allowed_types: &["video/*"],
    };

    pub fn type_allowed(&self, mime: &str) -> bool {
        if self.allowed_types.is_empty() {
            return true;
        }
        self.allowed_types.iter().any(|allowed| {
            match allowed.strip_suffix("/*") {
                Some(family) => mime
                    .split_once('/')
                    .is_some_and(|(prefix, _)| prefix == family),
                None => mime == *allowed,
            }
        })
    }

    pub fn validate(&self, size_bytes: Option<u64>, mime: &str) -> Result<()> {
        if let Some(size) = size_bytes {
            if size > self.max_size_mb * 1024 * 1024 {
                return Err(DomainError::Validation(format!(
                    "File size {} exceeds {}MB limit",
                    format_file_size(size),
                    self.max_size_mb
                )));
            }
        }
        if !self.type_allowed(mime) {
            return Err(DomainError::Validation(format!(
                "File type {mime} is not allowed"
            )));
        }
        Ok(())
    }
}

/// Body of a presigned upload request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    #[serde(default)]
    pub folder: String,
    /// Optional; checked against the folder's size limit when present.
    #[serde(default)]
    pub file_size: Option<u64>,
}

/// An upload request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidUpload {
    pub file_name: String,
    pub file_type: String,
    pub folder: UploadFolder,
}

impl UploadRequest {
    pub fn validate(&self) -> Result<ValidUpload> {
        if self.file_name.trim().is_empty()
            || self.file_type.trim().is_empty()
            || self.folder.trim().is_empty()
        {
            return Err(DomainError::Validation(
                "Missing required fields: fileName, fileType, folder".to_string(),
            ));
        }

        let folder = UploadFolder::parse(&self.folder).ok_or_else(|| {
            DomainError::Validation("Invalid folder. Must be \"images\" or \"videos\"".to_string())
        })?;

        folder
            .file_check()
            .validate(self.file_size, &self.file_type)
            .map_err(|e| DomainError::Validation(format!("{}: {}", self.file_name, e)))?;

        Ok(ValidUpload {
            file_name: self.file_name.clone(),
            file_type: self.file_type.clone(),
            folder,
        })
    }
}

/// Response of a presigned upload request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUpload {
    pub upload_url: String,
    pub file_url: String,
    pub key: String,
}

/// Object key for an upload: `{folder}/{millis}-{suffix}.{ext}`.
///
/// The extension is whatever follows the last `.` of the original name, or
/// the whole name when it has none.
pub fn object_key(folder: UploadFolder, file_name: &str, millis: i64, suffix: &str) -> String {
    let extension = file_name.rsplit('.').next().unwrap_or(file_name);
    format!("{}/{}-{}.{}", folder.as_str(), millis, suffix, extension)
}

const SUFFIX_CHARS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 suffix used to keep object keys unique.
pub fn random_suffix(rng: &mut impl Rng, len: usize) -> String {
    (0..len)
        .map(|_| SUFFIX_CHARS[rng.gen_range(0..SUFFIX_CHARS.len())] as char)
        .collect()
}

/// Human readable size, e.g. `1.5 KB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn request(name: &str, mime: &str, folder: &str) -> UploadRequest {
        UploadRequest {
            file_name: name.into(),
            file_type: mime.into(),
            folder: folder.into(),
            file_size: None,
        }
    }

    #[test]
    fn test_missing_fields() {
        let err = request("", "image/png", "images").validate().unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation("Missing required fields: fileName, fileType, folder".into())
        );
    }

    #[test]
    fn test_invalid_folder() {
        let err = request("a.png", "image/png", "docs").validate().unwrap_err();
        assert!(err.to_string().starts_with("Invalid folder"));
    }

    #[test]
    fn test_mime_must_match_folder() {
        assert!(request("a.png", "image/png", "images").validate().is_ok());
        assert!(request("a.mp4", "video/mp4", "images").validate().is_err());
        assert!(request("a.mp4", "video/mp4", "videos").validate().is_ok());
    }

    #[test]
    fn test_size_limit() {
        let mut req = request("big.jpg", "image/jpeg", "images");
        req.file_size = Some(11 * 1024 * 1024);
        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds 10MB limit"));

        req.folder = "videos".into();
        req.file_type = "video/mp4".into();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_wildcard_does_not_match_prefix_only() {
        assert!(!FileCheck::PHOTO.type_allowed("imagex/png"));
        assert!(FileCheck::PHOTO.type_allowed("image/webp"));
    }

    #[test]
    fn test_object_key() {
        assert_eq!(
            object_key(UploadFolder::Images, "site.photo.JPG", 1700000000000, "abc"),
            "images/1700000000000-abc.JPG"
        );
        assert_eq!(
            object_key(UploadFolder::Videos, "clip", 1, "x"),
            "videos/1-x.clip"
        );
    }

    #[test]
    fn test_random_suffix() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = random_suffix(&mut rng, 13);
        assert_eq!(s.len(), 13);
        assert!(s.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
    }
}
