//! Media - Local, content-addressed image storage
//!
//! Files are named by the SHA-256 of their bytes plus an extension derived
//! from the MIME type, so identical uploads share one file.

use crate::core::AppError;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info, instrument};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const PUBLIC_PREFIX: &str = "/images";

const ALLOWED_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// Extension for an accepted upload, or the error to return to the client
pub fn validate_image(content_type: &str, len: usize) -> Result<&'static str, AppError> {
    // drop parameters such as "; charset=binary"
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    let extension = ALLOWED_TYPES
        .iter()
        .find(|(allowed, _)| *allowed == mime)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            AppError::unsupported_media_type("Only JPEG, PNG, GIF and WebP images are accepted")
        })?;

    if len == 0 {
        return Err(AppError::bad_request("Empty upload"));
    }
    if len > MAX_IMAGE_BYTES {
        return Err(AppError::payload_too_large("Images are limited to 5 MB"));
    }
    Ok(extension)
}

/// MIME type served back for a stored file name
pub fn content_type_for(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    ALLOWED_TYPES
        .iter()
        .find(|(_, allowed)| *allowed == ext)
        .map(|(mime, _)| *mime)
}

/// `<64 hex chars>.<known extension>`, which also rules out path traversal
fn is_stored_name(name: &str) -> bool {
    match name.split_once('.') {
        Some((hash, _)) => {
            hash.len() == 64
                && hash.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
                && content_type_for(name).is_some()
        }
        None => false,
    }
}

pub struct StoredImage {
    pub name: String,
    pub url: String,
}

pub struct ImageStore {
    root_path: PathBuf,
}

impl ImageStore {
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    #[instrument(skip(self, data), fields(len = data.len()))]
    pub async fn save(&self, data: &[u8], content_type: &str) -> Result<StoredImage, AppError> {
        let extension = validate_image(content_type, data.len())?;

        let hash = hex::encode(Sha256::digest(data));
        let name = format!("{}.{}", hash, extension);
        let target_path = self.root_path.join(&name);

        fs::create_dir_all(&self.root_path).await?;
        if fs::try_exists(&target_path).await? {
            debug!("Image already stored, reusing {}", name);
        } else {
            fs::write(&target_path, data).await?;
            info!("Stored image {}", name);
        }

        Ok(StoredImage {
            url: format!("{}/{}", PUBLIC_PREFIX, name),
            name,
        })
    }

    /// Bytes of a stored image, `None` when the name is unknown or malformed
    pub async fn read(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        if !is_stored_name(name) {
            return Ok(None);
        }
        match fs::read(self.root_path.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
