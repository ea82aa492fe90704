//! Image upload adapter
//!
//! Files are pre-checked with [`check_image`] before anything goes over the
//! wire, then stored under `images/<unix-millis>-<base36>.<ext>` and
//! resolved to a public URL.

use rand::Rng;
use roster_common::draft::FileAttachment;
use thiserror::Error;

use super::backend_client::{BackendError, DataBackend};

/// Largest accepted image, in bytes (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Storage folder for every uploaded image
pub const IMAGE_PREFIX: &str = "images";

const SUFFIX_LEN: usize = 11;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Upload errors
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File {file_name} is {size} bytes; the limit is 5MB")]
    FileTooLarge { file_name: String, size: usize },

    #[error("File {file_name} has type {content_type}, expected an image")]
    NotAnImage {
        file_name: String,
        content_type: String,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] BackendError),
}

/// A stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Path inside the bucket
    pub path: String,
    pub public_url: String,
}

/// Reject files over [`MAX_IMAGE_BYTES`] or with a non-image type
pub fn check_image(file: &FileAttachment) -> Result<(), UploadError> {
    if file.size() > MAX_IMAGE_BYTES {
        return Err(UploadError::FileTooLarge {
            file_name: file.file_name.clone(),
            size: file.size(),
        });
    }
    if !file.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
        });
    }
    Ok(())
}

/// Extension of the original name: text after the last dot, or the whole
/// name when there is no dot
fn extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

fn base36_suffix<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Build a probabilistically unique storage path
pub fn storage_path<R: Rng + ?Sized>(file_name: &str, now_millis: i64, rng: &mut R) -> String {
    format!(
        "{}/{}-{}.{}",
        IMAGE_PREFIX,
        now_millis,
        base36_suffix(rng),
        extension(file_name)
    )
}

/// Check, store and resolve one image
pub async fn upload_image(
    backend: &dyn DataBackend,
    file: &FileAttachment,
) -> Result<UploadedFile, UploadError> {
    check_image(file)?;

    // ThreadRng is not Send; keep it out of the await below
    let path = {
        let mut rng = rand::thread_rng();
        storage_path(&file.file_name, chrono::Utc::now().timestamp_millis(), &mut rng)
    };

    backend
        .upload_object(&path, &file.content_type, file.bytes.clone())
        .await
        .map_err(|e| {
            tracing::error!(path = %path, error = %e, "Image upload failed");
            UploadError::Storage(e)
        })?;

    let public_url = backend.public_url(&path);
    tracing::info!(path = %path, "Uploaded image");

    Ok(UploadedFile { path, public_url })
}
