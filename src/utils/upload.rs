use actix_multipart::{Field, Multipart, MultipartError};
use chrono::Utc;
use futures_util::TryStreamExt;
use log::{debug, error, warn};
use rand::Rng;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::file::{FileField, StoredFile};

pub const ALLOWED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "pdf"];

// Text parts carry short values and the two JSON detail arrays.
const MAX_TEXT_FIELD_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_file_size: usize,
    pub max_docs: usize,
    pub accept_any: bool,
}

/// Files accepted for one request. They live in a per-request directory
/// under the staging root until `commit` moves them into the upload
/// directory or `discard` removes them.
#[derive(Debug)]
pub struct StagedUploads {
    batch_dir: PathBuf,
    upload_dir: PathBuf,
    files: Vec<StoredFile>,
}

impl StagedUploads {
    pub fn new(staging_root: &Path, upload_dir: &Path) -> Self {
        Self {
            batch_dir: staging_root.join(Uuid::new_v4().to_string()),
            upload_dir: upload_dir.to_path_buf(),
            files: Vec::new(),
        }
    }

    pub fn files(&self, field: FileField) -> Vec<&StoredFile> {
        self.files.iter().filter(|f| f.field == field).collect()
    }

    pub fn first(&self, field: FileField) -> Option<&StoredFile> {
        self.files.iter().find(|f| f.field == field)
    }

    pub async fn stage(
        &mut self,
        field: FileField,
        original_name: &str,
        data: &[u8],
    ) -> std::io::Result<&StoredFile> {
        fs::create_dir_all(&self.batch_dir).await?;

        let file_name = generate_file_name(original_name);
        let staged_path = self.batch_dir.join(&file_name);
        fs::write(&staged_path, data).await?;
        debug!("Staged {} upload as {}", field, staged_path.display());

        self.files.push(StoredFile {
            field,
            original_name: original_name.to_string(),
            final_path: self.upload_dir.join(&file_name),
            staged_path,
        });
        Ok(&self.files[self.files.len() - 1])
    }

    /// Moves every file whose stored path is in `keep` into the upload
    /// directory and drops the rest. Returns how many files were moved.
    pub async fn commit(self, keep: &[String]) -> usize {
        let mut moved = 0;
        for file in &self.files {
            if !keep.iter().any(|path| *path == file.stored_path()) {
                warn!(
                    "Dropping unreferenced {} upload '{}'",
                    file.field, file.original_name
                );
                continue;
            }
            match move_file(&file.staged_path, &file.final_path).await {
                Ok(()) => moved += 1,
                Err(err) => error!(
                    "Failed to move {} into {}: {}",
                    file.staged_path.display(),
                    file.final_path.display(),
                    err
                ),
            }
        }
        remove_batch_dir(&self.batch_dir).await;
        moved
    }

    pub async fn discard(self) {
        if !self.files.is_empty() {
            debug!("Discarding {} staged upload(s)", self.files.len());
        }
        remove_batch_dir(&self.batch_dir).await;
    }
}

// Abandoned requests (client gone, shutdown) never reach commit or discard.
impl Drop for StagedUploads {
    fn drop(&mut self) {
        match std::fs::remove_dir_all(&self.batch_dir) {
            Ok(()) => warn!(
                "Removed abandoned staging directory {}",
                self.batch_dir.display()
            ),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!(
                "Failed to clean staging directory {}: {}",
                self.batch_dir.display(),
                err
            ),
        }
    }
}

// EXDEV on Linux and macOS.
const CROSS_DEVICE_LINK: i32 = 18;

fn is_cross_device(err: &std::io::Error) -> bool {
    err.raw_os_error() == Some(CROSS_DEVICE_LINK)
}

/// Renames `from` to `to`, copying across filesystems when a rename cannot.
async fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match fs::rename(from, to).await {
        Err(err) if is_cross_device(&err) => {
            debug!("{} is on another filesystem, copying", to.display());
            copy_then_remove(from, to).await
        }
        result => result,
    }
}

async fn copy_then_remove(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::copy(from, to).await?;
    fs::remove_file(from).await
}

async fn remove_batch_dir(dir: &Path) {
    match fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!("Failed to clean staging directory {}: {}", dir.display(), err),
    }
}

/// Reads the whole multipart body: text parts into a map, file parts into
/// staging. Anything staged is removed again if the body is rejected.
pub async fn receive(
    mut payload: Multipart,
    staging_root: &Path,
    upload_dir: &Path,
    policy: &UploadPolicy,
) -> Result<(HashMap<String, String>, StagedUploads), AppError> {
    let mut fields = HashMap::new();
    let mut uploads = StagedUploads::new(staging_root, upload_dir);

    match read_parts(&mut payload, &mut fields, &mut uploads, policy).await {
        Ok(()) => Ok((fields, uploads)),
        Err(err) => {
            uploads.discard().await;
            Err(err)
        }
    }
}

async fn read_parts(
    payload: &mut Multipart,
    fields: &mut HashMap<String, String>,
    uploads: &mut StagedUploads,
    policy: &UploadPolicy,
) -> Result<(), AppError> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let original_name = disposition.get_filename().map(|f| f.to_string());

        let Some(original_name) = original_name else {
            let data = read_limited(&mut field, MAX_TEXT_FIELD_SIZE)
                .await
                .map_err(malformed)?
                .ok_or_else(|| AppError::BadRequest(format!("Field '{}' is too large", name)))?;
            let value = String::from_utf8(data)
                .map_err(|_| AppError::BadRequest(format!("Field '{}' is not valid UTF-8", name)))?;
            fields.insert(name, value);
            continue;
        };

        // An empty file input still submits a part, with an empty filename.
        if original_name.is_empty() {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        }

        let file_field = FileField::from_name(&name)
            .ok_or_else(|| rejected(&name, "Unexpected file field"))?;
        let max_count = file_field.max_count(policy.max_docs);
        if uploads.files(file_field).len() >= max_count {
            return Err(rejected(
                &name,
                format!("Too many files; at most {} allowed", max_count),
            ));
        }

        let data = read_limited(&mut field, policy.max_file_size)
            .await
            .map_err(malformed)?
            .ok_or_else(|| {
                rejected(
                    &name,
                    format!("File exceeds the {} byte limit", policy.max_file_size),
                )
            })?;

        check_file_type(&original_name, &data, policy).map_err(|msg| rejected(&name, msg))?;
        uploads.stage(file_field, &original_name, &data).await?;
    }

    Ok(())
}

/// Collects a part's bytes, or `None` once it grows past `limit`.
async fn read_limited(field: &mut Field, limit: usize) -> Result<Option<Vec<u8>>, MultipartError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await? {
        if data.len() + chunk.len() > limit {
            return Ok(None);
        }
        data.extend_from_slice(&chunk);
    }
    Ok(Some(data))
}

fn malformed(err: MultipartError) -> AppError {
    AppError::BadRequest(format!("Malformed multipart body: {}", err))
}

fn rejected(field: &str, message: impl Into<String>) -> AppError {
    AppError::FileRejected {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Extension and sniffed content must both be an image or PDF, unless the
/// policy accepts any file.
pub fn check_file_type(original_name: &str, data: &[u8], policy: &UploadPolicy) -> Result<(), String> {
    if policy.accept_any {
        return Ok(());
    }

    let extension = extension_of(original_name)
        .ok_or_else(|| "File has no extension; only images and PDFs are allowed".to_string())?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(format!(
            "File type '.{}' is not allowed; only images and PDFs are accepted",
            extension
        ));
    }

    let kind = infer::get(data).ok_or_else(|| "Unrecognised file content".to_string())?;
    let mime = kind.mime_type();
    if mime.starts_with("image/") || mime == "application/pdf" {
        Ok(())
    } else {
        Err(format!("File content '{}' is not an image or PDF", mime))
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(|ext| ext.to_lowercase())
}

/// `<unix millis>-<random>.<ext>`; the client's name is only used for its
/// extension.
pub fn generate_file_name(original_name: &str) -> String {
    let suffix: u32 = rand::thread_rng().gen_range(100_000_000..1_000_000_000);
    let millis = Utc::now().timestamp_millis();
    match extension_of(original_name) {
        Some(ext) => format!("{}-{}.{}", millis, suffix, ext),
        None => format!("{}-{}", millis, suffix),
    }
}

/// Unlinks every regular file directly inside `dir`. Failures are logged
/// and skipped; the count of removed files is returned.
pub async fn purge_directory(dir: &Path) -> std::io::Result<usize> {
    let mut entries = match fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(0),
        Err(err) => return Err(err),
    };

    let mut removed = 0;
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match fs::remove_file(entry.path()).await {
            Ok(()) => removed += 1,
            Err(err) => warn!("Failed to delete {}: {}", entry.path().display(), err),
        }
    }
    Ok(removed)
}
