use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::web;
use log::debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::errors::AppError;

/// Resolves a bare file name inside the upload directory. Anything that
/// could step outside it, or reach a hidden entry, resolves to nothing.
fn resolve_upload(upload_dir: &Path, file_name: &str) -> Option<PathBuf> {
    let plain = !file_name.is_empty()
        && !file_name.starts_with('.')
        && !file_name.contains(['/', '\\'])
        && !file_name.contains("..");
    plain.then(|| upload_dir.join(file_name))
}

/// GET /api/download/{filename}
pub async fn download_file(
    config: web::Data<Config>,
    file_name: web::Path<String>,
) -> Result<NamedFile, AppError> {
    let file_name = file_name.into_inner();
    let path = resolve_upload(&config.upload_dir, &file_name)
        .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

    let file = NamedFile::open_async(&path).await.map_err(|err| match err.kind() {
        ErrorKind::NotFound => AppError::NotFound("File not found".to_string()),
        _ => AppError::IoError(err),
    })?;
    if !file.metadata().is_file() {
        return Err(AppError::NotFound("File not found".to_string()));
    }

    debug!("Serving download {}", path.display());
    Ok(file.set_content_disposition(ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(file_name)],
    }))
}
