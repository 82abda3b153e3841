use actix_multipart::form::MultipartForm;
use actix_web::{
    http::header::{ContentDisposition, DispositionParam, DispositionType},
    web::{self, Bytes},
    Error, HttpResponse, Responder,
};
use futures_util::{stream, TryStreamExt};
use tokio::{fs::File, io::AsyncReadExt};
use tracing::{error, instrument};

use crate::{
    entities::image::{ImageFile, ImageUpload, ImageUploadForm},
    errors::AppError,
    AppState,
};

const CHUNK_SIZE: usize = 64 * 1024;

#[instrument(skip(state))]
pub async fn list_images(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let images = state.image_handler.list_images().await?;
    Ok(HttpResponse::Ok().json(images))
}

#[instrument(skip(state))]
pub async fn get_image(
    image_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let image = state.image_handler.get_image(&image_id).await?;
    Ok(HttpResponse::Ok().json(image))
}

#[instrument(skip(state, form))]
pub async fn upload_image(
    state: web::Data<AppState>,
    form: Result<MultipartForm<ImageUploadForm>, Error>,
) -> Result<impl Responder, AppError> {
    // The temp file lives as long as `form`, so it must outlive the upload.
    let form = form.map_err(upload_form_error)?.into_inner();
    let upload = form.image.as_ref().map(|part| ImageUpload {
        filename: part.file_name.clone(),
        size: part.size as u64,
        source: part.file.path().to_path_buf(),
    });

    let image = state.image_handler.upload_image(upload).await?;
    Ok(HttpResponse::Created().json(image))
}

/// Requests the multipart extractor refuses outright (wrong or missing
/// content type) never reach the configured error handler, so they are
/// mapped here. Errors that did pass through it are already `AppError`s.
fn upload_form_error(err: Error) -> AppError {
    match err.as_error::<AppError>() {
        Some(AppError::PayloadTooLarge(msg)) => AppError::PayloadTooLarge(msg.clone()),
        Some(AppError::InvalidInput(msg)) => AppError::InvalidInput(msg.clone()),
        _ => {
            tracing::debug!("Rejected upload body: {}", err);
            AppError::InvalidInput("No image file provided".into())
        }
    }
}

#[instrument(skip(state))]
pub async fn serve_image_file(
    image_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let ImageFile { image, file } = state.image_handler.open_image_file(&image_id).await?;

    let id = image.id;
    let body = stream::try_unfold(file, next_chunk)
        .inspect_err(move |e| error!("Failed to send image {}: {}", id, e));

    Ok(HttpResponse::Ok()
        .content_type(image.mime_type.as_str())
        .insert_header(ContentDisposition {
            disposition: DispositionType::Inline,
            parameters: vec![DispositionParam::Filename(image.filename.clone())],
        })
        .streaming(body))
}

async fn next_chunk(mut file: File) -> std::io::Result<Option<(Bytes, File)>> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let read = file.read(&mut buf).await?;
    if read == 0 {
        return Ok(None);
    }
    buf.truncate(read);
    Ok(Some((Bytes::from(buf), file)))
}

#[instrument(skip(state))]
pub async fn delete_image(
    image_id: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state.image_handler.delete_image(&image_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({"message": "Image deleted successfully"})))
}
