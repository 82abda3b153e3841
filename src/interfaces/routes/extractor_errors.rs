use actix_multipart::{form::MultipartFormConfig, MultipartError};
use actix_web::{error::PayloadError, web};

use crate::errors::AppError;

/// Multipart framing allowance on top of the payload itself.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

/// Renders JSON and multipart extractor failures with the `{"error": ..}`
/// body used everywhere else.
pub fn config_routes(cfg: &mut web::ServiceConfig, max_upload_size: u64) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        AppError::from(err).into()
    }));

    let total_limit = multipart_total_limit(max_upload_size);
    cfg.app_data(
        MultipartFormConfig::default()
            .total_limit(total_limit)
            .error_handler(move |err, _req| multipart_error(err, max_upload_size).into())
    );
}

/// Bodies up to twice the upload limit reach the service, which then
/// reports the size violation itself.
fn multipart_total_limit(max_upload_size: u64) -> usize {
    let limit = max_upload_size.saturating_mul(2).saturating_add(MULTIPART_OVERHEAD);
    usize::try_from(limit).unwrap_or(usize::MAX)
}

fn multipart_error(err: MultipartError, max_upload_size: u64) -> AppError {
    match err {
        MultipartError::Payload(PayloadError::Overflow) => AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} bytes",
            max_upload_size
        )),
        _ => AppError::InvalidInput(format!("Invalid multipart request: {}", err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_limit_leaves_room_for_service_check() {
        assert_eq!(multipart_total_limit(10), 20 + MULTIPART_OVERHEAD as usize);
        assert_eq!(multipart_total_limit(u64::MAX), usize::MAX);
    }

    #[test]
    fn content_type_errors_are_invalid_input() {
        let err = multipart_error(MultipartError::ContentTypeMissing, 10);
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn overflow_is_payload_too_large() {
        let err = multipart_error(MultipartError::Payload(PayloadError::Overflow), 10);
        assert_eq!(err, AppError::PayloadTooLarge("File size exceeds maximum allowed size of 10 bytes".into()));
    }
}
