pub mod identify;
pub mod index;
pub mod info;
pub mod local;

use leafcheck::pipeline::{Upload, UploadError};
use tiny_http::Request;

use crate::util::multipart::read_file_part;

/// Form field carrying the photo.
pub const IMAGE_FIELD: &str = "image";

/// Reads and validates the `image` file part of a multipart request.
pub fn read_upload(request: &mut Request) -> Result<Upload, UploadError> {
    match read_file_part(request, IMAGE_FIELD) {
        Some(part) => Upload::new(Some(part.filename), Some(part.bytes)),
        None => Upload::new(None, None),
    }
}
