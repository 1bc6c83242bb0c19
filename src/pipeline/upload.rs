use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Input errors.  Their display text is sent to the caller verbatim.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("No image was uploaded.")]
    Missing,

    #[error("Invalid file.")]
    InvalidName,

    #[error("Could not read the image.")]
    Unreadable,

    #[error("Could not re-encode the image: {0}")]
    Encode(image::ImageError),

    #[error("Could not store the upload: {0}")]
    Io(#[from] io::Error),
}

/// An uploaded image and the client-supplied file name.
#[derive(Debug, Clone)]
pub struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

impl Upload {
    /// Validates a multipart file part.  `None` for either field means the
    /// `image` part was absent.
    pub fn new(filename: Option<String>, bytes: Option<Vec<u8>>) -> Result<Self, UploadError> {
        let (filename, bytes) = match (filename, bytes) {
            (Some(f), Some(b)) => (f, b),
            _ => return Err(UploadError::Missing),
        };
        let filename = sanitize_filename(&filename).ok_or(UploadError::InvalidName)?;
        Ok(Upload { filename, bytes })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Writes the upload to `dir/<filename>`.  Same-named uploads overwrite
    /// each other (last write wins).
    pub fn persist(&self, dir: &Path) -> io::Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Keeps only the final path component; rejects names that would escape
/// the upload directory.
fn sanitize_filename(raw: &str) -> Option<String> {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_owned())
}
