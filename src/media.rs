// Image attachments
// Attachments are handed out as reference-counted handles. The draft holds one
// while composing; sending moves it into the message, discarding drops it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use log::{debug, info};
use thiserror::Error;
use uuid::Uuid;

const IMAGE_MIME_PREFIX: &str = "image/";

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("{file} is not an image (detected {mime})")]
    NotAnImage { file: String, mime: String },

    #[error("failed to read attachment {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug)]
pub struct Attachment {
    pub id: Uuid,
    pub file_name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: Option<PathBuf>,
}

/// Opaque, cheaply cloneable handle to an attached image.
#[derive(Debug, Clone)]
pub struct ImageRef(Arc<Attachment>);

impl ImageRef {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn file_name(&self) -> &str {
        &self.0.file_name
    }

    pub fn mime_type(&self) -> &str {
        &self.0.mime_type
    }

    pub fn size(&self) -> u64 {
        self.0.size
    }

    pub fn path(&self) -> Option<&Path> {
        self.0.path.as_deref()
    }

    /// Human readable size, e.g. `12.3 KB`.
    pub fn size_label(&self) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        match self.0.size {
            s if s >= MB => format!("{:.1} MB", s as f64 / MB as f64),
            s if s >= KB => format!("{:.1} KB", s as f64 / KB as f64),
            s => format!("{} B", s),
        }
    }
}

impl PartialEq for ImageRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

pub fn is_image_mime(mime: &str) -> bool {
    mime.starts_with(IMAGE_MIME_PREFIX)
}

/// Issues image handles and keeps track of which ones are still alive.
#[derive(Debug, Default)]
pub struct MediaLibrary {
    issued: Vec<Weak<Attachment>>,
}

impl MediaLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a handle for a file on disk.
    ///
    /// The MIME type is guessed from the path and must be an `image/*` type.
    pub fn acquire(&mut self, path: &Path) -> Result<ImageRef, AttachError> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment")
            .to_string();
        let mime = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream");

        if !is_image_mime(mime) {
            return Err(AttachError::NotAnImage {
                file: file_name,
                mime: mime.to_string(),
            });
        }

        let metadata = fs::metadata(path).map_err(|source| AttachError::Io {
            path: path.display().to_string(),
            source,
        })?;

        info!("Acquired image attachment {} ({}, {} bytes)", file_name, mime, metadata.len());
        Ok(self.track(Attachment {
            id: Uuid::new_v4(),
            file_name,
            mime_type: mime.to_string(),
            size: metadata.len(),
            path: Some(path.to_path_buf()),
        }))
    }

    /// Register an image that does not come from the filesystem.
    pub fn register(&mut self, file_name: &str, mime_type: &str, size: u64) -> Result<ImageRef, AttachError> {
        if !is_image_mime(mime_type) {
            return Err(AttachError::NotAnImage {
                file: file_name.to_string(),
                mime: mime_type.to_string(),
            });
        }

        Ok(self.track(Attachment {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            size,
            path: None,
        }))
    }

    /// Number of issued attachments that are still held somewhere.
    pub fn live(&self) -> usize {
        self.issued.iter().filter(|weak| weak.strong_count() > 0).count()
    }

    fn track(&mut self, attachment: Attachment) -> ImageRef {
        let before = self.issued.len();
        self.issued.retain(|weak| weak.strong_count() > 0);
        if self.issued.len() != before {
            debug!("Released {} image attachments", before - self.issued.len());
        }

        let handle = Arc::new(attachment);
        self.issued.push(Arc::downgrade(&handle));
        ImageRef(handle)
    }
}
