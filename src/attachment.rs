//! PDF attachment validation and transport encoding.
//!
//! A selected file becomes an [`Attachment`] only after passing the media
//! type and size checks, in that order. The binary content is carried as
//! standard base64 so it can travel inside the JSON generation request, and
//! decoding it reproduces the original bytes exactly.

use std::path::Path;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::PulpitError;

/// The only accepted media type.
pub const PDF_MIME: &str = "application/pdf";

/// Maximum attachment size: 20 MiB.
pub const MAX_ATTACHMENT_BYTES: usize = 20 * 1024 * 1024;

/// A validated, transport-encoded reference document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Original filename.
    pub name: String,
    pub mime_type: String,
    /// File content, standard base64.
    pub data: String,
}

impl Attachment {
    /// Validate and encode raw file content.
    ///
    /// Checks, in order: media type must be exactly `application/pdf`
    /// (`UnsupportedFileType`), then size ≤ 20 MiB (`FileTooLarge`).
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: &str,
        bytes: &[u8],
    ) -> Result<Self, PulpitError> {
        if mime_type != PDF_MIME {
            return Err(PulpitError::UnsupportedFileType {
                mime_type: mime_type.to_owned(),
            });
        }
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(PulpitError::FileTooLarge {
                size: bytes.len(),
                max: MAX_ATTACHMENT_BYTES,
            });
        }
        Ok(Self {
            name: name.into(),
            mime_type: PDF_MIME.to_owned(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Read a file from disk and validate it. The media type is inferred
    /// from the file extension, standing in for the browser-reported type
    /// of the original form.
    pub fn from_path(path: &Path) -> Result<Self, PulpitError> {
        let mime_type = mime_from_extension(path);
        // Reject on type before touching the file content.
        if mime_type != PDF_MIME {
            return Err(PulpitError::UnsupportedFileType {
                mime_type: mime_type.to_owned(),
            });
        }
        let bytes = std::fs::read(path).map_err(|e| PulpitError::AttachmentReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(name, mime_type, &bytes)
    }

    /// Decode the transport encoding back to the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD.decode(&self.data)
    }
}

fn mime_from_extension(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => PDF_MIME,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" | "md" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Holder for the at-most-one attachment of a session.
///
/// `attach` replaces any prior attachment in one step; `detach` is always
/// legal, including when nothing is attached.
#[derive(Debug, Default)]
pub struct AttachmentSlot {
    current: Option<Attachment>,
}

impl AttachmentSlot {
    /// Store a validated attachment, returning the one it replaced, if any.
    pub fn attach(&mut self, attachment: Attachment) -> Option<Attachment> {
        self.current.replace(attachment)
    }

    /// Clear the slot unconditionally.
    pub fn detach(&mut self) {
        self.current = None;
    }

    pub fn get(&self) -> Option<&Attachment> {
        self.current.as_ref()
    }

    pub fn is_attached(&self) -> bool {
        self.current.is_some()
    }
}
