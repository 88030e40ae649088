//! A single editing session: form state, attachment, and the derived prompt.
//!
//! The prompt is a view over (form, attachment presence) and is recomputed
//! explicitly after every mutation, so it can never desynchronize from its
//! inputs. Nothing here persists beyond the process.

use std::path::Path;

use crate::attachment::{Attachment, AttachmentSlot};
use crate::error::PulpitError;
use crate::form::{Field, SermonInfo};
use crate::gemini::GenerationClient;
use crate::prompt;

#[derive(Debug)]
pub struct FormSession {
    info: SermonInfo,
    attachment: AttachmentSlot,
    /// Derived from `info` and attachment presence; see `refresh_prompt`.
    prompt: String,
    /// Set only by a successful generation; a failed call leaves the
    /// previous result untouched.
    last_result: Option<String>,
}

impl Default for FormSession {
    fn default() -> Self {
        Self::new()
    }
}

impl FormSession {
    pub fn new() -> Self {
        let info = SermonInfo::default();
        let prompt = prompt::build(&info, false);
        Self {
            info,
            attachment: AttachmentSlot::default(),
            prompt,
            last_result: None,
        }
    }

    pub fn info(&self) -> &SermonInfo {
        &self.info
    }

    /// Current prompt preview, always in sync with the form state.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.attachment.get()
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Update one field and recompute the prompt.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.info.set(field, value);
        self.refresh_prompt();
    }

    /// Update one field addressed by its form name.
    pub fn set_field_by_name(&mut self, name: &str, value: &str) -> Result<(), PulpitError> {
        let field = Field::parse(name)?;
        self.set_field(field, value);
        Ok(())
    }

    /// Store a validated attachment, replacing any prior one.
    pub fn attach(&mut self, attachment: Attachment) {
        if let Some(replaced) = self.attachment.attach(attachment) {
            tracing::debug!(name = %replaced.name, "replaced previous attachment");
        }
        self.refresh_prompt();
    }

    /// Validate, read, and attach a PDF from disk.
    pub fn attach_path(&mut self, path: &Path) -> Result<(), PulpitError> {
        let attachment = Attachment::from_path(path)?;
        tracing::info!(name = %attachment.name, encoded_len = attachment.data.len(), "attachment accepted");
        self.attach(attachment);
        Ok(())
    }

    /// Clear the attachment; legal even when nothing is attached.
    pub fn detach(&mut self) {
        self.attachment.detach();
        self.refresh_prompt();
    }

    /// Validate the required selections, then dispatch the one-shot
    /// generation call. On success the returned plan also becomes
    /// `last_result`; on failure the previous result is kept.
    pub fn submit(&mut self, client: &mut GenerationClient) -> Result<String, PulpitError> {
        let missing = self.info.missing_required();
        if !missing.is_empty() {
            return Err(PulpitError::ValidationRequired { fields: missing });
        }

        let plan = client.generate(&self.prompt, self.attachment.get())?;
        self.last_result = Some(plan.clone());
        Ok(plan)
    }

    fn refresh_prompt(&mut self) {
        self.prompt = prompt::build(&self.info, self.attachment.is_attached());
    }
}
