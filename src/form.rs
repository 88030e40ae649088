//! Form field model for the sermon series inputs.
//!
//! `SermonInfo` is the single source of truth for everything the user has
//! entered. Absent input is always the empty string, never an option type,
//! so the prompt builder can substitute fallback literals uniformly.

use serde::Deserialize;

use crate::error::PulpitError;

/// Sentinel dropdown value that redirects to the matching custom text field.
pub const OTHER_OPTION: &str = "기타 (직접 입력)";

/// Selectable department values, as offered by the original form.
pub const DEPARTMENTS: [&str; 10] = [
    "영아부 (0-3세)",
    "유치부 (4-7세)",
    "영유아부 (0-7세 통합)",
    "초등부 (1-3학년)",
    "초등부 (4-6학년)",
    "초등부 (1-6학년 통합)",
    "중등부",
    "고등부",
    "청년부",
    OTHER_OPTION,
];

/// Selectable sermon content classifications.
pub const CONTENT_TYPES: [&str; 6] = [
    "인물별 설교 (Character-based)",
    "사건별 설교 (Event-based)",
    "주제별 설교 (Topic-based)",
    "절기별 설교 (Season-based)",
    "혼합형 (Mixed)",
    "강해 설교 (Expository)",
];

/// Selectable series lengths.
pub const FREQUENCIES: [&str; 8] = [
    "1주 (단회)",
    "4주 (1개월)",
    "10주",
    "12주 (3개월)",
    "26주 (6개월)",
    "48주",
    "52주 (1년)",
    OTHER_OPTION,
];

/// Addressable form fields. String names match the original form's `name`
/// attributes (camelCase).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Department,
    CustomDepartment,
    ContentType,
    ContentDetail,
    Frequency,
    CustomFrequency,
    Theme,
    ScriptureReference,
}

impl Field {
    /// Parse a field from its wire/form name.
    pub fn parse(name: &str) -> Result<Self, PulpitError> {
        match name {
            "department" => Ok(Self::Department),
            "customDepartment" => Ok(Self::CustomDepartment),
            "contentType" => Ok(Self::ContentType),
            "contentDetail" => Ok(Self::ContentDetail),
            "frequency" => Ok(Self::Frequency),
            "customFrequency" => Ok(Self::CustomFrequency),
            "theme" => Ok(Self::Theme),
            "scriptureReference" => Ok(Self::ScriptureReference),
            _ => Err(PulpitError::UnknownField { name: name.to_owned() }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::CustomDepartment => "customDepartment",
            Self::ContentType => "contentType",
            Self::ContentDetail => "contentDetail",
            Self::Frequency => "frequency",
            Self::CustomFrequency => "customFrequency",
            Self::Theme => "theme",
            Self::ScriptureReference => "scriptureReference",
        }
    }
}

/// The two selections that must be non-empty before submission.
const REQUIRED_FIELDS: [Field; 2] = [Field::Department, Field::Frequency];

/// All user-entered sermon parameters. Created all-empty at session start,
/// mutated field-by-field, discarded with the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SermonInfo {
    pub department: String,
    /// Used only when `department` is the `기타 (직접 입력)` option.
    pub custom_department: String,
    pub content_type: String,
    pub content_detail: String,
    pub frequency: String,
    /// Used only when `frequency` is the `기타 (직접 입력)` option.
    pub custom_frequency: String,
    pub theme: String,
    pub scripture_reference: String,
}

impl SermonInfo {
    /// Replace exactly one field's value, leaving all others unchanged.
    /// Idempotent under repeated identical calls. No validation happens
    /// here; validation is deferred to submission.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Department => &self.department,
            Field::CustomDepartment => &self.custom_department,
            Field::ContentType => &self.content_type,
            Field::ContentDetail => &self.content_detail,
            Field::Frequency => &self.frequency,
            Field::CustomFrequency => &self.custom_frequency,
            Field::Theme => &self.theme,
            Field::ScriptureReference => &self.scripture_reference,
        }
    }

    fn field_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Department => &mut self.department,
            Field::CustomDepartment => &mut self.custom_department,
            Field::ContentType => &mut self.content_type,
            Field::ContentDetail => &mut self.content_detail,
            Field::Frequency => &mut self.frequency,
            Field::CustomFrequency => &mut self.custom_frequency,
            Field::Theme => &mut self.theme,
            Field::ScriptureReference => &mut self.scripture_reference,
        }
    }

    /// Names of required selections that are still empty, in form order.
    pub fn missing_required(&self) -> Vec<&'static str> {
        REQUIRED_FIELDS
            .iter()
            .filter(|f| self.get(**f).is_empty())
            .map(|f| f.name())
            .collect()
    }
}
