use std::path::PathBuf;

/// User-facing failure taxonomy. Every failure is handled at the boundary
/// where it occurs and converted to one of these; none propagate as panics.
///
/// The Korean display strings are the exact notifications shown to the user;
/// diagnostic context travels in the variant fields and the tracing log, not
/// in the message.
#[derive(Debug, thiserror::Error)]
pub enum PulpitError {
    /// Attachment rejected at selection time: only PDF is accepted.
    #[error("PDF 파일만 업로드 가능합니다. (got media type '{mime_type}')")]
    UnsupportedFileType { mime_type: String },

    /// Attachment rejected at selection time: over the 20 MiB cap.
    #[error("파일 크기는 20MB 이하여야 합니다. ({size} bytes, max {max})")]
    FileTooLarge { size: usize, max: usize },

    #[error("Failed to read attachment {path}: {detail}")]
    AttachmentReadFailed { path: PathBuf, detail: String },

    /// No API credential configured; generation is not attempted.
    #[error("API Key가 설정되지 않았습니다. 환경 변수를 확인해주세요.")]
    MissingCredential,

    /// Any transport or service failure during the one-shot generation call.
    /// The underlying cause is logged, never surfaced here.
    #[error("결과 생성 중 오류가 발생했습니다. (API Key 또는 네트워크 상태를 확인해주세요)")]
    GenerationFailed,

    /// A generation call is already in flight; the new call is rejected
    /// rather than queued.
    #[error("A generation request is already in flight")]
    Busy,

    /// Submission attempted without the mandatory selections.
    #[error("부서와 설교 횟수는 필수 선택 사항입니다. (missing: {fields:?})")]
    ValidationRequired { fields: Vec<&'static str> },

    #[error("Unknown form field '{name}'")]
    UnknownField { name: String },

    #[error("Failed to parse environment variable '{var}': {detail}")]
    ConfigEnvParseError { var: String, detail: String },

    #[error("Invalid temperature {value} (expected 0.0..=2.0)")]
    InvalidTemperature { value: f64 },

    #[error("Invalid API URL '{value}': {detail}")]
    InvalidApiUrl { value: String, detail: String },
}
