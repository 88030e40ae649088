use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::PulpitError;
use crate::form::{CONTENT_TYPES, DEPARTMENTS, FREQUENCIES, Field};
use crate::session::FormSession;

/// pulpit: church-school sermon series planner.
///
/// Renders structured ministry inputs into a Korean planning prompt and
/// requests a Markdown sermon plan from the Gemini API.
#[derive(Debug, Parser)]
#[command(name = "pulpit", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the prompt and request a sermon plan from the generation API.
    Generate(GenerateArgs),

    /// Print the prompt that would be sent, without calling the API.
    Prompt(PromptArgs),

    /// List the selectable department, content type, and frequency values.
    Options,
}

/// The form fields, one flag per field. Selections are passed as their
/// literal Korean option strings (see `pulpit options`); pick
/// "기타 (직접 입력)" and set the matching --custom-* flag for free-form
/// values.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct FormArgs {
    /// Target department (required for generate).
    #[arg(long)]
    pub department: Option<String>,

    /// Free-form department, used with the "기타 (직접 입력)" selection.
    #[arg(long)]
    pub custom_department: Option<String>,

    /// Sermon content classification.
    #[arg(long)]
    pub content_type: Option<String>,

    /// Focus details (e.g. "다윗의 일생", "십계명").
    #[arg(long)]
    pub content_detail: Option<String>,

    /// Series length (required for generate).
    #[arg(long)]
    pub frequency: Option<String>,

    /// Free-form length, used with the "기타 (직접 입력)" selection.
    #[arg(long)]
    pub custom_frequency: Option<String>,

    /// Core theme or keyword (e.g. "순종", "믿음").
    #[arg(long)]
    pub theme: Option<String>,

    /// Reference scripture range (e.g. "마태복음 5-7장").
    #[arg(long)]
    pub scripture_reference: Option<String>,

    /// PDF curriculum or annual plan to attach (max 20 MiB).
    #[arg(long)]
    pub attach: Option<PathBuf>,
}

impl FormArgs {
    /// Apply every provided flag to the session, field by field, then the
    /// attachment last.
    pub fn apply_to(&self, session: &mut FormSession) -> Result<(), PulpitError> {
        let fields = [
            (Field::Department, &self.department),
            (Field::CustomDepartment, &self.custom_department),
            (Field::ContentType, &self.content_type),
            (Field::ContentDetail, &self.content_detail),
            (Field::Frequency, &self.frequency),
            (Field::CustomFrequency, &self.custom_frequency),
            (Field::Theme, &self.theme),
            (Field::ScriptureReference, &self.scripture_reference),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                session.set_field(field, v.clone());
            }
        }
        if let Some(path) = &self.attach {
            session.attach_path(path)?;
        }
        Ok(())
    }
}

/// Arguments for the `generate` subcommand.
///
/// Connection settings can also come from env vars (`PULPIT_API_KEY`,
/// `PULPIT_MODEL`, …) or a TOML config file. Precedence: CLI > env > file.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Path to a TOML configuration file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Generation model identifier (default: "gemini-2.5-flash").
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the generation service.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Write the generated plan to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Log level filter (default: "info"). Supports tracing directives
    /// (e.g. "debug", "pulpit=trace,warn"). Overridden by PULPIT_LOG.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to a log file. When set, structured JSON logs are appended
    /// here in addition to the stderr output.
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Arguments for the `prompt` subcommand.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PromptArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Write the prompt to this file instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

/// Render the selectable option lists for `pulpit options`.
pub fn render_options() -> String {
    let mut out = String::new();
    for (title, values) in [
        ("department", &DEPARTMENTS[..]),
        ("content-type", &CONTENT_TYPES[..]),
        ("frequency", &FREQUENCIES[..]),
    ] {
        out.push_str(&format!("--{title}:\n"));
        for v in values {
            out.push_str(&format!("  {v}\n"));
        }
        out.push('\n');
    }
    out.trim_end().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn generate_parses_form_flags() {
        let cli = Cli::try_parse_from([
            "pulpit",
            "generate",
            "--department",
            "초등부 (1-3학년)",
            "--frequency",
            "4주 (1개월)",
            "--theme",
            "순종",
        ])
        .expect("should parse valid args");

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.form.department.as_deref(), Some("초등부 (1-3학년)"));
                assert_eq!(args.form.frequency.as_deref(), Some("4주 (1개월)"));
                assert_eq!(args.form.theme.as_deref(), Some("순종"));
                assert_eq!(args.form.attach, None);
            }
            _ => unreachable!("test uses generate subcommand"),
        }
    }

    #[test]
    fn generate_accepts_no_flags() {
        // Required-field validation happens at submission, not parse time.
        let cli = Cli::try_parse_from(["pulpit", "generate"]).expect("should parse");
        match cli.command {
            Commands::Generate(args) => assert_eq!(args.form.department, None),
            _ => unreachable!(),
        }
    }

    #[test]
    fn generate_parses_connection_flags() {
        let cli = Cli::try_parse_from([
            "pulpit",
            "generate",
            "--config",
            "pulpit.toml",
            "--model",
            "gemini-2.5-pro",
            "--api-url",
            "https://example.test",
            "--output",
            "plan.md",
            "--log-level",
            "debug",
        ])
        .expect("should parse all flags");

        match cli.command {
            Commands::Generate(args) => {
                assert_eq!(args.config, Some(PathBuf::from("pulpit.toml")));
                assert_eq!(args.model.as_deref(), Some("gemini-2.5-pro"));
                assert_eq!(args.api_url.as_deref(), Some("https://example.test"));
                assert_eq!(args.output, Some(PathBuf::from("plan.md")));
                assert_eq!(args.log_level.as_deref(), Some("debug"));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn prompt_subcommand_parses_with_attachment_flag() {
        let cli = Cli::try_parse_from([
            "pulpit",
            "prompt",
            "--department",
            "중등부",
            "--attach",
            "curriculum.pdf",
        ])
        .expect("should parse");

        match cli.command {
            Commands::Prompt(args) => {
                assert_eq!(args.form.attach, Some(PathBuf::from("curriculum.pdf")));
                assert_eq!(args.output, None);
            }
            _ => unreachable!("test uses prompt subcommand"),
        }
    }

    #[test]
    fn options_subcommand_parses() {
        let cli = Cli::try_parse_from(["pulpit", "options"]).expect("should parse");
        assert!(matches!(cli.command, Commands::Options));
    }

    #[test]
    fn no_subcommand_shows_error() {
        let result = Cli::try_parse_from(["pulpit"]);
        let err = result.expect_err("should fail without subcommand");
        assert_eq!(
            err.kind(),
            ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn unknown_subcommand_rejected() {
        let result = Cli::try_parse_from(["pulpit", "unknown"]);
        let err = result.expect_err("should reject unknown subcommand");
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn apply_to_sets_only_provided_fields() {
        let args = FormArgs {
            department: Some("청년부".into()),
            theme: Some("사랑".into()),
            ..FormArgs::default()
        };

        let mut session = FormSession::new();
        args.apply_to(&mut session).unwrap();
        assert_eq!(session.info().department, "청년부");
        assert_eq!(session.info().theme, "사랑");
        assert_eq!(session.info().frequency, "");
    }

    #[test]
    fn apply_to_rejects_non_pdf_attachment() {
        let args = FormArgs {
            attach: Some(PathBuf::from("notes.txt")),
            ..FormArgs::default()
        };

        let mut session = FormSession::new();
        let err = args.apply_to(&mut session).unwrap_err();
        assert!(matches!(err, PulpitError::UnsupportedFileType { .. }));
    }

    #[test]
    fn render_options_lists_all_groups() {
        let text = render_options();
        assert!(text.contains("--department:"));
        assert!(text.contains("--content-type:"));
        assert!(text.contains("--frequency:"));
        assert!(text.contains("초등부 (1-3학년)"));
        assert!(text.contains("강해 설교 (Expository)"));
        assert!(text.contains("52주 (1년)"));
    }
}
