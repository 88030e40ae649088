use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use pulpit::cli::{Cli, Commands, render_options};
use pulpit::config::PulpitConfig;
use pulpit::gemini::GenerationClient;
use pulpit::logging;
use pulpit::session::FormSession;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate(args) => {
            let config = PulpitConfig::load(args.config.as_deref(), &args)?;

            logging::init(config.log_level.as_deref(), config.log_file.as_deref())?;

            config.validate()?;

            info!(
                api_url = %config.api_url,
                model = %config.model,
                has_credential = config.api_key.is_some(),
                "config loaded"
            );

            let mut session = FormSession::new();
            args.form.apply_to(&mut session)?;

            let mut client = GenerationClient::new(&config)?;
            let plan = session.submit(&mut client)?;

            info!(plan_len = plan.len(), "plan generated");
            write_output(args.output.as_deref(), &plan)
        }
        Commands::Prompt(args) => {
            logging::init(None, None)?;

            let mut session = FormSession::new();
            args.form.apply_to(&mut session)?;

            let prompt = session.prompt().to_owned();
            write_output(args.output.as_deref(), &prompt)
        }
        Commands::Options => {
            println!("{}", render_options());
            Ok(())
        }
    }
}

fn write_output(path: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .map_err(|e| anyhow::anyhow!("failed to write {}: {e}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{content}"),
    }
    Ok(())
}
