mod progress;
mod setup;

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chat2md_core::{ConfigOverrides, InputSource, Language};
use chat2md_engine::{
    default_config_path, load_config, ChromiumRenderer, ConversionRequest, ConvertError,
    Pipeline, Structurizer, StructurizerSettings,
};
use clap::{CommandFactory, Parser};
use engine_logging::{engine_debug, engine_info};

use crate::progress::SpinnerSink;

/// Environment variable naming a Chrome/Chromium binary to use instead of auto-detection.
const CHROME_ENV: &str = "AICHAT2MD_CHROME";

const EXAMPLES: &str = "\
Examples:
  aichat2md --setup
  aichat2md https://chatgpt.com/share/xxx
  aichat2md ~/Downloads/chat.webarchive
  aichat2md <url> --lang zh
  aichat2md <url> -o ~/Documents/output.md
  aichat2md <url> --model gpt-4o";

/// Convert AI chat conversations to structured Markdown.
#[derive(Parser, Debug)]
#[command(name = "aichat2md", version, about, long_about = None, after_help = EXAMPLES)]
struct Cli {
    /// AI chat share URL or .webarchive file path.
    #[arg(value_name = "INPUT")]
    input: Option<String>,

    /// Initialize configuration (API key, provider, language, output directory).
    #[arg(long)]
    setup: bool,

    /// Override prompt language [en, zh].
    #[arg(long, value_name = "LANG")]
    lang: Option<Language>,

    /// Custom output file path.
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Override AI model.
    #[arg(long, value_name = "NAME")]
    model: Option<String>,

    /// Path to the settings file.
    /// Defaults to ~/.config/aichat2md/config.json
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log each pipeline stage to stderr.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    engine_logging::initialize_cli(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = match cli.config.clone() {
        Some(path) => path,
        None => default_config_path()
            .ok_or_else(|| anyhow!("could not determine the home directory"))?,
    };

    if cli.setup {
        let stdin = io::stdin();
        setup::run_setup(&mut stdin.lock(), &mut io::stdout(), &config_path)?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(raw_input) = cli.input.as_deref() else {
        Cli::command().print_help()?;
        eprintln!("\n✗ Error: Please provide a URL or file path");
        return Ok(ExitCode::FAILURE);
    };

    let overrides = ConfigOverrides {
        language: cli.lang,
        model: cli.model.clone(),
    };
    let config = load_config(&config_path)?.with_overrides(&overrides);
    engine_debug!(
        "config loaded from {:?}: base_url={} model={} language={}",
        config_path,
        config.api_base_url,
        config.model,
        config.language
    );

    let request = ConversionRequest {
        input: InputSource::classify(raw_input),
        config,
        output_override: cli.output.clone(),
    };

    let mut renderer = ChromiumRenderer::new();
    if let Some(chrome) = std::env::var_os(CHROME_ENV) {
        renderer = renderer.with_executable(chrome);
    }
    let pipeline = Pipeline::new(
        Arc::new(renderer),
        Structurizer::new(StructurizerSettings::default())?,
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let sink = SpinnerSink::new(cli.verbose);
    let report = runtime.block_on(pipeline.run(&request, &sink))?;
    drop(sink);

    engine_info!(
        "converted {} ({} chars) into {} bytes",
        report.source,
        report.extracted_chars,
        report.written_bytes
    );
    println!("✓ Saved to: {}", report.output_path.display());
    Ok(ExitCode::SUCCESS)
}

/// Categorized errors print one line; anything else prints its whole chain.
fn report(err: &anyhow::Error) {
    match err.downcast_ref::<ConvertError>() {
        Some(convert) => eprintln!("✗ {}: {}", convert.kind.category(), convert.message),
        None => eprintln!("✗ Unexpected error: {err:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_parse_into_overrides() {
        let cli = Cli::try_parse_from([
            "aichat2md",
            "https://chatgpt.com/share/x",
            "--lang",
            "zh",
            "-o",
            "~/out.md",
            "--model",
            "gpt-4o",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.input.as_deref(), Some("https://chatgpt.com/share/x"));
        assert_eq!(cli.lang, Some(Language::Zh));
        assert_eq!(cli.output.as_deref(), Some("~/out.md"));
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
        assert!(cli.verbose);
        assert!(!cli.setup);
    }

    #[test]
    fn unknown_language_is_rejected() {
        assert!(Cli::try_parse_from(["aichat2md", "x", "--lang", "fr"]).is_err());
    }

    #[test]
    fn setup_needs_no_input() {
        let cli = Cli::try_parse_from(["aichat2md", "--setup"]).unwrap();
        assert!(cli.setup);
        assert!(cli.input.is_none());
    }
}
