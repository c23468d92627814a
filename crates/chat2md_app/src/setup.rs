//! Interactive first-run configuration.

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chat2md_core::{preset, Config, Language, ProviderPreset, PROVIDER_PRESETS};
use chat2md_engine::save_config;
use engine_logging::engine_info;

/// Ask for provider, key, language and output directory, then save.
pub fn run_setup<R: BufRead, W: Write>(input: &mut R, out: &mut W, path: &Path) -> Result<Config> {
    writeln!(out, "=== aichat2md Configuration Setup ===\n")?;
    let config = ask_config(input, out)?;
    save_config(path, &config)
        .with_context(|| format!("saving configuration to {}", path.display()))?;
    writeln!(out, "\n✓ Configuration saved to {}", path.display())?;
    engine_info!("setup complete: base_url={} model={}", config.api_base_url, config.model);
    Ok(config)
}

pub(crate) fn ask_config<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Config> {
    let preset = ask_provider(input, out)?;

    let api_key = prompt(
        input,
        out,
        &format!("\nEnter your {} API key: ", preset.name.to_uppercase()),
    )?;

    let (api_base_url, model) = if preset.is_custom() {
        let base = prompt(input, out, "Enter API base URL (e.g., http://localhost:8000): ")?;
        let model = prompt(input, out, "Enter model name: ")?;
        (base, model)
    } else {
        writeln!(out, "Using: {}", preset.api_base_url)?;
        writeln!(out, "Model: {}", preset.model)?;
        (preset.api_base_url.to_string(), preset.model.to_string())
    };

    writeln!(out, "\nSelect language for AI prompts:")?;
    writeln!(out, "1. English")?;
    writeln!(out, "2. 中文 (Chinese)")?;
    let language = match prompt(input, out, "Choice (1-2) [1]: ")?.as_str() {
        "2" => Language::Zh,
        _ => Language::En,
    };

    let defaults = Config::default();
    let output_dir = prompt(
        input,
        out,
        &format!("\nOutput directory (default: {}): ", defaults.output_dir),
    )?;

    Ok(Config {
        api_key,
        api_base_url,
        model,
        language,
        output_dir: if output_dir.is_empty() {
            defaults.output_dir.clone()
        } else {
            output_dir
        },
        ..defaults
    })
}

fn ask_provider<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
) -> Result<&'static ProviderPreset> {
    writeln!(out, "Select API provider:")?;
    for (index, preset) in PROVIDER_PRESETS.iter().enumerate() {
        writeln!(out, "{}. {}", index + 1, preset.description)?;
    }

    let question = format!("\nChoice (1-{}) [1]: ", PROVIDER_PRESETS.len());
    loop {
        let answer = prompt(input, out, &question)?;
        if answer.is_empty() {
            return Ok(&PROVIDER_PRESETS[0]);
        }
        // A menu number or a provider name.
        let picked = match answer.parse::<usize>() {
            Ok(n) => n.checked_sub(1).and_then(|index| PROVIDER_PRESETS.get(index)),
            Err(_) => preset(&answer),
        };
        match picked {
            Some(preset) => return Ok(preset),
            None => writeln!(out, "Invalid choice, please try again")?,
        }
    }
}

/// Print `question`, read one line and return it trimmed. End of input aborts.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, question: &str) -> Result<String> {
    write!(out, "{question}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("setup aborted: input closed");
    }
    Ok(line.trim().to_string())
}
