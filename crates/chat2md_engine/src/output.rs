use std::ffi::OsString;
use std::path::{Path, PathBuf};

use chat2md_core::{Config, InputSource};
use chrono::NaiveDate;
use engine_logging::engine_debug;

use crate::filename::{dated_filename, MARKDOWN_EXTENSION};
use crate::persist::ensure_output_dir;
use crate::ConvertError;

/// Pick the file the converted document is written to.
///
/// - an explicit override wins (home shorthand expanded, `.md` added when it has no extension)
/// - URL inputs go to `config.output_dir` as `{date}-{slug}.md`
/// - archive inputs land next to the archive with a `.md` extension
///
/// In every case an existing file is never reused; see [`next_free_path`].
pub fn resolve_output_path(
    input: &InputSource,
    markdown: &str,
    config: &Config,
    custom_output: Option<&str>,
    today: NaiveDate,
) -> Result<PathBuf, ConvertError> {
    let candidate = match (custom_output, input) {
        (Some(custom), _) => {
            let path = expand_home(custom);
            if path.extension().map_or(true, |ext| ext.is_empty()) {
                path.with_extension(MARKDOWN_EXTENSION)
            } else {
                path
            }
        }
        (None, InputSource::Url(_)) => {
            let dir = expand_home(&config.output_dir);
            ensure_output_dir(&dir)?;
            dir.join(dated_filename(markdown, today))
        }
        (None, InputSource::Archive(path)) => {
            archive_location(path).with_extension(MARKDOWN_EXTENSION)
        }
    };

    let resolved = next_free_path(&candidate);
    if resolved != candidate {
        engine_debug!("{:?} exists, using {:?}", candidate, resolved);
    }
    Ok(resolved)
}

/// `path` itself if nothing is there, otherwise the first of `stem-1.ext`,
/// `stem-2.ext`, ... that does not exist yet.
///
/// Check-then-write is not atomic: two runs racing on one directory can pick the same name.
pub fn next_free_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let parent = path.parent().unwrap_or_else(|| Path::new(""));
    let stem = path.file_stem().unwrap_or_default();
    let extension = path.extension();

    let mut counter: u32 = 1;
    loop {
        let mut name = OsString::from(stem);
        name.push(format!("-{counter}"));
        if let Some(ext) = extension {
            name.push(".");
            name.push(ext);
        }
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Where an archive input is read from; also the base of its output path.
pub fn archive_location(path: &Path) -> PathBuf {
    path.to_str()
        .map(expand_home)
        .unwrap_or_else(|| path.to_path_buf())
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(raw: &str) -> PathBuf {
    let rest = if raw == "~" {
        Some("")
    } else {
        raw.strip_prefix("~/")
            .or_else(|| raw.strip_prefix("~\\"))
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(raw),
    }
}
