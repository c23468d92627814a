//! aichat2md engine: extraction, structurizing and output IO.
mod archive;
mod browser;
mod decode;
mod extract;
mod filename;
mod frontmatter;
mod output;
mod page;
mod persist;
mod pipeline;
mod prompt;
mod settings;
mod structurize;
mod types;

pub use archive::{extract_from_webarchive, read_main_resource, ARCHIVE_EXTENSION};
pub use browser::ChromiumRenderer;
pub use decode::{decode_html, DecodedHtml};
pub use extract::{Extractor, VisibleTextExtractor};
pub use filename::{
    dated_filename, sanitize_title, title_from_markdown, MARKDOWN_EXTENSION, MAX_SLUG_CHARS,
    UNTITLED,
};
pub use frontmatter::{ensure_front_matter, has_front_matter, FRONT_MATTER_DELIMITER};
pub use output::{archive_location, expand_home, next_free_path, resolve_output_path};
pub use page::{extract_from_url, NavigationPlan, PageRenderer, PageSettings};
pub use persist::{ensure_output_dir, write_atomic, PersistError};
pub use pipeline::{Clock, ConversionRequest, Pipeline};
pub use prompt::{build_instructions, system_prompt};
pub use settings::{
    default_config_path, load_config, parse_config, save_config, CONFIG_DIR_NAME,
    CONFIG_FILE_NAME,
};
pub use structurize::{
    chat_completions_endpoint, Structurizer, StructurizerSettings, API_VERSION_SEGMENT,
};
pub use types::{
    ConversionReport, ConvertError, ErrorKind, ExtractionResult, NoopProgressSink, PipelineEvent,
    ProgressSink,
};
