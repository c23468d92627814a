use std::sync::Arc;

use chat2md_core::{Config, InputSource};
use chrono::{Local, NaiveDate};
use engine_logging::{engine_debug, engine_info};

use crate::archive::extract_from_webarchive;
use crate::output::{archive_location, resolve_output_path};
use crate::page::{extract_from_url, PageRenderer, PageSettings};
use crate::persist::write_atomic;
use crate::structurize::{chat_completions_endpoint, Structurizer};
use crate::{ConversionReport, ConvertError, ExtractionResult, PipelineEvent, ProgressSink};

pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// One conversion: what to read, with which settings, and where to write.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub input: InputSource,
    pub config: Config,
    pub output_override: Option<String>,
}

/// extract -> structurize -> resolve output path -> write.
///
/// Stages run strictly in order and the first failure ends the run; nothing
/// is written unless structurizing succeeded.
pub struct Pipeline {
    renderer: Arc<dyn PageRenderer>,
    structurizer: Structurizer,
    page_settings: PageSettings,
    today: Clock,
}

impl Pipeline {
    pub fn new(renderer: Arc<dyn PageRenderer>, structurizer: Structurizer) -> Self {
        Self {
            renderer,
            structurizer,
            page_settings: PageSettings::default(),
            today: Arc::new(|| Local::now().date_naive()),
        }
    }

    pub fn with_page_settings(mut self, settings: PageSettings) -> Self {
        self.page_settings = settings;
        self
    }

    pub fn with_clock(mut self, today: Clock) -> Self {
        self.today = today;
        self
    }

    pub async fn extract(&self, input: &InputSource) -> Result<ExtractionResult, ConvertError> {
        let text = match input {
            InputSource::Url(url) => {
                extract_from_url(self.renderer.as_ref(), url, &self.page_settings).await?
            }
            InputSource::Archive(path) => extract_from_webarchive(&archive_location(path))?,
        };
        Ok(ExtractionResult {
            text,
            source: input.source_label(),
        })
    }

    pub async fn run(
        &self,
        request: &ConversionRequest,
        sink: &dyn ProgressSink,
    ) -> Result<ConversionReport, ConvertError> {
        sink.emit(PipelineEvent::Extracting {
            source: request.input.source_label(),
            from_url: request.input.is_url(),
        });
        let extraction = self.extract(&request.input).await?;
        let extracted_chars = extraction.text.chars().count();
        engine_info!("extracted {} chars from {}", extracted_chars, extraction.source);
        sink.emit(PipelineEvent::Extracted {
            chars: extracted_chars,
        });

        let today = (self.today)();
        sink.emit(PipelineEvent::Structurizing {
            chars: extracted_chars,
            endpoint: chat_completions_endpoint(&request.config.api_base_url),
        });
        let markdown = self
            .structurizer
            .structurize_on(
                &extraction.text,
                &request.config,
                Some(extraction.source.as_str()),
                today,
            )
            .await?;
        sink.emit(PipelineEvent::Structurized {
            bytes: markdown.len(),
        });

        let target = resolve_output_path(
            &request.input,
            &markdown,
            &request.config,
            request.output_override.as_deref(),
            today,
        )?;
        sink.emit(PipelineEvent::Writing {
            path: target.clone(),
        });

        let written = write_atomic(&target, &markdown)?;
        engine_debug!("wrote {} bytes to {:?}", markdown.len(), written);

        Ok(ConversionReport {
            output_path: written,
            source: extraction.source,
            extracted_chars,
            written_bytes: markdown.len() as u64,
        })
    }
}
