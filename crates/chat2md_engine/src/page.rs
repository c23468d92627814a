use std::time::Duration;

use chat2md_core::{Platform, PlatformProfile};
use engine_logging::{engine_debug, engine_info};
use url::Url;

use crate::ConvertError;

#[derive(Debug, Clone)]
pub struct PageSettings {
    /// Upper bound for reaching the platform's load state.
    pub navigation_timeout: Duration,
    /// Element whose presence signals the conversation has rendered.
    pub landmark_selector: String,
    /// How long to look for the landmark before carrying on without it.
    pub landmark_timeout: Duration,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            navigation_timeout: Duration::from_millis(60_000),
            landmark_selector: "main".to_string(),
            landmark_timeout: Duration::from_millis(10_000),
        }
    }
}

/// Everything a renderer needs to load one share page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationPlan {
    pub url: String,
    pub profile: PlatformProfile,
    pub navigation_timeout: Duration,
    pub landmark_selector: String,
    pub landmark_timeout: Duration,
}

impl NavigationPlan {
    pub fn new(url: &str, settings: &PageSettings) -> Self {
        Self {
            url: url.to_string(),
            profile: Platform::detect(url).profile(),
            navigation_timeout: settings.navigation_timeout,
            landmark_selector: settings.landmark_selector.clone(),
            landmark_timeout: settings.landmark_timeout,
        }
    }

    pub fn load_timeout_error(&self) -> ConvertError {
        ConvertError::new(
            crate::ErrorKind::Timeout,
            format!(
                "Failed to load page within {}ms. Check your network connection and URL validity.",
                self.navigation_timeout.as_millis()
            ),
        )
    }
}

/// Loads a page in a browser and returns the rendered text of its body.
///
/// Implementations own their browser session for the duration of one call
/// and must release it before returning, on success and on error.
#[async_trait::async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, plan: &NavigationPlan) -> Result<String, ConvertError>;
}

/// Validate the URL, pick the platform wait policy and return the page's
/// visible text, trimmed.
pub async fn extract_from_url(
    renderer: &dyn PageRenderer,
    url: &str,
    settings: &PageSettings,
) -> Result<String, ConvertError> {
    let parsed = Url::parse(url)
        .map_err(|err| ConvertError::validation(format!("Invalid URL: {url} ({err})")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConvertError::validation(format!("Invalid URL: {url}")));
    }

    let plan = NavigationPlan::new(url, settings);
    engine_info!(
        "rendering {} platform={} strategy={:?} settle={}ms",
        url,
        plan.profile.platform.name(),
        plan.profile.load_strategy,
        plan.profile.settle_delay.as_millis()
    );

    let text = renderer.render(&plan).await?;
    let trimmed = text.trim();
    engine_debug!("rendered page text: {} chars", trimmed.chars().count());
    Ok(trimmed.to_string())
}
