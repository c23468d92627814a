use std::path::PathBuf;
use std::time::Duration;

use chat2md_core::LoadStrategy;
use chromiumoxide::cdp::browser_protocol::network::LoaderId;
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Browser, BrowserConfig, Page};
use engine_logging::{engine_debug, engine_info, engine_warn};
use futures_util::{FutureExt, StreamExt};
use tokio::time::Instant;

use crate::page::{NavigationPlan, PageRenderer};
use crate::{ConvertError, ErrorKind};

const LANDMARK_POLL: Duration = Duration::from_millis(250);
const NETWORK_IDLE_EVENT: &str = "networkIdle";
const NAVIGATION_INIT_EVENT: &str = "init";
const BODY_TEXT_JS: &str = "document.body ? document.body.innerText : ''";

/// Headless Chromium driven over the DevTools protocol.
///
/// A fresh browser process is launched per render and closed afterwards.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    executable: Option<PathBuf>,
}

impl ChromiumRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific Chrome/Chromium binary instead of auto-detection.
    pub fn with_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    fn browser_config(&self, plan: &NavigationPlan) -> Result<BrowserConfig, ConvertError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .request_timeout(plan.navigation_timeout)
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage");
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|err| ConvertError::not_found(format!("Invalid browser configuration: {err}")))
    }
}

#[async_trait::async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, plan: &NavigationPlan) -> Result<String, ConvertError> {
        let config = self.browser_config(plan)?;
        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|err| {
            ConvertError::not_found(format!(
                "Could not launch headless Chromium: {err}. Install Chrome or Chromium and try again."
            ))
        })?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let outcome = render_page(&browser, plan).await;

        if let Err(err) = browser.close().await {
            engine_warn!("browser close failed: {}", err);
        }
        if let Err(err) = browser.wait().await {
            engine_debug!("browser process wait failed: {}", err);
        }
        handler_task.abort();

        outcome
    }
}

async fn render_page(browser: &Browser, plan: &NavigationPlan) -> Result<String, ConvertError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|err| map_cdp_error(err, plan))?;

    tokio::time::timeout(plan.navigation_timeout, navigate(&page, plan))
        .await
        .map_err(|_| plan.load_timeout_error())??;
    engine_info!("navigation to {} reached {:?}", plan.url, plan.profile.load_strategy);

    wait_for_landmark(&page, plan).await;
    tokio::time::sleep(plan.profile.settle_delay).await;

    page.evaluate(BODY_TEXT_JS)
        .await
        .map_err(|err| map_cdp_error(err, plan))?
        .into_value::<String>()
        .map_err(|err| ConvertError::validation(format!("Page text was not a string: {err}")))
}

async fn navigate(page: &Page, plan: &NavigationPlan) -> Result<(), ConvertError> {
    match plan.profile.load_strategy {
        // `goto` resolves once the load event fired.
        LoadStrategy::Load => {
            page.goto(plan.url.as_str())
                .await
                .map_err(|err| map_cdp_error(err, plan))?;
        }
        LoadStrategy::NetworkIdle => {
            let mut lifecycle = page
                .event_listener::<EventLifecycleEvent>()
                .await
                .map_err(|err| map_cdp_error(err, plan))?;
            page.goto(plan.url.as_str())
                .await
                .map_err(|err| map_cdp_error(err, plan))?;

            // Events for about:blank may precede ours in the stream; only the
            // newest navigation's loader counts.
            let mut loader: Option<LoaderId> = None;
            let mut idle_loaders: Vec<LoaderId> = Vec::new();
            while let Some(Some(event)) = lifecycle.next().now_or_never() {
                let (name, id) = (event.name.as_str(), &event.loader_id);
                record_lifecycle(name, id, &mut loader, &mut idle_loaders);
            }
            if is_idle(&loader, &idle_loaders) {
                return Ok(());
            }
            while let Some(event) = lifecycle.next().await {
                let (name, id) = (event.name.as_str(), &event.loader_id);
                record_lifecycle(name, id, &mut loader, &mut idle_loaders);
                if is_idle(&loader, &idle_loaders) {
                    return Ok(());
                }
            }
        }
    }
    Ok(())
}

fn record_lifecycle(
    name: &str,
    loader_id: &LoaderId,
    loader: &mut Option<LoaderId>,
    idle_loaders: &mut Vec<LoaderId>,
) {
    match name {
        NAVIGATION_INIT_EVENT => *loader = Some(loader_id.clone()),
        NETWORK_IDLE_EVENT => idle_loaders.push(loader_id.clone()),
        _ => {}
    }
}

fn is_idle(loader: &Option<LoaderId>, idle_loaders: &[LoaderId]) -> bool {
    match loader {
        Some(current) => idle_loaders.contains(current),
        None => !idle_loaders.is_empty(),
    }
}

/// Best effort: a page without the landmark is still extracted.
async fn wait_for_landmark(page: &Page, plan: &NavigationPlan) {
    let deadline = Instant::now() + plan.landmark_timeout;
    loop {
        if page.find_element(plan.landmark_selector.as_str()).await.is_ok() {
            engine_debug!("landmark '{}' present", plan.landmark_selector);
            return;
        }
        if Instant::now() >= deadline {
            engine_debug!(
                "landmark '{}' not found within {}ms, continuing",
                plan.landmark_selector,
                plan.landmark_timeout.as_millis()
            );
            return;
        }
        tokio::time::sleep(LANDMARK_POLL).await;
    }
}

fn map_cdp_error(err: CdpError, plan: &NavigationPlan) -> ConvertError {
    match err {
        CdpError::Timeout => plan.load_timeout_error(),
        other => ConvertError::new(
            ErrorKind::Network,
            format!("Failed to load {}: {other}", plan.url),
        ),
    }
}
