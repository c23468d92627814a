use std::time::Duration;

/// Share-page hosts that need a non-default browser wait policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Doubao,
    Gemini,
    Default,
}

/// Load state the browser must reach before the page is considered navigated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStrategy {
    /// Wait for the window `load` event.
    Load,
    /// Wait until the network has been quiet.
    NetworkIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformProfile {
    pub platform: Platform,
    pub load_strategy: LoadStrategy,
    pub settle_delay: Duration,
}

/// Substrings checked in order against the lowercased URL.
const DETECTION_RULES: &[(Platform, &[&str])] = &[
    (Platform::Doubao, &["doubao.com"]),
    (Platform::Gemini, &["gemini.google.com", "g.co"]),
];

// Doubao and Gemini keep background requests open, so an idle wait would never settle.
const PROFILES: &[PlatformProfile] = &[
    PlatformProfile {
        platform: Platform::Doubao,
        load_strategy: LoadStrategy::Load,
        settle_delay: Duration::from_millis(3000),
    },
    PlatformProfile {
        platform: Platform::Gemini,
        load_strategy: LoadStrategy::Load,
        settle_delay: Duration::from_millis(5000),
    },
    PlatformProfile {
        platform: Platform::Default,
        load_strategy: LoadStrategy::NetworkIdle,
        settle_delay: Duration::from_millis(2000),
    },
];

impl Platform {
    pub fn detect(url: &str) -> Self {
        let lowered = url.to_ascii_lowercase();
        DETECTION_RULES
            .iter()
            .find(|(_, needles)| needles.iter().any(|needle| lowered.contains(needle)))
            .map(|(platform, _)| *platform)
            .unwrap_or(Platform::Default)
    }

    pub fn profile(self) -> PlatformProfile {
        PROFILES
            .iter()
            .copied()
            .find(|profile| profile.platform == self)
            .unwrap_or(PlatformProfile {
                platform: self,
                load_strategy: LoadStrategy::NetworkIdle,
                settle_delay: Duration::from_millis(2000),
            })
    }

    pub fn name(self) -> &'static str {
        match self {
            Platform::Doubao => "doubao",
            Platform::Gemini => "gemini",
            Platform::Default => "default",
        }
    }
}
