//! aichat2md core: configuration model, provider presets and input/platform
//! classification. Pure data, no IO.
mod config;
mod input;
mod platform;
mod preset;

pub use config::{Config, ConfigOverrides, Language, UnknownLanguage};
pub use input::InputSource;
pub use platform::{LoadStrategy, Platform, PlatformProfile};
pub use preset::{preset, ProviderPreset, PROVIDER_PRESETS};
