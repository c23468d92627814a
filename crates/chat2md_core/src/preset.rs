/// An OpenAI-compatible provider offered by the setup wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderPreset {
    pub name: &'static str,
    pub api_base_url: &'static str,
    pub model: &'static str,
    pub description: &'static str,
}

impl ProviderPreset {
    /// The `custom` preset carries no endpoint; the user types one in.
    pub fn is_custom(&self) -> bool {
        self.api_base_url.is_empty()
    }
}

pub const PROVIDER_PRESETS: &[ProviderPreset] = &[
    ProviderPreset {
        name: "deepseek",
        api_base_url: "https://api.deepseek.com",
        model: "deepseek-chat",
        description: "DeepSeek (cost-effective, Chinese service)",
    },
    ProviderPreset {
        name: "openai",
        api_base_url: "https://api.openai.com/v1",
        model: "gpt-4o-mini",
        description: "OpenAI (GPT-4o-mini)",
    },
    ProviderPreset {
        name: "groq",
        api_base_url: "https://api.groq.com/openai/v1",
        model: "llama-3.3-70b-versatile",
        description: "Groq (fast inference)",
    },
    ProviderPreset {
        name: "custom",
        api_base_url: "",
        model: "",
        description: "Custom OpenAI-compatible API",
    },
];

pub fn preset(name: &str) -> Option<&'static ProviderPreset> {
    PROVIDER_PRESETS
        .iter()
        .find(|p| p.name.eq_ignore_ascii_case(name))
}
