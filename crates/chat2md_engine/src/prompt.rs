use chat2md_core::Language;

use crate::ConvertError;

const TEMPLATES: &[(&str, &str)] = &[
    ("en", include_str!("../prompts/system_prompt_en.txt")),
    ("zh", include_str!("../prompts/system_prompt_zh.txt")),
];

/// Instruction template for a language code.
pub fn system_prompt(code: &str) -> Result<&'static str, ConvertError> {
    TEMPLATES
        .iter()
        .find(|(lang, _)| *lang == code)
        .map(|(_, template)| *template)
        .ok_or_else(|| ConvertError::not_found(format!("Prompt template not found for language '{code}'")))
}

/// Template plus, when known, one localized line naming the original source.
pub fn build_instructions(language: Language, source: Option<&str>) -> Result<String, ConvertError> {
    let mut instructions = system_prompt(language.code())?.to_string();
    if let Some(source) = source.filter(|s| !s.is_empty()) {
        let label = match language {
            Language::Zh => "原始来源",
            Language::En => "Original source",
        };
        instructions.push_str(&format!("\n\n{label}: {source}"));
    }
    Ok(instructions)
}
