use chat2md_core::Language;
use chrono::NaiveDate;

pub const FRONT_MATTER_DELIMITER: &str = "---";

pub fn has_front_matter(markdown: &str) -> bool {
    markdown.starts_with(FRONT_MATTER_DELIMITER)
}

/// Return the model's markdown untouched when it already opens with front
/// matter, otherwise prepend a localized block with empty tags, the date and
/// the source.
pub fn ensure_front_matter(
    markdown: String,
    language: Language,
    source: Option<&str>,
    date: NaiveDate,
) -> String {
    if has_front_matter(&markdown) {
        return markdown;
    }

    let (tags, date_key, source_key) = match language {
        Language::Zh => ("技术标签", "日期", "来源"),
        Language::En => ("tags", "date", "source"),
    };
    let source = source.filter(|s| !s.is_empty()).unwrap_or("Unknown");
    let frontmatter = format!(
        "---\n{tags}: []\n{date_key}: {date}\n{source_key}: {source}\n---\n\n",
        date = date.format("%Y-%m-%d"),
    );
    format!("{frontmatter}{markdown}")
}
