use chrono::NaiveDate;

pub const MARKDOWN_EXTENSION: &str = "md";
pub const MAX_SLUG_CHARS: usize = 50;
pub const UNTITLED: &str = "untitled";

/// `{YYYY-MM-DD}-{slug}.md`, slug taken from the first level-1 heading.
pub fn dated_filename(markdown: &str, date: NaiveDate) -> String {
    let title = title_from_markdown(markdown).unwrap_or(UNTITLED);
    let slug = sanitize_title(title, MAX_SLUG_CHARS);
    format!("{}-{slug}.{MARKDOWN_EXTENSION}", date.format("%Y-%m-%d"))
}

/// Text of the first line that reads `# ...` once surrounding whitespace is removed.
pub fn title_from_markdown(markdown: &str) -> Option<&str> {
    markdown
        .lines()
        .map(str::trim)
        .find_map(|line| line.strip_prefix("# "))
        .map(str::trim)
}

/// Replace forbidden characters with `-`, cut to `max_chars` characters, then
/// strip dots and spaces from both ends.
pub fn sanitize_title(title: &str, max_chars: usize) -> String {
    let replaced: String = title
        .chars()
        .map(|c| if is_forbidden(c) { '-' } else { c })
        .take(max_chars)
        .collect();
    replaced.trim_matches(&['.', ' '][..]).to_string()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
