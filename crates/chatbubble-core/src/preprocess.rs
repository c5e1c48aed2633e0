use regex::Regex;
use std::sync::OnceLock;

fn emoji_shortcode_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r":([A-Za-z0-9_]+):").expect("valid regex"))
}

fn format_code_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"§[0-9A-FK-ORa-fk-or]").expect("valid regex"))
}

/// Rewrites `:name:` shortcodes into `%img_name%` glyph placeholders.
pub fn expand_emoji_shortcodes(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }
    emoji_shortcode_regex()
        .replace_all(input, "%img_$1%")
        .into_owned()
}

/// Removes legacy `§x` color/format codes.
pub fn strip_format_codes(input: &str) -> String {
    format_code_regex().replace_all(input, "").into_owned()
}

/// Text as it is measured, wrapped and displayed: shortcodes expanded, format codes stripped.
pub fn clean_message(raw: &str) -> String {
    strip_format_codes(&expand_emoji_shortcodes(raw))
}
