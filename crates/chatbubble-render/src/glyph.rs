//! Glyph token resolution.
//!
//! Tile sets name their glyphs with short tokens (`img_bubble_mid`, `bubbles:mid`, ...). A
//! token is normalized into a `%img_...%` placeholder and handed to a [`GlyphResolver`]; anything
//! that does not resolve renders as an empty segment.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"%[A-Za-z0-9_.:\-]+%").expect("valid regex"))
}

pub trait GlyphResolver {
    /// Resolves a normalized placeholder (e.g. `%img_bubble_mid%`) to the string that renders
    /// the glyph. Returning the placeholder unchanged counts as "unresolved".
    fn resolve(&self, placeholder: &str) -> Option<String>;
}

impl<F> GlyphResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, placeholder: &str) -> Option<String> {
        self(placeholder)
    }
}

/// Resolver that knows no glyphs; every token renders empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGlyphs;

impl GlyphResolver for NoGlyphs {
    fn resolve(&self, _placeholder: &str) -> Option<String> {
        None
    }
}

/// Static name → glyph table. Names are stored without `%` delimiters (`img_admin`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlyphTable {
    glyphs: IndexMap<String, String>,
}

impl GlyphTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(glyphs: IndexMap<String, String>) -> Self {
        Self { glyphs }
    }

    pub fn insert(&mut self, name: impl Into<String>, glyph: impl Into<String>) {
        let name = name.into();
        self.glyphs
            .insert(name.trim_matches('%').to_string(), glyph.into());
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

impl GlyphResolver for GlyphTable {
    fn resolve(&self, placeholder: &str) -> Option<String> {
        self.glyphs.get(placeholder.trim_matches('%')).cloned()
    }
}

/// Normalizes a tile token into a `%img_...%` placeholder.
///
/// - `%...` is taken as is
/// - `img_x` becomes `%img_x%`
/// - `ns:id` becomes `%img_ns_id%`
/// - anything else becomes `%img_<token>%`
///
/// Returns `None` for an empty token.
pub fn placeholder_for(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }
    let holder = if token.starts_with('%') {
        token.to_string()
    } else if token.starts_with("img_") {
        format!("%{token}%")
    } else if token.contains(':') {
        format!("%img_{}%", token.replace(':', "_"))
    } else {
        format!("%img_{token}%")
    };
    Some(holder)
}

/// Resolves an optional tile token, degrading to `""` on any failure.
pub fn resolve_token(resolver: &dyn GlyphResolver, token: Option<&str>) -> String {
    let Some(holder) = token.and_then(placeholder_for) else {
        return String::new();
    };
    match resolver.resolve(&holder) {
        Some(glyph) if glyph != holder => glyph,
        _ => {
            tracing::debug!(placeholder = %holder, "glyph token did not resolve; rendering empty");
            String::new()
        }
    }
}

/// Replaces every `%name%` placeholder in `text` that `resolver` knows.
///
/// Unknown placeholders stay in the text as written.
pub fn expand_placeholders(text: &str, resolver: &dyn GlyphResolver) -> String {
    placeholder_re()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let holder = &caps[0];
            match resolver.resolve(holder) {
                Some(value) => value,
                None => holder.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_normalize_into_placeholders() {
        assert_eq!(placeholder_for(""), None);
        assert_eq!(placeholder_for("%custom%").as_deref(), Some("%custom%"));
        assert_eq!(placeholder_for("img_mid").as_deref(), Some("%img_mid%"));
        assert_eq!(
            placeholder_for("bubbles:mid").as_deref(),
            Some("%img_bubbles_mid%")
        );
        assert_eq!(placeholder_for("mid").as_deref(), Some("%img_mid%"));
    }

    #[test]
    fn table_resolves_with_or_without_delimiters() {
        let mut table = GlyphTable::new();
        table.insert("img_mid", "M");
        table.insert("%img_tail%", "T");
        assert_eq!(resolve_token(&table, Some("mid")), "M");
        assert_eq!(resolve_token(&table, Some("img_tail")), "T");
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn failures_render_empty() {
        let table = GlyphTable::new();
        assert_eq!(resolve_token(&table, Some("mid")), "");
        assert_eq!(resolve_token(&table, None), "");
        assert_eq!(resolve_token(&NoGlyphs, Some("mid")), "");
        // An echo of the placeholder means the resolver did not know it.
        let echo = |p: &str| Some(p.to_string());
        assert_eq!(resolve_token(&echo, Some("mid")), "");
    }

    #[test]
    fn text_placeholders_expand_and_unknown_ones_survive() {
        let mut table = GlyphTable::new();
        table.insert("img_wave", "\u{E010}");
        table.insert("player_name", "Steve");
        assert_eq!(
            expand_placeholders("<white>hi %img_wave% from %player_name% 100%</white>", &table),
            "<white>hi \u{E010} from Steve 100%</white>"
        );
        assert_eq!(expand_placeholders("%img_nope% stays", &table), "%img_nope% stays");
    }
}
