//! Typed view over [`BubbleConfig`].
//!
//! Every key has a default; values of the wrong type are logged and replaced by that default so a
//! half-broken config still produces bubbles.

use crate::config::{BubbleConfig, value_kind};
use crate::markup::DEFAULT_TEXT_TEMPLATE;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub const DEFAULT_INNER_PX: u32 = 140;
pub const DEFAULT_MAX_LINES: usize = 3;
pub const DEFAULT_ELLIPSIS: &str = "...";
pub const DEFAULT_FONT_PX: u32 = 6;
pub const DEFAULT_LIFETIME_TICKS: u32 = 80;
pub const MIN_WIDTH_MULTIPLIER: f64 = 0.5;

/// Tile definition for one frame-height bucket (`bubble.sets.<h>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameHeightSpec {
    pub left: Option<String>,
    pub mid: Option<String>,
    pub right: Option<String>,
    pub tail: Option<String>,
    pub left_px: u32,
    pub mid_px: u32,
    pub right_px: u32,
    pub tail_px: u32,
    pub padding_px: u32,
}

impl Default for FrameHeightSpec {
    fn default() -> Self {
        Self {
            left: None,
            mid: None,
            right: None,
            tail: None,
            left_px: 3,
            mid_px: 5,
            right_px: 3,
            tail_px: 7,
            padding_px: 12,
        }
    }
}

impl FrameHeightSpec {
    fn from_section(prefix: &str, section: &Map<String, Value>) -> Self {
        let d = Self::default();
        let token = |name: &str| -> Option<String> {
            match section.get(name) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => {
                    tracing::warn!(
                        key = %format!("{prefix}.{name}"),
                        found = value_kind(other),
                        "glyph token must be a string; ignoring"
                    );
                    None
                }
            }
        };
        let px = |name: &str, default: u32| -> u32 {
            px_value(&format!("{prefix}.{name}"), section.get(name), default)
        };
        Self {
            left: token("left"),
            mid: token("mid"),
            right: token("right"),
            tail: token("tail"),
            left_px: px("left_px", d.left_px),
            mid_px: px("mid_px", d.mid_px),
            right_px: px("right_px", d.right_px),
            tail_px: px("tail_px", d.tail_px),
            padding_px: px("padding_px", d.padding_px),
        }
    }
}

/// Values forwarded to the display collaborator without interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayHints {
    pub y_offset: f64,
    pub view_range: f64,
    pub show_shadow: bool,
}

impl Default for DisplayHints {
    fn default() -> Self {
        Self {
            y_offset: 0.55,
            view_range: 36.0,
            show_shadow: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSettings {
    pub enabled: bool,
    pub inner_px: u32,
    pub auto_wrap: bool,
    pub max_lines: usize,
    pub ellipsis: String,
    pub font_px: u32,
    pub max_height: Option<u32>,
    pub inner_px_per_height: BTreeMap<u32, u32>,
    pub width_mul: f64,
    pub width_mul_per_height: BTreeMap<u32, f64>,
    pub tail_trim_per_side: u32,
    pub sets: BTreeMap<u32, FrameHeightSpec>,
    pub lifetime_ticks: u32,
    pub text_template: String,
    /// Resolve `%...%` placeholders in the templated text lines (`bubble.use-papi-for-text`).
    pub placeholders_in_text: bool,
    pub display: DisplayHints,
    /// Static glyph table (`bubble.glyphs.<name>`), keyed without `%` delimiters.
    pub glyphs: IndexMap<String, String>,
}

impl Default for BubbleSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            inner_px: DEFAULT_INNER_PX,
            auto_wrap: true,
            max_lines: DEFAULT_MAX_LINES,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            font_px: DEFAULT_FONT_PX,
            max_height: None,
            inner_px_per_height: BTreeMap::new(),
            width_mul: 1.0,
            width_mul_per_height: BTreeMap::new(),
            tail_trim_per_side: 0,
            sets: BTreeMap::new(),
            lifetime_ticks: DEFAULT_LIFETIME_TICKS,
            text_template: DEFAULT_TEXT_TEMPLATE.to_string(),
            placeholders_in_text: false,
            display: DisplayHints::default(),
            glyphs: IndexMap::new(),
        }
    }
}

impl BubbleSettings {
    pub fn from_config(config: &BubbleConfig) -> Self {
        let d = Self::default();
        let display = DisplayHints {
            y_offset: read_f64(config, "bubble.y-offset", d.display.y_offset),
            view_range: read_f64(config, "bubble.view-range", d.display.view_range),
            show_shadow: read_bool(config, "bubble.show-shadow", d.display.show_shadow),
        };

        Self {
            enabled: read_bool(config, "bubble.enabled", d.enabled),
            inner_px: read_px(config, "bubble.inner-px", d.inner_px),
            auto_wrap: read_bool(config, "bubble.auto-wrap", d.auto_wrap),
            max_lines: (read_px(config, "bubble.max-lines", d.max_lines as u32) as usize).max(1),
            ellipsis: read_string(config, "bubble.ellipsis", &d.ellipsis),
            font_px: read_px(config, "bubble.font-px", d.font_px),
            max_height: config
                .get("bubble.max-height")
                .map(|_| read_px(config, "bubble.max-height", u32::MAX)),
            inner_px_per_height: read_height_map(config, "bubble.inner-px-per-height", |v| {
                v.as_i64().map(|i| i.clamp(0, i64::from(u32::MAX)) as u32)
            }),
            width_mul: read_f64(config, "bubble.width-mul", d.width_mul),
            width_mul_per_height: read_height_map(config, "bubble.width-mul-per-height", |v| {
                v.as_f64()
            }),
            tail_trim_per_side: read_px(config, "bubble.tail-trim-per-side", d.tail_trim_per_side),
            sets: read_sets(config),
            lifetime_ticks: read_px(config, "bubble.lifetime-ticks", d.lifetime_ticks),
            text_template: read_string(config, "bubble.mini-message", &d.text_template),
            placeholders_in_text: read_bool(
                config,
                "bubble.use-papi-for-text",
                d.placeholders_in_text,
            ),
            display,
            glyphs: read_glyphs(config),
        }
    }

    /// Wrap budget for a frame height, falling back to `bubble.inner-px`.
    pub fn inner_px_for_height(&self, height: u32) -> u32 {
        self.inner_px_per_height
            .get(&height)
            .copied()
            .unwrap_or(self.inner_px)
    }

    /// Width multiplier for a frame height, falling back to `bubble.width-mul`; never below 0.5.
    pub fn width_mul_for_height(&self, height: u32) -> f64 {
        let raw = self
            .width_mul_per_height
            .get(&height)
            .copied()
            .unwrap_or(self.width_mul);
        if raw.is_nan() {
            return MIN_WIDTH_MULTIPLIER;
        }
        raw.max(MIN_WIDTH_MULTIPLIER)
    }

    pub fn is_height_defined(&self, height: u32) -> bool {
        self.sets.contains_key(&height)
    }

    /// Tile spec for a height; an undefined height yields the per-field defaults.
    pub fn frame_spec(&self, height: u32) -> FrameHeightSpec {
        match self.sets.get(&height) {
            Some(spec) => spec.clone(),
            None => {
                tracing::debug!(height, "no tile set defined for frame height; using defaults");
                FrameHeightSpec::default()
            }
        }
    }
}

fn warn_type(key: &str, expected: &str, found: &Value) {
    tracing::warn!(
        key,
        expected,
        found = value_kind(found),
        "bubble config value has the wrong type; using default"
    );
}

fn read_bool(config: &BubbleConfig, key: &str, default: bool) -> bool {
    match config.get(key) {
        None => default,
        Some(Value::Bool(b)) => *b,
        Some(other) => {
            warn_type(key, "boolean", other);
            default
        }
    }
}

fn read_f64(config: &BubbleConfig, key: &str, default: f64) -> f64 {
    match config.get(key) {
        None => default,
        Some(v) => match v.as_f64() {
            Some(f) => f,
            None => {
                warn_type(key, "number", v);
                default
            }
        },
    }
}

fn read_string(config: &BubbleConfig, key: &str, default: &str) -> String {
    match config.get(key) {
        None => default.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            warn_type(key, "string", other);
            default.to_string()
        }
    }
}

fn read_px(config: &BubbleConfig, key: &str, default: u32) -> u32 {
    px_value(key, config.get(key), default)
}

/// Integer pixel/tick value; negatives clamp to zero.
fn px_value(key: &str, value: Option<&Value>, default: u32) -> u32 {
    match value {
        None => default,
        Some(v) => match v.as_i64() {
            Some(i) => i.clamp(0, i64::from(u32::MAX)) as u32,
            None => {
                warn_type(key, "integer", v);
                default
            }
        },
    }
}

fn parse_height_key(section: &str, key: &str) -> Option<u32> {
    match key.trim().parse::<u32>() {
        Ok(h) => Some(h),
        Err(_) => {
            tracing::warn!(section, key, "frame height key is not a non-negative integer; ignoring");
            None
        }
    }
}

fn read_height_map<T>(
    config: &BubbleConfig,
    section_key: &str,
    convert: impl Fn(&Value) -> Option<T>,
) -> BTreeMap<u32, T> {
    let mut out = BTreeMap::new();
    let Some(section) = config.section(section_key) else {
        return out;
    };
    for (key, value) in section {
        let Some(height) = parse_height_key(section_key, key) else {
            continue;
        };
        match convert(value) {
            Some(v) => {
                out.insert(height, v);
            }
            None => {
                tracing::debug!(
                    section = section_key,
                    height,
                    found = value_kind(value),
                    "ignoring per-height override of unexpected type"
                );
            }
        }
    }
    out
}

fn read_sets(config: &BubbleConfig) -> BTreeMap<u32, FrameHeightSpec> {
    let mut out = BTreeMap::new();
    let Some(section) = config.section("bubble.sets") else {
        return out;
    };
    for (key, value) in section {
        let Some(height) = parse_height_key("bubble.sets", key) else {
            continue;
        };
        // Only mapping sections define a height; anything else leaves it undefined.
        let Some(map) = value.as_object() else {
            tracing::warn!(height, "bubble.sets entry is not a mapping; height stays undefined");
            continue;
        };
        let spec = FrameHeightSpec::from_section(&format!("bubble.sets.{height}"), map);
        out.insert(height, spec);
    }
    out
}

fn read_glyphs(config: &BubbleConfig) -> IndexMap<String, String> {
    let mut out = IndexMap::new();
    let Some(section) = config.section("bubble.glyphs") else {
        return out;
    };
    for (name, value) in section {
        match value.as_str() {
            Some(glyph) => {
                out.insert(name.trim_matches('%').to_string(), glyph.to_string());
            }
            None => warn_type(&format!("bubble.glyphs.{name}"), "string", value),
        }
    }
    out
}
