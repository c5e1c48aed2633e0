//! Fixed-advance width estimation and wrapping for bubble text.
//!
//! There is no font shaping here: every code point falls into one of four width classes derived
//! from a single base glyph size, which is what the bubble glyph sets are drawn against.

mod wrap;

pub use wrap::{LineWrapEngine, split_by_newlines};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidthClass {
    Space,
    Ascii,
    /// CJK Unified Ideographs (U+4E00..=U+9FFF) and Hiragana/Katakana (U+3040..=U+30FF).
    Wide,
    OtherWide,
}

impl WidthClass {
    pub fn of(ch: char) -> Self {
        let cp = ch as u32;
        if ch == ' ' {
            Self::Space
        } else if cp < 128 {
            Self::Ascii
        } else if (0x4E00..=0x9FFF).contains(&cp) || (0x3040..=0x30FF).contains(&cp) {
            Self::Wide
        } else {
            Self::OtherWide
        }
    }
}

/// Rounds half-up and saturates into `u32` (negative and NaN become 0).
pub fn round_px(v: f64) -> u32 {
    if !(v.is_finite() && v > 0.0) {
        return 0;
    }
    let r = (v + 0.5).floor();
    if r >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        r as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidthModel {
    pub base_px: u32,
}

impl Default for WidthModel {
    fn default() -> Self {
        Self {
            base_px: crate::settings::DEFAULT_FONT_PX,
        }
    }
}

impl WidthModel {
    pub fn new(base_px: u32) -> Self {
        Self { base_px }
    }

    pub fn class_width(&self, class: WidthClass) -> u32 {
        let b = self.base_px;
        match class {
            WidthClass::Space => b.saturating_sub(2).max(4),
            WidthClass::Ascii => b,
            WidthClass::Wide => round_px(f64::from(b) * 1.6),
            WidthClass::OtherWide => round_px(f64::from(b) * 1.3),
        }
    }

    pub fn char_width(&self, ch: char) -> u32 {
        self.class_width(WidthClass::of(ch))
    }

    pub fn width_of(&self, text: &str) -> u32 {
        text.chars()
            .fold(0u32, |acc, ch| acc.saturating_add(self.char_width(ch)))
    }

    pub fn scaled_width_of(&self, text: &str, width_mul: f64) -> u32 {
        round_px(f64::from(self.width_of(text)) * width_mul)
    }

    /// Scaled width of a single code point, rounded on its own.
    ///
    /// Wrapping accumulates these per code point, so a line's wrap width can differ from
    /// [`WidthModel::scaled_width_of`] by rounding when the multiplier is fractional.
    pub fn scaled_char_width(&self, ch: char, width_mul: f64) -> u32 {
        round_px(f64::from(self.char_width(ch)) * width_mul)
    }
}
