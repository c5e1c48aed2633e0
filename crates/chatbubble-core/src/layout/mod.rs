//! Two-pass bubble layout.
//!
//! The wrap budget depends on the frame height and the frame height depends on how many lines
//! the wrap produced. The resolver runs exactly two rounds and then freezes the parameters of the
//! second round; it does not iterate to a fixed point.

mod height;

pub use height::{FIRST_LINE_HEIGHT, LINE_STEP_HEIGHT, base_height, pick_height};

use crate::settings::BubbleSettings;
use crate::text::{LineWrapEngine, WidthModel, round_px, split_by_newlines};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    pub lines: Vec<String>,
    pub frame_height: u32,
    pub inner_width_px: u32,
    pub width_multiplier: f64,
}

impl LayoutResult {
    /// Widest line, measured with the frozen multiplier.
    pub fn max_line_width_px(&self, model: &WidthModel) -> u32 {
        self.lines
            .iter()
            .map(|l| model.scaled_width_of(l, self.width_multiplier))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LayoutResolver<'a> {
    settings: &'a BubbleSettings,
    wrapper: LineWrapEngine,
}

impl<'a> LayoutResolver<'a> {
    pub fn new(settings: &'a BubbleSettings) -> Self {
        Self {
            settings,
            wrapper: LineWrapEngine::new(WidthModel::new(settings.font_px)),
        }
    }

    pub fn width_model(&self) -> WidthModel {
        self.wrapper.model
    }

    pub fn pick_height(&self, line_count: usize) -> u32 {
        pick_height(
            line_count,
            |h| self.settings.is_height_defined(h),
            self.settings.max_height,
        )
    }

    /// Lays out already-cleaned text (see [`crate::preprocess::clean_message`]).
    pub fn resolve(&self, cleaned: &str) -> LayoutResult {
        let s = self.settings;

        let rough = if s.auto_wrap {
            self.wrapper.wrap(cleaned, s.inner_px, 1.0)
        } else {
            split_by_newlines(cleaned)
        };

        let h1 = self.pick_height(rough.len());
        let inner1 = s.inner_px_for_height(h1);
        let mul1 = s.width_mul_for_height(h1);

        let pass2 = if s.auto_wrap {
            self.wrapper.wrap(cleaned, inner1, mul1)
        } else {
            rough
        };

        // Final parameters come from the second pass and are not revisited.
        let hf = self.pick_height(pass2.len());
        let inner_f = s.inner_px_for_height(hf);
        let mul_f = s.width_mul_for_height(hf);

        let lines = if pass2.len() > s.max_lines {
            truncate_with_ellipsis(
                &pass2,
                s.max_lines,
                inner_f,
                mul_f,
                &s.ellipsis,
                &self.wrapper.model,
            )
        } else {
            pass2
        };

        LayoutResult {
            lines,
            frame_height: hf,
            inner_width_px: inner_f,
            width_multiplier: mul_f,
        }
    }
}

/// Keeps the first `max_lines` lines and ends the last one with `ellipsis`.
///
/// The last kept line always loses at least one code point, then keeps losing trailing code
/// points until `line + ellipsis` fits `inner_px`. If even the bare ellipsis does not fit, the
/// line is emptied instead of overflowing.
pub fn truncate_with_ellipsis(
    lines: &[String],
    max_lines: usize,
    inner_px: u32,
    width_mul: f64,
    ellipsis: &str,
    model: &WidthModel,
) -> Vec<String> {
    let max_lines = max_lines.max(1);
    if lines.len() <= max_lines {
        return lines.to_vec();
    }

    let mut out: Vec<String> = lines[..max_lines].to_vec();
    let mut last = out.pop().unwrap_or_default();

    last.pop();
    // Unscaled width of `last + ellipsis`, shrunk per popped code point; rounding applies to the sum.
    let mut raw = model
        .width_of(&last)
        .saturating_add(model.width_of(ellipsis));
    let fits = |raw: u32| round_px(f64::from(raw) * width_mul) <= inner_px;
    while !last.is_empty() && !fits(raw) {
        if let Some(ch) = last.pop() {
            raw = raw.saturating_sub(model.char_width(ch));
        }
    }

    if last.is_empty() && model.scaled_width_of(ellipsis, width_mul) > inner_px {
        out.push(String::new());
    } else {
        last.push_str(ellipsis);
        out.push(last);
    }
    out
}
