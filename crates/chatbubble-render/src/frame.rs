//! Tiled bubble background and tail pointer.
//!
//! Both strings are built from a frame height's tile set: the background is
//! `left + mid * repeat + right`, the tail line is `mid * l + tail + mid * r` using the same
//! `repeat` so the pointer row lines up under the background.

use crate::glyph::{GlyphResolver, resolve_token};
use chatbubble_core::text::round_px;
use chatbubble_core::{FrameHeightSpec, LayoutResult, WidthModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedFrame {
    pub background: String,
    pub tail: String,
    pub fill_width_px: u32,
    /// Mid tiles in the background.
    pub tile_repeat: u32,
    pub tail_split: TailSplit,
}

/// Mid tiles placed left and right of the tail glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailSplit {
    pub left: u32,
    pub right: u32,
}

fn mid_px(spec: &FrameHeightSpec) -> u32 {
    spec.mid_px.max(1)
}

/// Smallest number of mid tiles (at least one) that, between the caps, reaches `fill_px`.
pub fn tile_repeat(fill_px: u32, spec: &FrameHeightSpec) -> u32 {
    let avail = fill_px.saturating_sub(spec.left_px.saturating_add(spec.right_px));
    avail.div_ceil(mid_px(spec)).max(1)
}

/// Tile-equivalents covered by the tail glyph.
pub fn tail_tiles(spec: &FrameHeightSpec) -> u32 {
    round_px(f64::from(spec.tail_px) / f64::from(mid_px(spec))).max(1)
}

/// Centers the tail within `repeat` tiles, then trims up to `trim_per_side` tiles from each side.
///
/// Total trim never exceeds the rim around the tail.
pub fn tail_split(repeat: u32, spec: &FrameHeightSpec, trim_per_side: u32) -> TailSplit {
    let rim = repeat.saturating_sub(tail_tiles(spec));
    let left = rim / 2;
    let right = rim - left;

    let trim_total = rim.min(trim_per_side.saturating_mul(2));
    let trim_left = trim_total / 2;
    let trim_right = trim_total - trim_left;

    TailSplit {
        left: left.saturating_sub(trim_left),
        right: right.saturating_sub(trim_right),
    }
}

pub struct SliceBackgroundComposer<'a> {
    glyphs: &'a dyn GlyphResolver,
}

impl<'a> SliceBackgroundComposer<'a> {
    pub fn new(glyphs: &'a dyn GlyphResolver) -> Self {
        Self { glyphs }
    }

    fn glyph(&self, token: &Option<String>) -> String {
        resolve_token(self.glyphs, token.as_deref())
    }

    pub fn three_slice(&self, fill_px: u32, spec: &FrameHeightSpec) -> String {
        let repeat = tile_repeat(fill_px, spec) as usize;
        let (l, m, r) = (
            self.glyph(&spec.left),
            self.glyph(&spec.mid),
            self.glyph(&spec.right),
        );
        format!("{l}{}{r}", m.repeat(repeat))
    }

    pub fn tail_line(&self, fill_px: u32, spec: &FrameHeightSpec, trim_per_side: u32) -> String {
        let split = tail_split(tile_repeat(fill_px, spec), spec, trim_per_side);
        let (m, t) = (self.glyph(&spec.mid), self.glyph(&spec.tail));
        format!(
            "{}{t}{}",
            m.repeat(split.left as usize),
            m.repeat(split.right as usize)
        )
    }

    /// Sizes the frame to the widest line of `layout` plus the set's padding.
    pub fn compose(
        &self,
        layout: &LayoutResult,
        spec: &FrameHeightSpec,
        trim_per_side: u32,
        model: &WidthModel,
    ) -> ComposedFrame {
        let fill_width_px = layout
            .max_line_width_px(model)
            .saturating_add(spec.padding_px);
        let repeat = tile_repeat(fill_width_px, spec);
        ComposedFrame {
            background: self.three_slice(fill_width_px, spec),
            tail: self.tail_line(fill_width_px, spec, trim_per_side),
            fill_width_px,
            tile_repeat: repeat,
            tail_split: tail_split(repeat, spec, trim_per_side),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::GlyphTable;

    fn spec() -> FrameHeightSpec {
        FrameHeightSpec {
            left: Some("l".to_string()),
            mid: Some("m".to_string()),
            right: Some("r".to_string()),
            tail: Some("t".to_string()),
            ..FrameHeightSpec::default()
        }
    }

    fn glyphs() -> GlyphTable {
        let mut g = GlyphTable::new();
        g.insert("img_l", "L");
        g.insert("img_m", "M");
        g.insert("img_r", "R");
        g.insert("img_t", "T");
        g
    }

    #[test]
    fn repeat_is_the_tightest_covering_fit() {
        let s = spec();
        for fill in (s.left_px + s.right_px + s.mid_px + 1)..400 {
            let repeat = tile_repeat(fill, &s);
            assert!(repeat * s.mid_px + s.left_px + s.right_px >= fill);
            assert!((repeat - 1) * s.mid_px + s.left_px + s.right_px < fill);
        }
    }

    #[test]
    fn repeat_has_a_floor_of_one() {
        let s = spec();
        assert_eq!(tile_repeat(0, &s), 1);
        assert_eq!(tile_repeat(6, &s), 1);
        assert_eq!(tile_repeat(7, &s), 1);
        assert_eq!(tile_repeat(12, &s), 2);
    }

    #[test]
    fn zero_mid_width_does_not_divide_by_zero() {
        let s = FrameHeightSpec {
            mid_px: 0,
            ..spec()
        };
        assert_eq!(tile_repeat(20, &s), 14);
        assert_eq!(tail_tiles(&s), 7);
    }

    #[test]
    fn tail_is_centered_within_one_tile() {
        let s = spec();
        for repeat in 1..60 {
            let split = tail_split(repeat, &s, 0);
            assert!(split.left.abs_diff(split.right) <= 1);
            assert_eq!(
                split.left + split.right,
                repeat.saturating_sub(tail_tiles(&s))
            );
        }
    }

    #[test]
    fn tail_trim_is_symmetric_and_bounded_by_the_rim() {
        let s = spec();
        // tail 7px over 5px tiles rounds to one tile; rim = 9.
        assert_eq!(tail_split(10, &s, 0), TailSplit { left: 4, right: 5 });
        assert_eq!(tail_split(10, &s, 2), TailSplit { left: 2, right: 3 });
        assert_eq!(tail_split(10, &s, 50), TailSplit { left: 0, right: 0 });
        // Rim of 3 allows only a total trim of 3: one left, two right.
        assert_eq!(tail_split(4, &s, 2), TailSplit { left: 0, right: 0 });
    }

    #[test]
    fn three_slice_and_tail_line_use_resolved_glyphs() {
        let table = glyphs();
        let c = SliceBackgroundComposer::new(&table);
        let s = spec();
        // avail = 30 - 6 = 24 -> ceil(24 / 5) = 5 tiles.
        assert_eq!(c.three_slice(30, &s), "LMMMMMR");
        assert_eq!(c.tail_line(30, &s, 0), "MMTMM");
        assert_eq!(c.tail_line(30, &s, 1), "MTM");
    }

    #[test]
    fn unresolved_tokens_render_empty_segments() {
        let mut table = GlyphTable::new();
        table.insert("img_m", "M");
        let c = SliceBackgroundComposer::new(&table);
        let s = spec();
        assert_eq!(c.three_slice(30, &s), "MMMMM");
        assert_eq!(c.tail_line(30, &s, 0), "MMMM");
    }

    #[test]
    fn compose_pads_the_widest_line() {
        let table = glyphs();
        let c = SliceBackgroundComposer::new(&table);
        let layout = LayoutResult {
            lines: vec!["Hello".to_string(), "Hi".to_string()],
            frame_height: 23,
            inner_width_px: 140,
            width_multiplier: 1.0,
        };
        let frame = c.compose(&layout, &spec(), 0, &WidthModel::default());
        // 30px text + 12px padding.
        assert_eq!(frame.fill_width_px, 42);
        // ceil(36 / 5) = 8.
        assert_eq!(frame.tile_repeat, 8);
        assert_eq!(frame.background, format!("L{}R", "M".repeat(8)));
        assert_eq!(frame.tail_split, TailSplit { left: 3, right: 4 });
        assert_eq!(frame.tail, "MMMTMMMM");
    }
}
