/// Height of a one-line frame.
pub const FIRST_LINE_HEIGHT: u32 = 13;
/// Extra frame height per additional line.
pub const LINE_STEP_HEIGHT: u32 = 10;

/// Formula height for `line_count` lines, before clamping or bucket search.
pub fn base_height(line_count: usize) -> u32 {
    let extra = (line_count.max(1) - 1) as u64 * u64::from(LINE_STEP_HEIGHT);
    let h = u64::from(FIRST_LINE_HEIGHT) + extra;
    u32::try_from(h).unwrap_or(u32::MAX)
}

/// Picks the frame-height bucket for a line count.
///
/// The formula height is clamped to `max_height`, then stepped down by [`LINE_STEP_HEIGHT`]
/// until a defined bucket is found. The result never goes below [`FIRST_LINE_HEIGHT`], even when
/// no bucket is defined at all.
pub fn pick_height(
    line_count: usize,
    is_defined: impl Fn(u32) -> bool,
    max_height: Option<u32>,
) -> u32 {
    let mut h = i64::from(base_height(line_count));
    if let Some(max) = max_height {
        h = h.min(i64::from(max));
    }
    while h > 0 && !is_defined(h as u32) {
        h -= i64::from(LINE_STEP_HEIGHT);
    }
    h.max(i64::from(FIRST_LINE_HEIGHT)) as u32
}
