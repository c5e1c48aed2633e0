use super::WidthModel;

/// Greedy per-code-point wrapper.
///
/// Explicit `\n` always breaks, `\r` is dropped, and a code point wider than the whole budget
/// still gets a line of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct LineWrapEngine {
    pub model: WidthModel,
}

impl LineWrapEngine {
    pub fn new(model: WidthModel) -> Self {
        Self { model }
    }

    pub fn wrap(&self, text: &str, inner_px: u32, width_mul: f64) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut line = String::new();
        let mut cur: u32 = 0;

        for ch in text.chars() {
            match ch {
                '\r' => continue,
                '\n' => {
                    out.push(std::mem::take(&mut line));
                    cur = 0;
                    continue;
                }
                _ => {}
            }

            let w = self.model.scaled_char_width(ch, width_mul);
            if cur.saturating_add(w) > inner_px && !line.is_empty() {
                out.push(std::mem::take(&mut line));
                cur = 0;
            }
            line.push(ch);
            cur = cur.saturating_add(w);
        }

        out.push(line);
        out
    }
}

/// Splits on `\n` / `\r\n` only; no width reasoning. Always returns at least one line.
pub fn split_by_newlines(text: &str) -> Vec<String> {
    let mut parts: Vec<&str> = text.split('\n').collect();
    let last = parts.len() - 1;
    for part in parts.iter_mut().take(last) {
        if let Some(stripped) = part.strip_suffix('\r') {
            *part = stripped;
        }
    }
    parts.into_iter().map(str::to_string).collect()
}
