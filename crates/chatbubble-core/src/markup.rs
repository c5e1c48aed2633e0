//! Rich-text markup for the bubble's text layer.
//!
//! Lines are escaped and then dropped into a template whose `%message%` slot receives each line;
//! the template markup itself is left to the display collaborator to interpret.

pub const DEFAULT_TEXT_TEMPLATE: &str = "<white>%message%</white>";
pub const MESSAGE_SLOT: &str = "%message%";

pub fn escape_markup(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for ch in line.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_line(line: &str, template: &str) -> String {
    template.replace(MESSAGE_SLOT, &escape_markup(line))
}

/// Renders each line through `template` and joins them with `\n`.
pub fn render_lines(lines: &[String], template: &str) -> String {
    render_lines_with(lines, template, |line| line)
}

/// Like [`render_lines`], but passes every templated line through `expand` before joining.
///
/// The hook sees the line after escaping and templating, so it may rewrite template text too.
pub fn render_lines_with(
    lines: &[String],
    template: &str,
    expand: impl Fn(String) -> String,
) -> String {
    lines
        .iter()
        .map(|l| expand(render_line(l, template)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_sensitive_characters() {
        assert_eq!(escape_markup("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape_markup("plain"), "plain");
    }

    #[test]
    fn lines_are_templated_and_joined() {
        let lines = vec!["hi <3".to_string(), "bye".to_string()];
        assert_eq!(
            render_lines(&lines, DEFAULT_TEXT_TEMPLATE),
            "<white>hi &lt;3</white>\n<white>bye</white>"
        );
    }

    #[test]
    fn expand_hook_runs_on_each_templated_line() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let out = render_lines_with(&lines, "<c>%message%</c>", |l| l.replace("<c>", "<gold>"));
        assert_eq!(out, "<gold>a</c>\n<gold>b</c>");
    }

    #[test]
    fn template_without_slot_is_used_verbatim() {
        let lines = vec!["x".to_string()];
        assert_eq!(render_lines(&lines, "<gray>static</gray>"), "<gray>static</gray>");
    }
}
