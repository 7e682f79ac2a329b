use std::fmt::Write;

use batchwatch_core::{Header, MonitorViewModel};

use super::theme::Theme;

pub(crate) const SUCCESS_GLYPHS: &str = "✔✔✔";
pub(crate) const FAILURE_GLYPHS: &str = "✗✗✗";

/// Renders one frame: header line, label/value table, and the separating
/// blank line once the display is final.
pub(crate) fn render(view: &MonitorViewModel, theme: &Theme) -> String {
    let mut out = String::new();
    match &view.header {
        Header::Spinner { frame } => out.push_str(&theme.accent(frame)),
        Header::Success => out.push_str(&theme.accent(SUCCESS_GLYPHS)),
        Header::Failure => out.push_str(&theme.accent(FAILURE_GLYPHS)),
        Header::Blank => {}
    }
    out.push('\n');

    let width = view
        .rows
        .iter()
        .map(|row| row.label.chars().count())
        .max()
        .unwrap_or(0);
    for row in &view.rows {
        let _ = writeln!(
            out,
            "{label:<width$}\t{value}",
            label = row.label,
            value = theme.value(&row.value)
        );
    }

    if view.trailing_blank {
        out.push('\n');
    }
    out
}
