use crossterm::style::{style, Color, Stylize};

const ACCENT: Color = Color::AnsiValue(205);

/// Colors for the live display. Passed to the renderer rather than kept as
/// process-wide state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Theme {
    color: bool,
}

impl Theme {
    pub(crate) fn new(color: bool) -> Self {
        Self { color }
    }

    #[cfg(test)]
    pub(crate) fn plain() -> Self {
        Self::new(false)
    }

    /// Spinner and outcome glyphs.
    pub(crate) fn accent(&self, text: &str) -> String {
        if self.color {
            style(text).with(ACCENT).to_string()
        } else {
            text.to_string()
        }
    }

    /// Table values.
    pub(crate) fn value(&self, text: &str) -> String {
        if self.color {
            style(text).white().bold().to_string()
        } else {
            text.to_string()
        }
    }
}
