use std::io::{self, Write};

use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, queue};

/// Redraws a frame in place by moving back over the previous one.
pub(crate) struct LiveFrame<W: Write> {
    out: W,
    drawn_lines: u16,
    cursor_hidden: bool,
}

impl<W: Write> LiveFrame<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            out,
            drawn_lines: 0,
            cursor_hidden: false,
        }
    }

    pub(crate) fn draw(&mut self, frame: &str) -> io::Result<()> {
        if !self.cursor_hidden {
            queue!(self.out, cursor::Hide)?;
            self.cursor_hidden = true;
        }
        if self.drawn_lines > 0 {
            queue!(self.out, cursor::MoveToPreviousLine(self.drawn_lines))?;
        }
        queue!(self.out, Clear(ClearType::FromCursorDown))?;
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.drawn_lines = u16::try_from(frame.matches('\n').count()).unwrap_or(u16::MAX);
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn get_ref(&self) -> &W {
        &self.out
    }

    /// Leaves the last frame on screen and restores the cursor.
    pub(crate) fn finish(&mut self) -> io::Result<()> {
        if self.cursor_hidden {
            queue!(self.out, cursor::Show)?;
            self.cursor_hidden = false;
        }
        self.out.flush()
    }
}
