// Scoped raw terminal mode
// Raw mode and the hidden cursor last exactly as long as the guard value

use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{cursor, execute};
use std::io::{self, Write};

/// Holds the terminal in raw mode with the cursor hidden
/// Dropping it (normal return, `?` error or panic unwind) restores the terminal
pub struct RawTerminal<W: Write> {
    out: W,
}

impl<W: Write> RawTerminal<W> {
    pub fn acquire(mut out: W) -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(out, cursor::Hide) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(RawTerminal { out })
    }
}

impl<W: Write> Write for RawTerminal<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl<W: Write> Drop for RawTerminal<W> {
    fn drop(&mut self) {
        // nothing left to report errors to
        let _ = execute!(self.out, cursor::Show);
        let _ = disable_raw_mode();
    }
}
