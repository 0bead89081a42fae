//! Raw-mode terminal setup with restore on drop

use std::io::{self, Stdout};

use crossterm::{
    cursor, execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

pub type PenTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Restores the terminal when dropped, including on early error returns
pub struct TerminalGuard {
    pub terminal: PenTerminal,
}

impl TerminalGuard {
    /// Switch to the alternate screen in raw mode. A failure part way
    /// through undoes whatever was already changed.
    pub fn enter() -> io::Result<Self> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide)?;
        let setup = terminal::enable_raw_mode()
            .and_then(|()| Terminal::new(CrosstermBackend::new(out)));
        let terminal = undo_on_error(setup, restore)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore();
    }
}

fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

/// Best-effort return to the normal screen; safe to call when only some of
/// the setup happened
fn restore() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_setup_is_undone() {
        let undone = Cell::new(false);
        let failed: io::Result<()> = Err(io::Error::new(io::ErrorKind::Other, "no tty"));

        assert!(undo_on_error(failed, || undone.set(true)).is_err());
        assert!(undone.get());
    }

    #[test]
    fn test_successful_setup_is_kept() {
        let undone = Cell::new(false);

        assert_eq!(undo_on_error(Ok(7), || undone.set(true)).unwrap(), 7);
        assert!(!undone.get());
    }
}
