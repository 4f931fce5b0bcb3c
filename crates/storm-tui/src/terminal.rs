//! Terminal session: raw mode, alternate screen and mouse capture.
//!
//! [`TerminalSession`] undoes everything it enabled when dropped, including
//! when setup fails halfway or the program panics.

use std::io::{self, Write};

use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

/// Switch `out` to the alternate screen and start capturing the mouse.
pub fn enter_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, EnterAlternateScreen, EnableMouseCapture)
}

/// Leave the alternate screen, release the mouse and show the cursor.
pub fn leave_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, LeaveAlternateScreen, DisableMouseCapture, Show)
}

/// Best-effort restore of stdout. Safe to call more than once.
pub fn restore() {
    let _ = disable_raw_mode();
    let _ = leave_screen(&mut io::stdout());
}

/// Restore the terminal before the previous hook prints the panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        restore();
        original_hook(panic_info);
    }));
}

/// The dashboard's terminal for as long as it lives.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalSession {
    /// Enter raw mode and the alternate screen on stdout. Raw mode is undone
    /// if any later step fails.
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        match Self::open_screen() {
            Ok(terminal) => Ok(Self { terminal }),
            Err(err) => {
                restore();
                Err(err)
            }
        }
    }

    fn open_screen() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
        let mut stdout = io::stdout();
        enter_screen(&mut stdout)?;
        Terminal::new(CrosstermBackend::new(stdout))
    }

    /// The ratatui terminal.
    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        restore();
    }
}
