//! Scoped ownership of the terminal.
//!
//! Raw mode, the alternate screen and mouse capture are switched on by
//! [`TerminalGuard::acquire`] and switched off again when the guard drops,
//! including when the UI loop bails out with an error.

use std::io::{self, Stdout};

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};

pub struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = restore();
            return Err(e.into());
        }

        match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => {
                tracing::debug!("Terminal acquired");
                Ok(Self { terminal })
            }
            Err(e) => {
                let _ = restore();
                Err(e.into())
            }
        }
    }

    pub fn draw<F>(&mut self, render: F) -> io::Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = restore() {
            tracing::error!(error = %e, "Failed to restore terminal");
        }
        if let Err(e) = self.terminal.show_cursor() {
            tracing::warn!(error = %e, "Failed to show cursor");
        }
        tracing::debug!("Terminal released");
    }
}

fn restore() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)
}
