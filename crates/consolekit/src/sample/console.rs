use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal;
use log::debug;
use std::io::{self, IsTerminal};

/// Block until a single key is pressed. Returns at once without a terminal.
pub(super) fn wait_for_keypress() -> anyhow::Result<()> {
    if !io::stdin().is_terminal() {
        debug!("stdin is not a terminal; skipping keypress wait");
        return Ok(());
    }
    terminal::enable_raw_mode()?;
    let result = read_key_press();
    terminal::disable_raw_mode()?;
    result
}

fn read_key_press() -> anyhow::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
