use std::io;
use std::ops::{Deref, DerefMut};

use ratatui::backend::CrosstermBackend;

pub struct Terminal(ratatui::Terminal<CrosstermBackend<io::Stdout>>);

impl Deref for Terminal {
    type Target = ratatui::Terminal<CrosstermBackend<io::Stdout>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Terminal {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();
        // tui doesn't clear buffer for different instances, so clear screen here
        crossterm::execute!(
            stdout,
            crossterm::terminal::Clear(crossterm::terminal::ClearType::All)
        )?;
        let backend = CrosstermBackend::new(stdout);
        Ok(Self(ratatui::Terminal::new(backend)?))
    }

    pub fn enter_full_screen() -> io::Result<()> {
        use crossterm::{cursor, terminal};

        terminal::enable_raw_mode()?;
        crossterm::execute!(
            io::stdout(),
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            terminal::Clear(terminal::ClearType::Purge),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )
    }

    /// Best effort; also runs from the panic hook
    pub fn exit_full_screen() {
        use crossterm::{cursor, terminal};

        _ = crossterm::execute!(
            io::stdout(),
            cursor::Show,
            terminal::LeaveAlternateScreen,
        );
        _ = terminal::disable_raw_mode();
    }
}
