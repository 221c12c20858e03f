use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Foreground styling for one cell
#[derive(Clone, Copy, Default, PartialEq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub fn fg(color: Color) -> Self {
        Self {
            fg: Some(color),
            bold: false,
        }
    }

    pub fn bold(color: Color) -> Self {
        Self {
            fg: Some(color),
            bold: true,
        }
    }
}

/// A single cell in the terminal back buffer
#[derive(Clone)]
struct Cell {
    ch: char,
    style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

impl Terminal {
    /// Initialize the terminal for drawing. Fails before anything is drawn
    /// if there is no drawable area.
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = if alternate_screen {
            size()?
        } else {
            size().unwrap_or((80, 24)) // piped output still gets a canvas
        };

        if width == 0 || height == 0 {
            return Err(io::Error::other("terminal has no drawable area"));
        }

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        let buffer = vec![vec![Cell::default(); width as usize]; height as usize];

        Ok(Self {
            width,
            height,
            buffer,
            alternate_screen,
        })
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Clear the back buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a character at position; out-of-bounds writes are dropped
    pub fn set(&mut self, x: i32, y: i32, ch: char, style: Style) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, style };
        }
    }

    /// Render the entire back buffer to the screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;

            for cell in row {
                if cell.style.bold {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }

                match cell.style.fg {
                    Some(color) => queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?,
                    None => queue!(out, Print(cell.ch))?,
                }

                if cell.style.bold {
                    queue!(out, SetAttribute(Attribute::Reset))?;
                }
            }
        }

        out.flush()
    }

    /// Check for keypress (non-blocking)
    pub fn check_key(&self) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Sleep for specified duration
    pub fn sleep(&self, seconds: f32) {
        std::thread::sleep(Duration::from_secs_f32(seconds));
    }

    /// Print the back buffer to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) {
        for row in &self.buffer {
            let mut line = String::new();
            for cell in row {
                if cell.ch == ' ' {
                    line.push(' ');
                    continue;
                }

                if cell.style.bold {
                    line.push_str("\x1b[1m");
                }
                if let Some(color) = cell.style.fg {
                    line.push_str(&ansi_fg(color));
                }
                line.push(cell.ch);
                line.push_str("\x1b[0m");
            }
            println!("{}", line.trim_end());
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

fn ansi_fg(color: Color) -> String {
    let code = match color {
        Color::Rgb { r, g, b } => return format!("\x1b[38;2;{};{};{}m", r, g, b),
        Color::AnsiValue(v) => return format!("\x1b[38;5;{}m", v),
        Color::Black => 30,
        Color::DarkRed => 31,
        Color::DarkGreen => 32,
        Color::DarkYellow => 33,
        Color::DarkBlue => 34,
        Color::DarkMagenta => 35,
        Color::DarkCyan => 36,
        Color::Grey => 37,
        Color::DarkGrey => 90,
        Color::Red => 91,
        Color::Green => 92,
        Color::Yellow => 93,
        Color::Blue => 94,
        Color::Magenta => 95,
        Color::Cyan => 96,
        Color::White => 97,
        _ => 39,
    };
    format!("\x1b[{}m", code)
}

/// Predefined colors for the plant (standard terminal colors)
pub mod colors {
    use crossterm::style::Color;

    // Wood colors - yellow/dark yellow for a brown-like appearance
    pub const WOOD_DARK: Color = Color::DarkYellow;
    pub const WOOD_LIGHT: Color = Color::Yellow;

    // Foliage for the leaf style
    pub const FOLIAGE_DARK: Color = Color::DarkGreen;
    pub const FOLIAGE_LIGHT: Color = Color::Green;

    // Berries
    pub const BERRY_DARK: Color = Color::DarkRed;
    pub const BERRY_LIGHT: Color = Color::Red;
}
