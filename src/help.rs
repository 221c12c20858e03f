use crate::terminal::Terminal;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{self, stdout, Write};

/// Show a modal help overlay drawn straight to the screen, leaving the back
/// buffer untouched; the caller's next render erases it. Returns true if
/// the user chose to quit while the overlay was open.
pub fn show_help_modal(term: &mut Terminal, help_text: &str) -> io::Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    draw_overlay(width, height, help_text)?;

    loop {
        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('?') => break,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            }
        }
    }

    // restore the frame underneath
    term.render()?;
    Ok(false)
}

fn draw_overlay(width: u16, height: u16, help_text: &str) -> io::Result<()> {
    let lines: Vec<&str> = help_text.lines().collect();
    let max_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4;
    let box_height = lines.len() + 2;

    let start_x = (width as usize).saturating_sub(box_width) / 2;
    let start_y = (height as usize).saturating_sub(box_height) / 2;

    let mut out = stdout();

    queue!(
        out,
        MoveTo(start_x as u16, start_y as u16),
        SetForegroundColor(Color::White),
        Print(format!("┌{}┐", "─".repeat(box_width - 2)))
    )?;

    for (i, line) in lines.iter().enumerate() {
        let y = (start_y + 1 + i) as u16;
        let padding = max_width.saturating_sub(line.chars().count());
        queue!(
            out,
            MoveTo(start_x as u16, y),
            SetForegroundColor(Color::White),
            Print('│'),
            SetForegroundColor(Color::Grey),
            Print(format!(" {}{} ", line, " ".repeat(padding))),
            SetForegroundColor(Color::White),
            Print('│')
        )?;
    }

    queue!(
        out,
        MoveTo(start_x as u16, (start_y + box_height - 1) as u16),
        Print(format!("└{}┘", "─".repeat(box_width - 2))),
        SetAttribute(Attribute::Reset),
        ResetColor
    )?;
    out.flush()
}
