//! Key reference overlay

use crate::terminal::Terminal;
use crossterm::cursor::MoveTo;
use crossterm::event::KeyCode;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor};
use std::io::{self, stdout, Write};

/// Show a modal help box over the current frame.
/// Returns true if the user asked to quit (q/Esc) while it was open.
pub fn show_help_modal(term: &mut Terminal, help_text: &str) -> io::Result<bool> {
    if help_text.is_empty() {
        return Ok(false);
    }

    let (width, height) = term.size();
    draw_box(width, height, help_text)?;

    loop {
        if let Some(code) = term.wait_key(50)? {
            match code {
                KeyCode::Char('?') => break,
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                _ => {}
            }
        }
    }

    // Put the frame underneath back
    term.render()?;
    Ok(false)
}

/// Box geometry for `help_text`: (x, y, box width, box height)
fn layout(width: u16, height: u16, help_text: &str) -> (usize, usize, usize, usize) {
    let lines = help_text.lines().count();
    let max_width = help_text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    let box_width = max_width + 4;
    let box_height = lines + 2;
    let x = (width as usize).saturating_sub(box_width) / 2;
    let y = (height as usize).saturating_sub(box_height) / 2;
    (x, y, box_width, box_height)
}

fn draw_box(width: u16, height: u16, help_text: &str) -> io::Result<()> {
    let (x0, y0, box_width, box_height) = layout(width, height, help_text);
    let inner = box_width - 4;
    let mut out = stdout();

    queue!(out, SetBackgroundColor(Color::Black), SetForegroundColor(Color::White))?;
    queue!(out, MoveTo(x0 as u16, y0 as u16), Print(format!("┌{}┐", "─".repeat(box_width - 2))))?;

    for (i, line) in help_text.lines().enumerate() {
        let padding = inner.saturating_sub(line.chars().count());
        queue!(
            out,
            MoveTo(x0 as u16, (y0 + 1 + i) as u16),
            SetForegroundColor(Color::White),
            Print('│'),
            SetForegroundColor(Color::Grey),
            Print(format!(" {}{} ", line, " ".repeat(padding))),
            SetForegroundColor(Color::White),
            Print('│'),
        )?;
    }

    queue!(
        out,
        MoveTo(x0 as u16, (y0 + box_height - 1) as u16),
        Print(format!("└{}┘", "─".repeat(box_width - 2)))
    )?;
    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
    out.flush()?;
    Ok(())
}
