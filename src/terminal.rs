//! Crossterm cell buffer with diffed redraws

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode, KeyModifiers},
    execute, queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Size used when stdout is not a terminal (print mode in pipes)
const FALLBACK_SIZE: (u16, u16) = (100, 40);

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    /// What is currently on screen, for diffing in `present`
    shown: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
            bold: false,
        }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = if alternate_screen {
            size()?
        } else {
            size().unwrap_or(FALLBACK_SIZE)
        };

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self {
            width,
            height,
            buffer: blank(width, height),
            shown: Vec::new(),
            alternate_screen,
        })
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Follow a terminal resize; the next `present` repaints everything
    pub fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.buffer = blank(width, height);
        self.shown.clear();
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&mut self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        self.shown.clear();
        Ok(())
    }

    /// Set a character at position with optional color
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bold: bool) {
        self.set_with_bg(x, y, ch, fg, None, bold);
    }

    /// Set a character with both foreground and background colors
    pub fn set_with_bg(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bg: Option<Color>, bold: bool) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bg, bold };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>, bold: bool) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, bold);
        }
    }

    /// Write the cells that changed since the last call
    pub fn present(&mut self) -> io::Result<()> {
        let mut out = stdout();
        let full = self.shown.len() != self.buffer.len();

        for (y, row) in self.buffer.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                if !full && self.shown[y].get(x) == Some(cell) {
                    continue;
                }
                queue!(out, MoveTo(x as u16, y as u16))?;
                queue_cell(&mut out, cell)?;
            }
        }

        out.flush()?;
        self.shown = self.buffer.clone();
        Ok(())
    }

    /// Repaint the whole buffer, ignoring what is on screen
    pub fn render(&mut self) -> io::Result<()> {
        self.shown.clear();
        self.present()
    }

    /// Check for keypress (non-blocking), returns (code, modifiers)
    pub fn check_key(&self) -> io::Result<Option<(KeyCode, KeyModifiers)>> {
        if poll(Duration::from_millis(0))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some((key_event.code, key_event.modifiers)));
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

    /// Print buffer to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) {
        for row in &self.buffer {
            for cell in row {
                if cell.ch == ' ' && cell.bg.is_none() {
                    print!(" ");
                    continue;
                }

                if cell.bold {
                    print!("\x1b[1m");
                }
                if let Some(Color::Rgb { r, g, b }) = cell.fg {
                    print!("\x1b[38;2;{};{};{}m", r, g, b);
                }
                if let Some(Color::Rgb { r, g, b }) = cell.bg {
                    print!("\x1b[48;2;{};{};{}m", r, g, b);
                }

                print!("{}", cell.ch);
                print!("\x1b[0m");
            }
            println!();
        }
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}

fn blank(width: u16, height: u16) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); width as usize]; height as usize]
}

fn queue_cell(out: &mut impl Write, cell: &Cell) -> io::Result<()> {
    if cell.bold {
        queue!(out, SetAttribute(Attribute::Bold))?;
    }
    queue!(
        out,
        SetForegroundColor(cell.fg.unwrap_or(Color::Reset)),
        SetBackgroundColor(cell.bg.unwrap_or(Color::Reset)),
        Print(cell.ch)
    )?;
    if cell.bold {
        queue!(out, SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}
