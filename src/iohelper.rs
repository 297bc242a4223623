/**
 * Terminal input and output shared by the practice UI and the subcommands.
 *
 * All output goes through `my_print!` and `my_println!`, which return `QuizError::Io`
 * on failure, so a closed pipe ends the program quietly instead of panicking.
 */
use std::fmt;
use std::io::{self, Write};

use colored::*;
use rustyline::error::ReadlineError;

use super::common::{QuizError, Result};

/// Wrapped text is never squeezed narrower than this, however small the terminal.
const MIN_WRAP_WIDTH: usize = 20;

#[macro_export]
macro_rules! my_print {
    ($($arg:tt)*) => ($crate::iohelper::emit(format_args!($($arg)*)));
}

#[macro_export]
macro_rules! my_println {
    () => ($crate::my_print!("\n"));
    ($fmt:expr) => ($crate::my_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::my_print!(concat!($fmt, "\n"), $($arg)*));
}

/// Write to standard output. Used by the printing macros.
pub fn emit(args: fmt::Arguments) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_fmt(args).map_err(QuizError::Io)
}

/// Read a line, trimmed, asking again while the line is blank.
///
/// End of input gives `Ok(None)` and Ctrl+C gives `QuizError::ReadlineInterrupted`.
pub fn prompt(message: &str) -> Result<Option<String>> {
    let mut editor = rustyline::Editor::<()>::new();
    loop {
        match editor.readline(message) {
            Ok(line) => {
                let line = line.trim();
                if !line.is_empty() {
                    return Ok(Some(line.to_string()));
                }
            }
            Err(ReadlineError::Interrupted) => return Err(QuizError::ReadlineInterrupted),
            Err(ReadlineError::Io(e)) => return Err(QuizError::Io(e)),
            Err(_) => return Ok(None),
        }
    }
}

/// Ask a yes-or-no question. Only an answer starting with "y" counts as yes.
pub fn confirm(message: &str) -> bool {
    match prompt(message) {
        Ok(Some(answer)) => answer.to_lowercase().starts_with('y'),
        _ => false,
    }
}

/// Colors for a wrapped paragraph. `None` leaves that part uncolored.
#[derive(Clone, Copy, Default)]
pub struct Style {
    pub prefix: Option<Color>,
    pub text: Option<Color>,
}

impl Style {
    pub fn plain() -> Self {
        Style::default()
    }
}

/// Print `text` wrapped to the terminal width. `prefix` starts the first line and the
/// remaining lines are indented to line up after it.
pub fn print_wrapped(text: &str, prefix: &str, style: Style) -> Result<()> {
    let indent = " ".repeat(prefix.len());
    let lines = wrap_lines(text, prefix.len(), textwrap::termwidth());
    for (i, line) in lines.iter().enumerate() {
        let lead = if i == 0 {
            paint(prefix, style.prefix)
        } else {
            indent.as_str().normal()
        };
        my_println!("{}{}", lead, paint(line, style.text))?;
    }
    Ok(())
}

/// Break `text` into lines that fit a terminal `term_width` columns wide after a
/// prefix of `prefix_len` columns.
fn wrap_lines(text: &str, prefix_len: usize, term_width: usize) -> Vec<String> {
    let width = term_width.saturating_sub(prefix_len).max(MIN_WRAP_WIDTH);
    textwrap::wrap_iter(text, width)
        .map(|line| line.into_owned())
        .collect()
}

fn paint(text: &str, color: Option<Color>) -> ColoredString {
    match color {
        Some(color) => text.color(color),
        None => text.normal(),
    }
}
