//! Line-oriented prompting and input validation. Every numeric field is
//! validated the moment it is entered, and only that field is re-prompted on
//! failure, so a typo three prompts into a flow never throws away the earlier
//! answers. The parse functions are kept free of I/O so they can be tested
//! directly.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use thiserror::Error;

/// Rejections for a single numeric field. These never escape a flow; the
/// prompt loops print them and ask again.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input. Please check your data types and try again.")]
    NotANumber,
    #[error("{0} cannot be zero or a negative number. Please try again.")]
    NonPositiveId(&'static str),
    #[error("The quantity cannot be a negative number. Please try again.")]
    NegativeQuantity,
}

/// Parse an identifier field: an integer strictly greater than zero. The
/// `field` label names the offending field in the rejection message.
pub fn parse_id(raw: &str, field: &'static str) -> Result<i64, InputError> {
    let value: i64 = raw.trim().parse().map_err(|_| InputError::NotANumber)?;
    if value <= 0 {
        return Err(InputError::NonPositiveId(field));
    }
    Ok(value)
}

/// Parse a quantity: an integer greater than or equal to zero.
pub fn parse_qty(raw: &str) -> Result<i64, InputError> {
    let value: i64 = raw.trim().parse().map_err(|_| InputError::NotANumber)?;
    if value < 0 {
        return Err(InputError::NegativeQuantity);
    }
    Ok(value)
}

/// Normalize a country name on entry: first character uppercased, the rest
/// lowercased.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

/// Print a prompt (no trailing newline) and read one line of input. Running
/// out of input is a fault, not a validation failure: the terminal went away,
/// so the process should too.
pub fn read_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    write!(output, "{prompt}").context("failed to write prompt")?;
    output.flush().context("failed to flush prompt")?;

    let mut line = String::new();
    let read = input.read_line(&mut line).context("failed to read input")?;
    if read == 0 {
        return Err(anyhow!("input stream closed"));
    }
    Ok(line.trim_end_matches(['\n', '\r']).to_string())
}

/// Prompt for an identifier until a valid one is entered.
pub fn prompt_id<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
    field: &'static str,
) -> Result<i64> {
    loop {
        let raw = read_line(input, output, prompt)?;
        match parse_id(&raw, field) {
            Ok(id) => return Ok(id),
            Err(err) => writeln!(output, "{err}").context("failed to write rejection")?,
        }
    }
}

/// Prompt for a quantity until a valid one is entered.
pub fn prompt_qty<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<i64> {
    loop {
        let raw = read_line(input, output, prompt)?;
        match parse_qty(&raw) {
            Ok(qty) => return Ok(qty),
            Err(err) => writeln!(output, "{err}").context("failed to write rejection")?,
        }
    }
}

/// Prompt for free text. Anything, including an empty line, is accepted.
pub fn prompt_text<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<String> {
    read_line(input, output, prompt)
}

/// Prompt until the operator answers `y` or `n` (case-insensitive).
pub fn prompt_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool> {
    loop {
        let raw = read_line(input, output, prompt)?;
        match raw.trim().to_lowercase().as_str() {
            "y" => return Ok(true),
            "n" => return Ok(false),
            _ => writeln!(output, "Please answer y or n.").context("failed to write rejection")?,
        }
    }
}
