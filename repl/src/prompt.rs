//! Line-oriented input helpers.

use std::io::{self, BufRead, Write};

/// Print `prompt`, flush, and read one trimmed line from stdin.
pub fn read_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
    }
    Ok(line.trim().to_string())
}

/// Prompt until the user enters an unsigned number.
pub fn read_u32(prompt: &str) -> io::Result<u32> {
    loop {
        let line = read_line(prompt)?;
        match line.parse() {
            Ok(value) => return Ok(value),
            Err(_) => println!("Please enter a number."),
        }
    }
}

/// Prompt for a single word (no whitespace), retrying on empty input.
pub fn read_word(prompt: &str) -> io::Result<String> {
    loop {
        let line = read_line(prompt)?;
        match line.split_whitespace().next() {
            Some(word) => return Ok(word.to_string()),
            None => println!("Please enter a value."),
        }
    }
}
