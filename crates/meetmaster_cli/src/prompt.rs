//! Terminal prompting for record fields.

use meetmaster_core::FieldSource;
use std::io::{self, BufRead, Write};

/// Reads one trimmed line from stdin per prompt.
pub struct StdinFields;

impl FieldSource for StdinFields {
    fn ask(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}: ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("input closed before `{prompt}` was entered"),
            ));
        }
        Ok(line.trim().to_string())
    }
}
