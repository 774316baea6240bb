//! Command implementations.

pub mod analyze;
pub mod config;
pub mod parse;

pub use self::analyze::execute_analyze;
pub use self::config::execute_config;
pub use self::parse::execute_parse;

use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, Read};

/// Read document text from a file, or from stdin when `input` is "-".
pub fn read_input(input: &str) -> Result<String> {
    let text = if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    if text.trim().is_empty() {
        return Err(CliError::InvalidInput("Input document is empty".to_string()));
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "PAGE 1:\n1-2 10 & Under 50 Free").unwrap();

        let text = read_input(file.path().to_str().unwrap()).unwrap();
        assert!(text.starts_with("PAGE 1:"));
    }

    #[test]
    fn test_empty_file_rejected() {
        let file = NamedTempFile::new().unwrap();
        let err = read_input(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, CliError::InvalidInput(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = read_input("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
    }
}
