//! Command implementations.

pub mod batch;
pub mod config;
pub mod parse;
pub mod prompt;

pub use self::batch::execute_batch;
pub use self::config::execute_config;
pub use self::parse::execute_parse;
pub use self::prompt::execute_prompt;

use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Request text from an argument, a file or stdin.
pub(crate) fn read_input(text: Option<String>, file: Option<&Path>, stdin: bool) -> Result<String> {
    if stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(path) = file {
        Ok(fs::read_to_string(path)?)
    } else if let Some(text) = text {
        Ok(text)
    } else {
        Err(CliError::InvalidInput(
            "Provide request text, --file or --stdin".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;
    use std::io::Write;

    #[test]
    fn test_read_input_from_text() {
        let text = read_input(Some("50 bags cement".to_string()), None, false).unwrap();
        assert_eq!(text, "50 bags cement");
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "sand\ngravel").unwrap();
        let text = read_input(None, Some(file.path()), false).unwrap();
        assert_eq!(text, "sand\ngravel\n");
    }

    #[test]
    fn test_read_input_requires_a_source() {
        let result = read_input(None, None, false);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
