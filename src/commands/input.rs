//! Word list input for batch commands

use std::fs;
use std::io;
use std::path::Path;

/// Words from the command line plus an optional newline-delimited file
///
/// Blank lines and surrounding whitespace are dropped; validation is left
/// to the store so rejected entries can be reported.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read.
pub fn collect_words<P: AsRef<Path>>(args: &[String], file: Option<P>) -> io::Result<Vec<String>> {
    let mut words: Vec<String> = args
        .iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();

    if let Some(path) = file {
        let content = fs::read_to_string(path)?;
        words.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn args_only() {
        let words = collect_words::<&Path>(&["cat".into(), "  ".into(), " dog ".into()], None).unwrap();
        assert_eq!(words, vec!["cat", "dog"]);
    }

    #[test]
    fn args_and_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "owl\n\n  emu  ").unwrap();

        let words = collect_words(&["cat".into()], Some(file.path())).unwrap();
        assert_eq!(words, vec!["cat", "owl", "emu"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(collect_words(&[], Some("/nonexistent/words.txt")).is_err());
    }
}
