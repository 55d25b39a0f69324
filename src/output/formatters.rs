//! Formatting utilities for terminal output

/// Fixed-width bar for a percentage in `0..=100`
#[must_use]
pub fn percentage_bar(percent: f64, width: usize) -> String {
    // Cast is safe: the ratio is clamped to [0, 1]
    let ratio = (percent / 100.0).clamp(0.0, 1.0);
    let filled = ((ratio * width as f64).round() as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Lay words out in left-aligned columns, `per_row` to a line
#[must_use]
pub fn word_columns(words: &[String], per_row: usize) -> Vec<String> {
    let width = words.iter().map(String::len).max().unwrap_or(0) + 2;
    words
        .chunks(per_row.max(1))
        .map(|row| {
            row.iter()
                .map(|w| format!("{w:<width$}"))
                .collect::<String>()
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Render an optional statistic, `-` when undefined
#[must_use]
pub fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_empty() {
        assert_eq!(percentage_bar(0.0, 10), "░░░░░░░░░░");
    }

    #[test]
    fn bar_full_and_clamped() {
        assert_eq!(percentage_bar(100.0, 10), "██████████");
        assert_eq!(percentage_bar(150.0, 4), "████");
    }

    #[test]
    fn bar_half() {
        assert_eq!(percentage_bar(50.0, 10), "█████░░░░░");
    }

    #[test]
    fn columns_are_padded() {
        let words: Vec<String> = ["cat", "crane", "owl"].iter().map(|w| (*w).to_string()).collect();
        let rows = word_columns(&words, 2);
        assert_eq!(rows, vec!["cat    crane", "owl"]);
    }

    #[test]
    fn optional_values() {
        assert_eq!(optional(Some(3)), "3");
        assert_eq!(optional::<usize>(None), "-");
    }
}
