//! Log formatting and output with ANSI colors and text wrapping
//!
//! Handles:
//! - Colorized console output with tag and level formatting
//! - Text wrapping at word boundaries
//! - Dual output (console + file)
//! - Broken pipe handling for piped commands

use super::file::write_to_file;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stdout, ErrorKind, Write};

/// Log format widths for alignment
const TAG_WIDTH: usize = 10;
const LOG_TYPE_WIDTH: usize = 8;
const BRACKET_SPACE_WIDTH: usize = 3;
const TOTAL_PREFIX_WIDTH: usize = TAG_WIDTH + LOG_TYPE_WIDTH + BRACKET_SPACE_WIDTH * 2;

/// Maximum line length before wrapping
const MAX_LINE_LENGTH: usize = 145;

/// Format and output a log message
pub fn format_and_log(tag: LogTag, log_type: &str, message: &str) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string();
    let prefix = format!("{} ", time).dimmed().to_string();

    let base_line = format!(
        "{}[{}] [{}] ",
        prefix,
        format_tag(&tag),
        format_log_type(log_type)
    );

    let base_length = strip_ansi_codes(&base_line)
        .len()
        .max(TOTAL_PREFIX_WIDTH + time.len() + 1);
    let available_space = if MAX_LINE_LENGTH > base_length {
        MAX_LINE_LENGTH - base_length
    } else {
        50
    };

    let chunks = wrap_text(message, available_space);
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_clean = tag.to_plain_string();
    let continuation_prefix = " ".repeat(base_length);

    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            print_stdout_safe(&format!("{}{}", base_line, chunk));
        } else {
            print_stdout_safe(&format!("{}{}", continuation_prefix, chunk));
        }
        write_to_file(&format!(
            "{} [{}] [{}] {}",
            timestamp, tag_clean, log_type, chunk
        ));
    }
}

/// Format a tag with its color
fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Hub => label.bright_magenta().bold(),
        LogTag::Connection => label.bright_cyan().bold(),
        LogTag::Client => label.bright_blue().bold(),
        LogTag::Webserver => label.bright_green().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

/// Format log type with its color
fn format_log_type(log_type: &str) -> ColoredString {
    let label = format!("{:<width$}", log_type, width = LOG_TYPE_WIDTH);
    match log_type {
        "ERROR" => label.bright_red().bold(),
        "WARNING" => label.bright_yellow().bold(),
        _ => label.white().bold(),
    }
}

/// Print to stdout but ignore broken pipe errors
fn print_stdout_safe(message: &str) {
    let mut out = stdout().lock();
    if let Err(e) = writeln!(out, "{}", message).and_then(|_| out.flush()) {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(std::io::stderr(), "Logger stdout error: {}", e);
    }
}

/// Remove ANSI color codes from text
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::new();
    let mut in_escape = false;

    for ch in text.chars() {
        if ch == '\x1b' {
            in_escape = true;
        } else if in_escape && ch == 'm' {
            in_escape = false;
        } else if !in_escape {
            result.push(ch);
        }
    }
    result
}

/// Wrap text at word boundaries, respecting existing newlines
///
/// Words longer than `max_width` are split on character boundaries.
fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut result = Vec::new();

    for line in text.split('\n') {
        if line.chars().count() <= max_width {
            result.push(line.to_string());
            continue;
        }

        let mut current = String::new();
        for word in line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();

            if word_len > max_width {
                if !current.is_empty() {
                    result.push(std::mem::take(&mut current));
                }
                let chars: Vec<char> = word.chars().collect();
                for piece in chars.chunks(max_width) {
                    result.push(piece.iter().collect());
                }
            } else if current.is_empty() {
                current = word.to_string();
            } else if current_len + word_len + 1 <= max_width {
                current.push(' ');
                current.push_str(word);
            } else {
                result.push(std::mem::replace(&mut current, word.to_string()));
            }
        }

        if !current.is_empty() {
            result.push(current);
        }
    }

    if result.is_empty() {
        result.push(String::new());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        let colored = "\x1b[1;32mHUB\x1b[0m done";
        assert_eq!(strip_ansi_codes(colored), "HUB done");
    }

    #[test]
    fn test_wrap_short_line_untouched() {
        assert_eq!(wrap_text("hello world", 40), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_at_word_boundaries() {
        let wrapped = wrap_text("one two three four", 9);
        assert_eq!(wrapped, vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_wrap_splits_long_words() {
        let wrapped = wrap_text("abcdefghij", 4);
        assert_eq!(wrapped, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        let wrapped = wrap_text("first\nsecond", 40);
        assert_eq!(wrapped, vec!["first", "second"]);
    }
}
