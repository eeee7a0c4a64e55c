//! Stack trace parsing for V8 and Gecko/WebKit formats

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

// `    at fn (file:line:col)` or `    at file:line:col`
const V8_FRAME: &str = r"^\s*at (?:(.*?) \()?(.+?):(\d+):(\d+)\)?\s*$";
// `fn@file:line:col`, `@file:line:col` or bare `file:line:col`
const GECKO_FRAME: &str = r"^\s*(?:([^@]*)@)?(.+?):(\d+):(\d+)\s*$";

fn v8_frame() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(V8_FRAME).ok()).as_ref()
}

fn gecko_frame() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(GECKO_FRAME).ok()).as_ref()
}

/// One parsed stack frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    pub function_name: Option<String>,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
    pub column_number: Option<u32>,
}

fn is_v8_line(line: &str) -> bool {
    line.trim_start().starts_with("at ")
}

fn parse_line(pattern: &Regex, line: &str) -> Option<StackFrame> {
    let caps = pattern.captures(line)?;
    let function_name = caps
        .get(1)
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string);

    Some(StackFrame {
        function_name,
        file_name: caps.get(2).map(|m| m.as_str().to_string()),
        line_number: caps.get(3).and_then(|m| m.as_str().parse().ok()),
        column_number: caps.get(4).and_then(|m| m.as_str().parse().ok()),
    })
}

/// Frames of a stack trace, top first.
///
/// The format is decided once per trace: any `at ` line marks a V8 stack,
/// and then only `at ` lines are frames. The message line of a V8 stack is
/// never read as a Gecko frame.
fn frames(stack: &str) -> impl Iterator<Item = StackFrame> + '_ {
    let v8 = stack.lines().any(is_v8_line);
    let pattern = if v8 { v8_frame() } else { gecko_frame() };

    stack
        .lines()
        .filter(move |line| !v8 || is_v8_line(line))
        .filter_map(move |line| parse_line(pattern?, line))
}

/// Parse every recognisable frame of a stack trace, top first
pub fn parse_stack(stack: &str) -> Vec<StackFrame> {
    frames(stack).collect()
}

/// The top frame of a stack trace, if any line parses
pub fn top_frame(stack: &str) -> Option<StackFrame> {
    frames(stack).next()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_v8_frame_with_function() {
        let stack = "TypeError: x is undefined\n    at render (http://a.com/app.js:10:5)\n    at http://a.com/vendor.js:1:200";
        let frames = parse_stack(stack);
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].function_name.as_deref(), Some("render"));
        assert_eq!(frames[0].file_name.as_deref(), Some("http://a.com/app.js"));
        assert_eq!(frames[0].line_number, Some(10));
        assert_eq!(frames[0].column_number, Some(5));
        assert_eq!(frames[1].function_name, None);
        assert_eq!(frames[1].file_name.as_deref(), Some("http://a.com/vendor.js"));
    }

    #[test]
    fn parses_port_in_file_url() {
        let frame = top_frame("Error\n    at main (http://localhost:8080/main.js:3:14)").unwrap();
        assert_eq!(frame.file_name.as_deref(), Some("http://localhost:8080/main.js"));
        assert_eq!(frame.line_number, Some(3));
        assert_eq!(frame.column_number, Some(14));
    }

    #[test]
    fn parses_gecko_frame() {
        let frame = top_frame("render@http://a.com/app.js:7:21\n@http://a.com/app.js:1:1").unwrap();
        assert_eq!(frame.function_name.as_deref(), Some("render"));
        assert_eq!(frame.file_name.as_deref(), Some("http://a.com/app.js"));
        assert_eq!(frame.line_number, Some(7));
        assert_eq!(frame.column_number, Some(21));
    }

    #[test]
    fn v8_message_with_clock_time_is_not_a_frame() {
        let stack = "Error: job stalled at 12:30:45\n    at run (https://a.com/app.js:10:5)";

        let frame = top_frame(stack).unwrap();
        assert_eq!(frame.function_name.as_deref(), Some("run"));
        assert_eq!(frame.file_name.as_deref(), Some("https://a.com/app.js"));
        assert_eq!(frame.line_number, Some(10));
        assert_eq!(frame.column_number, Some(5));
        assert_eq!(parse_stack(stack).len(), 1);
    }

    #[test]
    fn garbage_has_no_frames() {
        assert!(parse_stack("not a stack trace").is_empty());
        assert!(top_frame("").is_none());
    }
}
