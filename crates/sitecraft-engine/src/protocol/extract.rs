//! Locates a single balanced `{ ... }` object literal inside free text.
//!
//! Model replies surround their payload with prose, code fences and partial
//! JSON. The scanner only understands three things: braces, quoted strings
//! (single or double quoted) and backslash escapes inside those strings.
//! Everything inside a string is a raw zone, so a value such as
//! `"use {curly} braces"` never moves the depth counter.

const OPEN: u8 = b'{';
const CLOSE: u8 = b'}';
const ESCAPE: u8 = b'\\';

/// Lexical state of the scanner between two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Outside any string: braces and quotes are significant.
    Code,
    /// Inside a string opened with `quote`.
    Quoted { quote: u8 },
    /// The previous byte was a backslash inside a string opened with `quote`.
    Escape { quote: u8 },
}

/// Returns the first balanced object literal that starts at or after `from`.
///
/// The result spans from the first `{` found through the `}` that brings the
/// depth back to zero, inclusive. Returns `None` when there is no `{`, when
/// the input ends before the object closes, or when `from` is not a valid
/// position in `text`.
pub fn extract_object(text: &str, from: usize) -> Option<&str> {
    let rest = text.get(from..)?;
    let start = from + rest.find(OPEN as char)?;
    let end = scan_object(text.as_bytes(), start)?;
    Some(&text[start..end])
}

/// Scans from the `{` at `start` and returns the exclusive end offset of the
/// matching `}`.
///
/// Works on bytes: every significant character is ASCII, and no byte of a
/// multi-byte UTF-8 sequence can equal an ASCII byte, so the returned offset
/// is always a char boundary.
fn scan_object(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut mode = Mode::Code;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        mode = match mode {
            // Escaped byte is consumed verbatim
            Mode::Escape { quote } => Mode::Quoted { quote },
            Mode::Quoted { quote } if b == ESCAPE => Mode::Escape { quote },
            Mode::Quoted { quote } if b == quote => Mode::Code,
            Mode::Quoted { quote } => Mode::Quoted { quote },
            Mode::Code => match b {
                OPEN => {
                    depth += 1;
                    Mode::Code
                }
                CLOSE => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i + 1);
                    }
                    Mode::Code
                }
                b'"' | b'\'' => Mode::Quoted { quote: b },
                _ => Mode::Code,
            },
        };
    }

    None
}
