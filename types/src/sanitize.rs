//! Terminal-safe rendering of text that originates outside the shell.
//!
//! Display names, emails, backend diagnostics and typed paths are untrusted:
//! an embedded escape sequence could rewrite the screen or set the clipboard.
//! Everything here renders on a single line, so line breaks and tabs collapse
//! to spaces.

use std::borrow::Cow;
use std::iter::Peekable;

const ESC: char = '\x1b';
const BEL: char = '\x07';
const C1_CSI: char = '\u{009b}';

/// Strip escape sequences and control characters; collapse whitespace controls.
#[must_use]
pub fn sanitize_terminal_text(input: &str) -> Cow<'_, str> {
    if !input.chars().any(is_control) {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            ESC => skip_escape(&mut chars),
            C1_CSI => skip_csi(&mut chars),
            '\n' | '\r' | '\t' => {
                if !out.ends_with(' ') {
                    out.push(' ');
                }
            }
            c if is_control(c) => {}
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn is_control(c: char) -> bool {
    c <= '\x1f' || c == '\x7f' || ('\u{0080}'..='\u{009f}').contains(&c)
}

fn skip_escape<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    match chars.peek() {
        Some('[') => {
            chars.next();
            skip_csi(chars);
        }
        Some(']' | 'P' | '^' | '_') => {
            chars.next();
            // String sequences end at BEL or ST (ESC \).
            while let Some(c) = chars.next() {
                if c == BEL {
                    return;
                }
                if c == ESC && chars.peek() == Some(&'\\') {
                    chars.next();
                    return;
                }
            }
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

fn skip_csi<I: Iterator<Item = char>>(chars: &mut Peekable<I>) {
    while let Some(&c) = chars.peek() {
        chars.next();
        if ('\x40'..='\x7e').contains(&c) {
            return;
        }
        if !('\x20'..='\x3f').contains(&c) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::sanitize_terminal_text;

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(
            sanitize_terminal_text("ada@example.com"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn strips_csi_and_osc() {
        assert_eq!(sanitize_terminal_text("a\x1b[2Jb"), "ab");
        assert_eq!(sanitize_terminal_text("x\x1b]52;c;ZXZpbA==\x07y"), "xy");
        assert_eq!(sanitize_terminal_text("x\x1b]8;;http://e\x1b\\y"), "xy");
    }

    #[test]
    fn collapses_line_breaks() {
        assert_eq!(sanitize_terminal_text("one\n\ntwo\tthree"), "one two three");
    }

    #[test]
    fn drops_other_controls() {
        assert_eq!(sanitize_terminal_text("bell\x07\x7f"), "bell");
        assert_eq!(sanitize_terminal_text("c1\u{009b}31mred"), "c1red");
    }
}
