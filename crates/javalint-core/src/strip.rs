//! Comment and string-literal stripping.
//!
//! [`strip`] removes everything a lexical pattern must never match:
//!
//! - `/* ... */` block comments are deleted with their delimiters. Line
//!   breaks inside them are kept so later rows do not move.
//! - `// ...` line comments are deleted up to, not including, the line
//!   terminator.
//! - String, char and text-block literal contents are blanked with spaces,
//!   keeping the quotes and the line length.
//!
//! Block comments do not nest: the first `*/` closes the comment.

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str,
    Char,
    TextBlock,
}

/// Strips comments and literal contents from Java source.
#[must_use]
pub fn strip(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::LineComment;
                }
                '/' if chars.peek() == Some(&'*') => {
                    chars.next();
                    state = State::BlockComment;
                }
                '"' => {
                    out.push('"');
                    if text_block_opens(&mut chars) {
                        out.push_str("\"\"");
                        state = State::TextBlock;
                    } else {
                        state = State::Str;
                    }
                }
                '\'' => {
                    out.push('\'');
                    state = State::Char;
                }
                _ => out.push(c),
            },
            State::LineComment => match c {
                '\n' => {
                    out.push('\n');
                    state = State::Code;
                }
                '\r' => out.push('\r'),
                _ => {}
            },
            State::BlockComment => match c {
                '*' if chars.peek() == Some(&'/') => {
                    chars.next();
                    state = State::Code;
                }
                '\n' | '\r' => out.push(c),
                _ => {}
            },
            State::Str | State::Char => {
                let quote = if state == State::Str { '"' } else { '\'' };
                match c {
                    '\\' => {
                        out.push(' ');
                        if let Some(&next) = chars.peek() {
                            if next != '\n' {
                                chars.next();
                                out.push(' ');
                            }
                        }
                    }
                    '\n' => {
                        // Unterminated literal; resume scanning code on the next line.
                        out.push('\n');
                        state = State::Code;
                    }
                    _ if c == quote => {
                        out.push(quote);
                        state = State::Code;
                    }
                    _ => out.push(' '),
                }
            }
            State::TextBlock => match c {
                '"' if text_block_opens(&mut chars) => {
                    out.push_str("\"\"\"");
                    state = State::Code;
                }
                '\\' => {
                    out.push(' ');
                    if let Some(&next) = chars.peek() {
                        if next != '\n' {
                            chars.next();
                            out.push(' ');
                        }
                    }
                }
                '\n' | '\r' => out.push(c),
                _ => out.push(' '),
            },
        }
    }

    out
}

/// After a `"`, consumes the two further quotes of a `"""` delimiter.
///
/// Leaves the iterator untouched unless both quotes are present. An empty
/// string literal `""` is not a text block.
fn text_block_opens(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    let mut lookahead = chars.clone();
    if lookahead.next() == Some('"') && lookahead.next() == Some('"') {
        chars.next();
        chars.next();
        true
    } else {
        false
    }
}
