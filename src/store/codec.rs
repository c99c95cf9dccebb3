//! Line codec for the response store file
//!
//! One record per line: `question|answer`. Backslash, the `|` delimiter and
//! line breaks are backslash-escaped on write. On read the record splits at the
//! first unescaped `|`; any later unescaped `|` belongs to the answer, which
//! keeps files written without escaping readable. Unescaped legacy text that
//! happens to contain `\n`, `\r`, `\\` or `\|` is still read as an escape.

/// Field delimiter between question and answer
pub const DELIMITER: char = '|';

const ESCAPE: char = '\\';

/// Escape a single field for storage
pub fn escape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            ESCAPE => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\|"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Encode a record as one line (without the trailing newline)
pub fn encode_record(question: &str, answer: &str) -> String {
    format!("{}{}{}", escape_field(question), DELIMITER, escape_field(answer))
}

/// Decode one line into `(question, answer)`.
///
/// Only the escapes written by [`escape_field`] are decoded; any other
/// backslash is kept as is. Returns `None` when the line carries no
/// unescaped delimiter.
pub fn decode_record(line: &str) -> Option<(String, String)> {
    let mut question = String::new();
    let mut answer = String::new();
    let mut in_answer = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        let target = if in_answer { &mut answer } else { &mut question };
        match c {
            ESCAPE => match chars.next() {
                Some('n') => target.push('\n'),
                Some('r') => target.push('\r'),
                Some(next @ (ESCAPE | DELIMITER)) => target.push(next),
                Some(next) => {
                    target.push(ESCAPE);
                    target.push(next);
                }
                None => target.push(ESCAPE),
            },
            DELIMITER if !in_answer => in_answer = true,
            other => target.push(other),
        }
    }

    if in_answer {
        Some((question, answer))
    } else {
        None
    }
}
