//! Result normalization - turns engine output into clean text
//!
//! Nothing in this module fails: unexpected shapes and malformed escapes
//! degrade to a best-effort string.

use crate::core::{SourceKind, TaskOutput, TaskResult};

const RAW_TUPLE_PREFIX: &str = "('raw', '";
const RAW_TUPLE_SUFFIX: &str = "')";

/// Pick the body of a task output
///
/// Precedence: a non-empty `raw`, then `result`, then `output`, then the
/// full string conversion of the object.
pub fn normalize(output: &TaskOutput) -> (String, SourceKind) {
    if let Some(raw) = output.raw.as_deref().filter(|r| !r.is_empty()) {
        return (raw.to_string(), SourceKind::Raw);
    }
    if let Some(result) = &output.result {
        return (result.clone(), SourceKind::Result);
    }
    if let Some(text) = &output.output {
        return (text.clone(), SourceKind::Output);
    }
    (output.to_string(), SourceKind::Stringified)
}

/// Normalize a task output and resolve its agent and task names
pub fn resolve(output: &TaskOutput) -> TaskResult {
    let (body, source_kind) = normalize(output);
    TaskResult {
        agent_name: output
            .agent
            .as_deref()
            .map(|a| a.trim().replace('\n', " "))
            .filter(|a| !a.is_empty()),
        task_name: output.name.clone().filter(|n| !n.is_empty()),
        body,
        source_kind,
    }
}

/// Reverse common escaping artifacts
///
/// Literal `\n`, `\"` and `\'` are replaced first. If the result then looks
/// like a stringified `('raw', '<payload>')` tuple, the payload is extracted
/// and unicode escapes in it are decoded; when decoding fails the extracted
/// payload is kept as is.
pub fn clean(text: &str) -> String {
    let text = text
        .replace("\\n", "\n")
        .replace("\\\"", "\"")
        .replace("\\'", "'");

    match unwrap_raw_tuple(&text) {
        Some(payload) => decode_unicode_escapes(payload).unwrap_or_else(|| payload.to_string()),
        None => text,
    }
}

/// Payload of a `('raw', '<payload>')` string, if the text has that shape
///
/// An empty payload does not match.
pub fn unwrap_raw_tuple(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(RAW_TUPLE_PREFIX)?;
    let payload = inner.strip_suffix(RAW_TUPLE_SUFFIX)?;
    if payload.is_empty() {
        None
    } else {
        Some(payload)
    }
}

/// Decode backslash escapes the way a Latin-1 `unicode_escape` pass does
///
/// Returns `None` when the text holds a character above U+00FF or a
/// malformed escape. Named `\N{...}` escapes are not supported and also
/// yield `None`. Unknown escapes are kept verbatim.
pub fn decode_unicode_escapes(text: &str) -> Option<String> {
    if text.chars().any(|c| u32::from(c) > 0xFF) {
        return None;
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next()? {
            '\n' => {}
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'v' => out.push('\u{0B}'),
            first @ '0'..='7' => {
                let mut value = first.to_digit(8)?;
                for _ in 0..2 {
                    match chars.peek().and_then(|d| d.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                out.push(char::from_u32(value)?);
            }
            'x' => out.push(read_hex(&mut chars, 2)?),
            'u' => out.push(read_hex(&mut chars, 4)?),
            'U' => out.push(read_hex(&mut chars, 8)?),
            'N' => return None,
            other => {
                out.push('\\');
                out.push(other);
            }
        }
    }

    Some(out)
}

fn read_hex(chars: &mut impl Iterator<Item = char>, digits: usize) -> Option<char> {
    let mut value: u32 = 0;
    for _ in 0..digits {
        value = value.checked_mul(16)? + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
