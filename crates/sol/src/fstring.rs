//! Interpolated-string templates.
//!
//! A double-quoted Sol string is a template of literal fragments interleaved
//! with `{slot}` interpolations. Slots hold the textual name of a variable,
//! optionally followed by `|`-path components; arbitrary expressions are
//! rejected at parse time. The lexer captures the raw template text and the
//! parser splits it into [`FStringPart`]s here.

/// One piece of an interpolated string template.
#[derive(Debug, Clone, PartialEq)]
pub enum FStringPart {
    /// Literal text, emitted as-is.
    Literal(String),
    /// An interpolation slot, evaluated against the current scope.
    Slot(Slot),
}

/// An interpolation slot: a variable name plus an optional `|`-path.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
    /// The original slot text including braces, rendered verbatim when the
    /// variable is unbound.
    pub raw: String,
    /// The variable name to look up.
    pub name: String,
    /// Path components applied to the variable's value.
    pub segments: Vec<SlotSegment>,
}

/// One `|`-path component inside a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotSegment {
    /// A literal dict key.
    Key(String),
    /// A 1-based array index (also usable as a coerced dict key).
    Index(i64),
}

/// Splits raw double-quoted string text into template parts.
///
/// Escape sequences are processed here (the lexer keeps the text raw so that
/// `\{` can still suppress a slot). Returns an error message for malformed
/// slots; the caller attaches the source line.
pub fn parse_template(raw: &str) -> Result<Vec<FStringPart>, String> {
    let mut parts = Vec::new();
    let mut literal = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => literal.push(unescape(chars.next())),
            '{' => {
                let slot = scan_slot(&mut chars)?;
                if !literal.is_empty() {
                    parts.push(FStringPart::Literal(std::mem::take(&mut literal)));
                }
                parts.push(FStringPart::Slot(slot));
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() || parts.is_empty() {
        parts.push(FStringPart::Literal(literal));
    }
    Ok(parts)
}

/// Returns true when every part is literal text (the template has no slots).
#[must_use]
pub fn is_literal(parts: &[FStringPart]) -> bool {
    parts.iter().all(|part| matches!(part, FStringPart::Literal(_)))
}

/// Joins a slot-free template back into plain text.
///
/// Callers must check [`is_literal`] first; slot parts are skipped.
#[must_use]
pub fn literal_text(parts: &[FStringPart]) -> String {
    let mut text = String::new();
    for part in parts {
        if let FStringPart::Literal(fragment) = part {
            text.push_str(fragment);
        }
    }
    text
}

fn unescape(escaped: Option<char>) -> char {
    match escaped {
        Some('n') => '\n',
        Some('t') => '\t',
        Some('r') => '\r',
        // unknown escapes keep the escaped character, matching single-quoted strings
        Some(other) => other,
        // a trailing backslash cannot occur: the lexer would have kept scanning
        None => '\\',
    }
}

/// Scans one slot after the opening `{`, validating the slot grammar:
/// an identifier followed by zero or more `|ident` or `|number` components.
fn scan_slot(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Slot, String> {
    let mut inner = String::new();
    loop {
        match chars.next() {
            Some('}') => break,
            Some('{') => return Err("nested braces are not allowed in interpolation slots".to_owned()),
            Some(ch) => inner.push(ch),
            None => return Err("unclosed interpolation slot".to_owned()),
        }
    }

    let raw = format!("{{{inner}}}");
    let mut pieces = inner.split('|');
    let name = pieces.next().unwrap_or_default().trim().to_owned();
    if !is_identifier(&name) {
        return Err(format!(
            "interpolation slots hold a variable name and optional '|' path, got '{inner}'"
        ));
    }

    let mut segments = Vec::new();
    for piece in pieces {
        let piece = piece.trim();
        if let Ok(index) = piece.parse::<i64>() {
            segments.push(SlotSegment::Index(index));
        } else if is_identifier(piece) {
            segments.push(SlotSegment::Key(piece.to_owned()));
        } else {
            return Err(format!("invalid path component '{piece}' in interpolation slot"));
        }
    }

    Ok(Slot { raw, name, segments })
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }
    let rest: Vec<char> = chars.collect();
    for (i, ch) in rest.iter().enumerate() {
        let is_last = i == rest.len() - 1;
        let ok = ch.is_ascii_alphanumeric() || *ch == '_' || (*ch == '\'' && is_last);
        if !ok {
            return false;
        }
    }
    true
}
