//! Line lexer and validator for site list source files.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::entry::{Entry, RuleKind};
use crate::error::ParseError;

/// Charset for domain, full and keyword values (after lower-casing).
static VALUE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9.-]+$").unwrap());

/// Charset for attribute keys (after lower-casing).
static ATTR_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9!-]+$").unwrap());

/// Charset for list names, include targets and affiliations (after
/// upper-casing).
static NAME_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z0-9!-]+$").unwrap());

/// Check an already upper-cased list name against the list-name charset.
pub fn is_valid_list_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Strip a `#` comment from a line.
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    }
}

/// Lex one source line.
///
/// Returns `Ok(None)` for blank and comment-only lines, `Ok(Some(entry))`
/// for a rule, and an error for malformed input. The caller supplies file
/// and line context when wrapping the error.
pub fn lex_line(line: &str) -> Result<Option<Entry>, ParseError> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut tokens = line.split_whitespace();
    let spec = match tokens.next() {
        Some(spec) => spec,
        None => return Ok(None),
    };
    let (kind, value) = parse_spec(spec)?;

    let mut attrs = Vec::new();
    let mut affs = Vec::new();
    for token in tokens {
        if let Some(attr) = token.strip_prefix('@') {
            attrs.push(parse_attribute(attr, kind)?);
        } else if let Some(aff) = token.strip_prefix('&') {
            if kind == RuleKind::Include {
                return Err(ParseError::AffiliationOnInclude(token.to_string()));
            }
            affs.push(parse_affiliation(aff)?);
        } else {
            return Err(ParseError::InvalidDecorator(token.to_string()));
        }
    }

    attrs.sort();
    attrs.dedup();

    Ok(Some(Entry::new(kind, value, attrs, affs)))
}

/// Parse the leading `[kind:]value` token.
fn parse_spec(spec: &str) -> Result<(RuleKind, String), ParseError> {
    let (prefix, rest) = match spec.split_once(':') {
        None => {
            let value = spec.to_ascii_lowercase();
            validate_value(&value)?;
            return Ok((RuleKind::Domain, value));
        }
        Some(parts) => parts,
    };

    let kind = RuleKind::parse(prefix).ok_or_else(|| ParseError::InvalidType(prefix.to_string()))?;
    match kind {
        RuleKind::Regexp => {
            // Pattern case is preserved; it only has to compile.
            Regex::new(rest)?;
            Ok((kind, rest.to_string()))
        }
        RuleKind::Include => {
            let name = rest.to_ascii_uppercase();
            if !NAME_PATTERN.is_match(&name) {
                return Err(ParseError::InvalidIncludeName(rest.to_string()));
            }
            Ok((kind, name))
        }
        _ => {
            let value = rest.to_ascii_lowercase();
            validate_value(&value)?;
            Ok((kind, value))
        }
    }
}

fn validate_value(value: &str) -> Result<(), ParseError> {
    if !VALUE_PATTERN.is_match(value) {
        return Err(ParseError::InvalidDomain(value.to_string()));
    }
    Ok(())
}

fn parse_attribute(attr: &str, kind: RuleKind) -> Result<String, ParseError> {
    let attr = attr.to_ascii_lowercase();
    // On include lines a leading `-` marks a negative filter; the key
    // after it must still satisfy the attribute charset.
    if kind == RuleKind::Include {
        if let Some(key) = attr.strip_prefix('-') {
            if key.is_empty() || !ATTR_PATTERN.is_match(key) {
                return Err(ParseError::InvalidAttribute(attr));
            }
            return Ok(attr);
        }
    }
    if !ATTR_PATTERN.is_match(&attr) {
        return Err(ParseError::InvalidAttribute(attr));
    }
    Ok(attr)
}

fn parse_affiliation(aff: &str) -> Result<String, ParseError> {
    let name = aff.to_ascii_uppercase();
    if !NAME_PATTERN.is_match(&name) {
        return Err(ParseError::InvalidAffiliation(aff.to_string()));
    }
    Ok(name)
}
