//! Rule kinds and the parsed entry record.

use std::fmt;

/// RuleKind represents the kind of a rule line.
///
/// The set is closed by the file format; every consumer dispatches on it
/// with an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Matches a domain and all of its subdomains
    Domain,
    /// Exact domain match
    Full,
    /// Substring match
    Keyword,
    /// Regular-expression match
    Regexp,
    /// Reference to another list
    Include,
}

impl RuleKind {
    /// Parse a rule kind from its line prefix (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "domain" => Some(RuleKind::Domain),
            "full" => Some(RuleKind::Full),
            "keyword" => Some(RuleKind::Keyword),
            "regexp" => Some(RuleKind::Regexp),
            "include" => Some(RuleKind::Include),
            _ => None,
        }
    }

    /// Get the canonical lower-case prefix used in source files and in the
    /// plain rendering.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::Domain => "domain",
            RuleKind::Full => "full",
            RuleKind::Keyword => "keyword",
            RuleKind::Regexp => "regexp",
            RuleKind::Include => "include",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Entry is one parsed rule line.
///
/// Values and attribute keys are already case-normalized by the lexer:
/// domain/keyword values and attributes are lower-case, include targets and
/// affiliation names upper-case, regexp patterns kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Kind of the rule
    pub kind: RuleKind,
    /// Rule value (domain, pattern, or include target)
    pub value: String,
    /// Attribute keys, sorted ascending, deduplicated
    pub attrs: Vec<String>,
    /// Affiliation targets this entry is additionally routed into
    pub affs: Vec<String>,
    /// Canonical rendering `kind:value[:@a1,@a2,...]`, the deduplication
    /// key. Empty for `Include` entries, which never reach a dedup map.
    pub plain: String,
}

impl Entry {
    /// Build an entry from lexed parts, computing the plain form.
    pub fn new(kind: RuleKind, value: String, attrs: Vec<String>, affs: Vec<String>) -> Self {
        let plain = match kind {
            RuleKind::Include => String::new(),
            _ => render_plain(kind, &value, &attrs),
        };
        Self {
            kind,
            value,
            attrs,
            affs,
            plain,
        }
    }
}

/// Render the canonical plain form of a non-include rule.
pub fn render_plain(kind: RuleKind, value: &str, attrs: &[String]) -> String {
    let mut out = String::with_capacity(value.len() + 16);
    out.push_str(kind.as_str());
    out.push(':');
    out.push_str(value);
    if !attrs.is_empty() {
        out.push(':');
        for (i, attr) in attrs.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push('@');
            out.push_str(attr);
        }
    }
    out
}
