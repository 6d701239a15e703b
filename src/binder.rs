//! Binder: turns loaded lists into parsed lists with inclusion records.

use ahash::AHashMap;

use crate::entry::{Entry, RuleKind};
use crate::loader::RawList;

/// A resolved `include:` directive with its attribute filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    /// Upper-cased name of the included list
    pub source: String,
    /// Attributes an included entry must carry
    pub must: Vec<String>,
    /// Attributes an included entry must not carry
    pub ban: Vec<String>,
}

impl Inclusion {
    fn from_entry(entry: &Entry) -> Self {
        let mut must = Vec::new();
        let mut ban = Vec::new();
        for attr in &entry.attrs {
            match attr.strip_prefix('-') {
                Some(key) => ban.push(key.to_string()),
                None => must.push(attr.clone()),
            }
        }
        Self {
            source: entry.value.clone(),
            must,
            ban,
        }
    }

    /// Attribute filter for entries flattened out of `source`.
    ///
    /// An unfiltered inclusion accepts everything. An attribute-free entry
    /// passes only a filter with no `must` set. Otherwise every `must`
    /// attribute has to be present and no `ban` attribute may be.
    pub fn accepts(&self, entry: &Entry) -> bool {
        if self.must.is_empty() && self.ban.is_empty() {
            return true;
        }
        if entry.attrs.is_empty() {
            return self.must.is_empty();
        }
        self.must.iter().all(|m| entry.attrs.contains(m))
            && !self.ban.iter().any(|b| entry.attrs.contains(b))
    }
}

/// A bound list: direct entries plus inclusion records, keyed by name in
/// the bound-list map.
#[derive(Debug)]
pub struct ParsedList {
    /// Upper-cased list name
    pub name: String,
    /// Direct entries, plus entries routed here by affiliation
    pub entries: Vec<Entry>,
    /// Include directives in source order
    pub inclusions: Vec<Inclusion>,
}

impl ParsedList {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            inclusions: Vec::new(),
        }
    }
}

/// Bind all loaded lists into the bound-list map.
///
/// `include:` entries become [`Inclusion`] records. Affiliated entries are
/// additionally appended to each `&` target, creating the target list if no
/// file of that name exists. Affiliations carry no filter and need no
/// resolution, so they are finished here at bind time.
pub fn bind(raw_lists: Vec<RawList>) -> AHashMap<String, ParsedList> {
    let mut bound: AHashMap<String, ParsedList> = AHashMap::with_capacity(raw_lists.len());

    for raw in raw_lists {
        // An empty file still names a list.
        bound
            .entry(raw.name.clone())
            .or_insert_with(|| ParsedList::new(raw.name.clone()));

        for entry in raw.entries {
            if entry.kind == RuleKind::Include {
                let inclusion = Inclusion::from_entry(&entry);
                bound
                    .entry(raw.name.clone())
                    .or_insert_with(|| ParsedList::new(raw.name.clone()))
                    .inclusions
                    .push(inclusion);
            } else {
                for aff in &entry.affs {
                    bound
                        .entry(aff.clone())
                        .or_insert_with(|| ParsedList::new(aff.clone()))
                        .entries
                        .push(entry.clone());
                }
                bound
                    .entry(raw.name.clone())
                    .or_insert_with(|| ParsedList::new(raw.name.clone()))
                    .entries
                    .push(entry);
            }
        }
    }

    bound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn raw(name: &str, lines: &[&str]) -> RawList {
        RawList {
            name: name.to_string(),
            entries: lines
                .iter()
                .map(|l| lexer::lex_line(l).unwrap().unwrap())
                .collect(),
        }
    }

    #[test]
    fn test_include_becomes_inclusion() {
        let bound = bind(vec![raw("B", &["include:a @cn @-ads", "b.test"])]);

        let list = &bound["B"];
        assert_eq!(list.entries.len(), 1);
        assert_eq!(list.inclusions.len(), 1);
        assert_eq!(list.inclusions[0].source, "A");
        assert_eq!(list.inclusions[0].must, vec!["cn"]);
        assert_eq!(list.inclusions[0].ban, vec!["ads"]);
    }

    #[test]
    fn test_affiliation_creates_target_list() {
        let bound = bind(vec![raw("X", &["example.net &y"])]);

        assert_eq!(bound["X"].entries.len(), 1);
        let target = &bound["Y"];
        assert_eq!(target.entries.len(), 1);
        assert_eq!(target.entries[0].value, "example.net");
    }

    #[test]
    fn test_affiliation_merges_into_existing_list() {
        let bound = bind(vec![
            raw("X", &["example.net &y"]),
            raw("Y", &["domain:y.test"]),
        ]);

        let target = &bound["Y"];
        assert_eq!(target.entries.len(), 2);
        let values: Vec<_> = target.entries.iter().map(|e| e.value.as_str()).collect();
        assert!(values.contains(&"example.net"));
        assert!(values.contains(&"y.test"));
    }

    #[test]
    fn test_empty_file_still_binds() {
        let bound = bind(vec![raw("EMPTY", &[])]);
        assert!(bound["EMPTY"].entries.is_empty());
        assert!(bound["EMPTY"].inclusions.is_empty());
    }

    #[test]
    fn test_filter_acceptance() {
        let unfiltered = Inclusion {
            source: "A".to_string(),
            must: vec![],
            ban: vec![],
        };
        let filtered = Inclusion {
            source: "A".to_string(),
            must: vec!["cn".to_string()],
            ban: vec!["ads".to_string()],
        };
        let ban_only = Inclusion {
            source: "A".to_string(),
            must: vec![],
            ban: vec!["ads".to_string()],
        };

        let bare = lexer::lex_line("a.test").unwrap().unwrap();
        let cn = lexer::lex_line("a.test @cn").unwrap().unwrap();
        let cn_ads = lexer::lex_line("a.test @cn @ads").unwrap().unwrap();

        assert!(unfiltered.accepts(&bare));
        assert!(unfiltered.accepts(&cn_ads));

        assert!(!filtered.accepts(&bare));
        assert!(filtered.accepts(&cn));
        assert!(!filtered.accepts(&cn_ads));

        // Attribute-free entries pass a pure ban filter.
        assert!(ban_only.accepts(&bare));
        assert!(ban_only.accepts(&cn));
        assert!(!ban_only.accepts(&cn_ads));
    }
}
