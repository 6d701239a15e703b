//! Cross-list resolver: memoized flattening with cycle detection.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::binder::ParsedList;
use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::polisher;

/// Resolver flattens every bound list into its finalized entry sequence.
///
/// Resolution is a single-threaded memoized depth-first descent. The
/// active-path stack is the only state mutated across the recursion and is
/// strictly scoped to it; a list reappearing on the stack is a cycle.
pub struct Resolver<'a> {
    bound: &'a AHashMap<String, ParsedList>,
    finals: BTreeMap<String, Vec<Entry>>,
    active: Vec<String>,
}

impl<'a> Resolver<'a> {
    pub fn new(bound: &'a AHashMap<String, ParsedList>) -> Self {
        Self {
            bound,
            finals: BTreeMap::new(),
            active: Vec::new(),
        }
    }

    /// Resolve every bound list and return the final-list map.
    ///
    /// The map is keyed by list name; `BTreeMap` iteration gives the
    /// emitter its sorted outer order.
    pub fn resolve_all(mut self) -> Result<BTreeMap<String, Vec<Entry>>> {
        let mut names: Vec<&String> = self.bound.keys().collect();
        names.sort();
        for name in names {
            self.resolve(name)?;
        }
        Ok(self.finals)
    }

    fn resolve(&mut self, name: &str) -> Result<()> {
        if self.finals.contains_key(name) {
            return Ok(());
        }
        if self.active.iter().any(|n| n == name) {
            let mut path = self.active.join(" -> ");
            path.push_str(" -> ");
            path.push_str(name);
            return Err(Error::Cycle(path));
        }

        self.active.push(name.to_string());
        let outcome = self.flatten(name);
        self.active.pop();

        self.finals.insert(name.to_string(), outcome?);
        Ok(())
    }

    fn flatten(&mut self, name: &str) -> Result<Vec<Entry>> {
        let bound = self.bound;
        let list = match bound.get(name) {
            Some(list) => list,
            None => return Err(Error::Reference(name.to_string())),
        };

        // Working dedup map keyed on the plain form. Seeds sharing a plain
        // are identical renderings, so last-write-wins is idempotent.
        let mut pool: AHashMap<String, Entry> = AHashMap::with_capacity(list.entries.len());
        for entry in &list.entries {
            pool.insert(entry.plain.clone(), entry.clone());
        }

        for inclusion in &list.inclusions {
            if !bound.contains_key(&inclusion.source) {
                return Err(Error::Reference(inclusion.source.clone()));
            }
            self.resolve(&inclusion.source)?;

            // The filter tests the flattened leaf entries of the source,
            // not the attributes written at any ancestor include site.
            if let Some(flattened) = self.finals.get(&inclusion.source) {
                for entry in flattened {
                    if inclusion.accepts(entry) {
                        pool.insert(entry.plain.clone(), entry.clone());
                    }
                }
            }
        }

        Ok(polisher::polish(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder;
    use crate::lexer;
    use crate::loader::RawList;

    fn raw(name: &str, lines: &[&str]) -> RawList {
        RawList {
            name: name.to_string(),
            entries: lines
                .iter()
                .map(|l| lexer::lex_line(l).unwrap().unwrap())
                .collect(),
        }
    }

    fn resolve(lists: Vec<RawList>) -> Result<BTreeMap<String, Vec<Entry>>> {
        let bound = binder::bind(lists);
        Resolver::new(&bound).resolve_all()
    }

    fn plains(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.plain.as_str()).collect()
    }

    #[test]
    fn test_plain_include() {
        let finals = resolve(vec![
            raw("A", &["a.test"]),
            raw("B", &["include:a", "b.test"]),
        ])
        .unwrap();
        assert_eq!(plains(&finals["B"]), vec!["domain:a.test", "domain:b.test"]);
    }

    #[test]
    fn test_attribute_filtered_include() {
        let finals = resolve(vec![
            raw(
                "A",
                &["domain:a.test @cn", "domain:b.test @ads", "domain:c.test @cn @ads"],
            ),
            raw("B", &["include:a @cn @-ads"]),
        ])
        .unwrap();
        assert_eq!(plains(&finals["B"]), vec!["domain:a.test:@cn"]);
    }

    #[test]
    fn test_filters_are_not_multiplicative() {
        // C includes B unfiltered; B includes A filtered by @cn. The @cn
        // filter applies only at B's include site.
        let finals = resolve(vec![
            raw("A", &["domain:a.test @cn", "domain:b.test @ads"]),
            raw("B", &["include:a @cn", "domain:own.test @ads"]),
            raw("C", &["include:b"]),
        ])
        .unwrap();
        assert_eq!(
            plains(&finals["C"]),
            vec!["domain:a.test:@cn", "domain:own.test:@ads"]
        );
    }

    #[test]
    fn test_diamond_inclusion_deduplicates() {
        let finals = resolve(vec![
            raw("LEAF", &["shared.test"]),
            raw("LEFT", &["include:leaf"]),
            raw("RIGHT", &["include:leaf"]),
            raw("TOP", &["include:left", "include:right"]),
        ])
        .unwrap();
        assert_eq!(plains(&finals["TOP"]), vec!["domain:shared.test"]);
    }

    #[test]
    fn test_transitive_subsumption() {
        // The included parent domain absorbs the including list's own
        // subdomain rule.
        let finals = resolve(vec![
            raw("A", &["domain:example.org"]),
            raw("B", &["include:a", "domain:sub.example.org"]),
        ])
        .unwrap();
        assert_eq!(plains(&finals["B"]), vec!["domain:example.org"]);
    }

    #[test]
    fn test_missing_include_target() {
        let err = resolve(vec![raw("A", &["include:ghost"])]).unwrap_err();
        match err {
            Error::Reference(name) => assert_eq!(name, "GHOST"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_direct_cycle() {
        let err = resolve(vec![
            raw("L1", &["include:l2"]),
            raw("L2", &["include:l1"]),
        ])
        .unwrap_err();
        match err {
            Error::Cycle(path) => {
                assert!(path.contains("L1"));
                assert!(path.contains("L2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_cycle() {
        let err = resolve(vec![raw("L", &["include:l"])]).unwrap_err();
        assert!(matches!(err, Error::Cycle(_)));
    }

    #[test]
    fn test_shared_list_resolved_once_not_cyclic() {
        // A diamond is not a cycle; resolution is memoized, not re-entered.
        let finals = resolve(vec![
            raw("LEAF", &["x.test"]),
            raw("MID", &["include:leaf"]),
            raw("TOP", &["include:leaf", "include:mid"]),
        ])
        .unwrap();
        assert_eq!(plains(&finals["TOP"]), vec!["domain:x.test"]);
    }

    #[test]
    fn test_every_bound_list_is_finalized() {
        let finals = resolve(vec![
            raw("A", &["a.test &extra"]),
            raw("B", &["include:a"]),
        ])
        .unwrap();
        // EXTRA exists only through the affiliation but is still resolved.
        assert_eq!(
            finals.keys().collect::<Vec<_>>(),
            vec!["A", "B", "EXTRA"]
        );
        assert_eq!(plains(&finals["EXTRA"]), vec!["domain:a.test"]);
    }
}
