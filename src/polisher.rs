//! Final-pass polishing: deduplication, subsumption, deterministic sort.

use ahash::{AHashMap, AHashSet};

use crate::entry::{Entry, RuleKind};

/// Compact a resolved dedup map into a finalized list.
///
/// Attribute-free `Domain` rules form the parent set; attribute-free
/// `Domain` and `Full` rules whose value sits under a parent are dropped.
/// Rules carrying attributes, and all `Keyword`/`Regexp` rules, pass
/// through untouched. The survivors are sorted byte-wise by plain form.
pub fn polish(pool: AHashMap<String, Entry>) -> Vec<Entry> {
    let mut kept = Vec::with_capacity(pool.len());
    let mut candidates = Vec::new();
    let mut parents: AHashSet<String> = AHashSet::new();

    for (_, entry) in pool {
        match entry.kind {
            RuleKind::Domain if entry.attrs.is_empty() => {
                parents.insert(entry.value.clone());
                candidates.push(entry);
            }
            RuleKind::Full if entry.attrs.is_empty() => candidates.push(entry),
            _ => kept.push(entry),
        }
    }

    for entry in candidates {
        if !is_covered(&entry, &parents) {
            kept.push(entry);
        }
    }

    kept.sort_by(|a, b| a.plain.cmp(&b.plain));
    kept
}

/// Whether a subsumption candidate is covered by an ancestor in the parent
/// set.
///
/// The probe for a `Full` rule gets a leading dot so that
/// `domain:example.org` also absorbs `full:example.org`. Stripping one
/// label at a time means a `Domain` rule never matches itself.
fn is_covered(entry: &Entry, parents: &AHashSet<String>) -> bool {
    let dotted;
    let mut probe: &str = match entry.kind {
        RuleKind::Full => {
            dotted = format!(".{}", entry.value);
            &dotted
        }
        _ => entry.value.as_str(),
    };

    while let Some(idx) = probe.find('.') {
        probe = &probe[idx + 1..];
        if parents.contains(probe) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer;

    fn pool(lines: &[&str]) -> AHashMap<String, Entry> {
        let mut map = AHashMap::new();
        for line in lines {
            let entry = lexer::lex_line(line).unwrap().unwrap();
            map.insert(entry.plain.clone(), entry);
        }
        map
    }

    fn plains(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.plain.as_str()).collect()
    }

    #[test]
    fn test_subdomain_rules_subsumed() {
        let out = polish(pool(&[
            "domain:example.org",
            "full:www.example.org",
            "domain:sub.example.org",
        ]));
        assert_eq!(plains(&out), vec!["domain:example.org"]);
    }

    #[test]
    fn test_full_equal_to_domain_subsumed() {
        let out = polish(pool(&["domain:example.org", "full:example.org"]));
        assert_eq!(plains(&out), vec!["domain:example.org"]);
    }

    #[test]
    fn test_deep_subdomain_subsumed() {
        let out = polish(pool(&["domain:example.org", "domain:a.b.c.example.org"]));
        assert_eq!(plains(&out), vec!["domain:example.org"]);
    }

    #[test]
    fn test_full_parent_does_not_subsume() {
        // Only Domain rules form the parent set.
        let out = polish(pool(&["full:example.org", "domain:sub.example.org"]));
        assert_eq!(
            plains(&out),
            vec!["domain:sub.example.org", "full:example.org"]
        );
    }

    #[test]
    fn test_attributed_rules_never_subsumed() {
        let out = polish(pool(&["domain:example.org", "domain:sub.example.org @cn"]));
        assert_eq!(
            plains(&out),
            vec!["domain:example.org", "domain:sub.example.org:@cn"]
        );
    }

    #[test]
    fn test_attributed_parent_does_not_cover() {
        let out = polish(pool(&["domain:example.org @cn", "domain:sub.example.org"]));
        assert_eq!(
            plains(&out),
            vec!["domain:example.org:@cn", "domain:sub.example.org"]
        );
    }

    #[test]
    fn test_similar_suffix_not_subsumed() {
        // notexample.org must not be treated as under example.org.
        let out = polish(pool(&["domain:example.org", "domain:notexample.org"]));
        assert_eq!(
            plains(&out),
            vec!["domain:example.org", "domain:notexample.org"]
        );
    }

    #[test]
    fn test_keyword_and_regexp_pass_through() {
        let out = polish(pool(&[
            "domain:example.org",
            "keyword:example",
            "regexp:^example\\.",
        ]));
        assert_eq!(
            plains(&out),
            vec![
                "domain:example.org",
                "keyword:example",
                "regexp:^example\\."
            ]
        );
    }

    #[test]
    fn test_sorted_by_plain() {
        let out = polish(pool(&["full:z.test", "domain:a.test", "keyword:m"]));
        assert_eq!(
            plains(&out),
            vec!["domain:a.test", "full:z.test", "keyword:m"]
        );
    }
}
