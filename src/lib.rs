//! geosite-compiler - a compiler for domain-classification site lists.
//!
//! The input is a directory of human-edited text files, one per list. Each
//! line declares a rule (a domain subtree, an exact domain, a substring
//! keyword, or a regular expression), optionally decorated with `@attr`
//! labels, `&LIST` affiliations, and `include:LIST` directives that pull in
//! other lists, filtered by attribute. The compiler flattens the inclusion
//! graph, removes redundant rules, and writes one deterministic binary
//! artifact plus optional text exports.
//!
//! # Pipeline
//!
//! 1. **Lexer** ([`lexer`]) - one line into a typed [`Entry`]
//! 2. **Loader** ([`loader`]) - data directory into raw lists
//! 3. **Binder** ([`binder`]) - includes into inclusion records,
//!    affiliations routed to their targets
//! 4. **Resolver** ([`resolver`]) - memoized depth-first flattening with
//!    cycle detection
//! 5. **Polisher** ([`polisher`]) - dedup, subsumption, deterministic sort
//! 6. **Emitter** ([`emitter`]) - binary artifact and text exports
//!
//! # Quick Start
//!
//! ```ignore
//! use geosite_compiler::compile;
//! use std::path::Path;
//!
//! let compiled = compile(Path::new("./data"))?;
//! compiled.write_binary(Path::new("./geosite.dat"), None)?;
//! ```
//!
//! # Source format
//!
//! ```text
//! # one rule per line, `#` starts a comment
//! example.com @ads          # bare value is a subtree rule
//! full:login.example.com    # exact match
//! keyword:tracker           # substring match
//! regexp:^ads[0-9]+\.       # pattern match
//! example.net &SHARED       # also routed into list SHARED
//! include:other @cn @-ads   # pull OTHER, keep @cn, drop @ads
//! ```

mod error;

pub mod binder;
pub mod compiler;
pub mod emitter;
pub mod entry;
pub mod lexer;
pub mod loader;
pub mod polisher;
pub mod proto;
pub mod resolver;

// Re-export core types
pub use compiler::{compile, CompiledLists};
pub use entry::{Entry, RuleKind};
pub use error::{Error, ParseError, Result};

// Re-export emission types for advanced usage
pub use binder::{Inclusion, ParsedList};
pub use emitter::ExcludeAttrs;
