//! Protobuf messages for the binary artifact.
//!
//! The on-wire schema is a fixed external contract consumed by routing
//! software, so the messages are declared by hand with `prost` derives
//! instead of build-time codegen. Field numbers and the `Type` enum values
//! must never change.

/// The whole artifact: one entry per compiled list, sorted by name.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSiteList {
    #[prost(message, repeated, tag = "1")]
    pub entry: Vec<GeoSite>,
}

/// One compiled list.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GeoSite {
    /// Upper-cased list name
    #[prost(string, tag = "1")]
    pub country_code: String,
    #[prost(message, repeated, tag = "2")]
    pub domain: Vec<Domain>,
}

/// One compiled rule.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Domain {
    #[prost(enumeration = "domain::Type", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub value: String,
    #[prost(message, repeated, tag = "3")]
    pub attribute: Vec<Attribute>,
}

pub mod domain {
    /// Rule kind on the wire.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
    #[repr(i32)]
    pub enum Type {
        /// A domain and all of its subdomains
        RootDomain = 0,
        /// Regular-expression match
        Regex = 1,
        /// Substring match
        Plain = 2,
        /// Exact match
        Full = 3,
    }
}

/// An attribute attached to a compiled rule.
///
/// The compiler only ever emits `bool_value = true`; the integer arm exists
/// for schema compatibility with readers.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Attribute {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(oneof = "attribute::TypedValue", tags = "2, 3")]
    pub typed_value: Option<attribute::TypedValue>,
}

pub mod attribute {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum TypedValue {
        #[prost(bool, tag = "2")]
        BoolValue(bool),
        #[prost(int64, tag = "3")]
        IntValue(i64),
    }
}
