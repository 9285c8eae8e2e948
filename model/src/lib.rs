//! BKB domain dataset model.
//!
//! A domain payload is one JSON document holding every concept, external
//! concept, categorization, relationship, subsumption, property and property
//! type of a single business domain. This crate gives those records a typed
//! shape and normalizes the field-name variations the exporters have produced
//! over time, so downstream consumers see exactly one canonical record per
//! kind.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`model`] | [`DomainData`] and its record types |
//! | [`de`] | Lenient deserialization helpers (string-or-number ids, null-as-default) |
//! | [`hierarchy`] | The domain hierarchy index used to discover load paths |
//! | [`text`] | Small string helpers shared by the engine and the clients |
//!
//! # Entry Point
//!
//! ```
//! use bkb_model::DomainData;
//!
//! let data = DomainData::from_json_str(r#"{
//!     "domain": {"name": "Investment", "path": "RBCZ:MIB:Investment"},
//!     "concepts": [{"name": "Order", "qname": "bkb:Order"}],
//!     "relationships": [{"source_name": "Order", "target_name": "Account", "forward_verb": " is placed for "}]
//! }"#).unwrap();
//!
//! assert_eq!(data.concepts[0].identity(), "bkb:Order");
//! assert_eq!(data.relationships[0].subject, "Order");
//! assert_eq!(data.relationships[0].verb_phrase, "is placed for");
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod de;
pub mod hierarchy;
pub mod model;
pub mod text;

pub use hierarchy::{resolve_domain_key, DomainIndex, HierarchyEntry, HierarchyKind, ViewEntry};
pub use model::{
    Categorization, Concept, ConceptKind, Definition, DefinitionSource, DomainData, DomainInfo,
    ExternalConcept, ExternalType, FiboMapping, HierarchyHint, MatchType, Property, PropertyType,
    Relationship, SchemaMapping, SourceRef, Subsumption,
};
