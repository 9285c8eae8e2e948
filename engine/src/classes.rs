//! Class tags attached to elements, and the concept classification table.
//!
//! Tags are the styling vocabulary shared with the renderer (see
//! [`crate::style`]) and the predicates the visibility engine keys on.

use bkb_model::{Concept, DefinitionSource};

/// FIBO is the definition authority.
pub const FIBO_DEF: &str = "fibo-def";
/// Schema.org is the definition authority.
pub const SCHEMA_DEF: &str = "schema-def";
/// Locally defined and aligned with an external standard.
pub const EXPLICIT_ALIGNED: &str = "explicit-aligned";
/// Locally defined with no direct external mapping.
pub const EXPLICIT_DOMAIN: &str = "explicit-domain";
/// Definition inherited from a parent.
pub const INHERITED: &str = "inherited";
/// Draft definition, or unknown authority.
pub const DRAFT: &str = "draft";

/// Context concept (dotted border).
pub const CONTEXT: &str = "context";
/// Concept referenced by, but outside, the active view.
pub const GHOST: &str = "ghost";
/// External standard concept.
pub const EXTERNAL: &str = "external";
/// Root of one of the largest categorization trees.
pub const HUB: &str = "hub";
/// Synthetic categorization fan-out point.
pub const JUNCTION: &str = "junction";
/// Property attached to a concept.
pub const PROPERTY: &str = "property";
/// Shared property value type.
pub const PROPERTY_TYPE: &str = "property-type";
/// Technical primitive value type.
pub const PRIMITIVE: &str = "primitive";
/// Search hit.
pub const HIGHLIGHTED: &str = "highlighted";

/// Context-only relationship edge.
pub const CONTEXT_REL: &str = "context-rel";
/// Context-only is-a edge.
pub const CONTEXT_IS_A: &str = "context-isA";
/// Context-only subsumption edge.
pub const CONTEXT_SUBSUMPTION: &str = "context-subsumption";

/// Value type names treated as technical primitives rather than business
/// concepts.
pub const PRIMITIVE_TYPES: &[&str] = &[
    "String", "string", "Integer", "integer", "Int", "int", "Float", "float", "Double", "double",
    "Boolean", "boolean", "Bool", "bool", "Date", "date", "DateTime", "datetime", "Time", "time",
    "Timestamp", "timestamp", "Number", "number", "Decimal", "decimal", "Binary", "binary",
    "Bytes", "bytes", "UUID", "uuid", "GUID", "guid", "Object", "object", "Any", "any",
];

/// True when `name` is a primitive value type.
#[must_use]
pub fn is_primitive_type(name: &str) -> bool {
    PRIMITIVE_TYPES.contains(&name)
}

/// Colour class of a concept node, by definition authority and alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConceptClass {
    /// FIBO defines it.
    FiboDef,
    /// Schema.org defines it.
    SchemaDef,
    /// Locally defined, directly aligned with FIBO or Schema.org.
    ExplicitAligned,
    /// Locally defined, no direct alignment.
    ExplicitDomain,
    /// Inherited definition.
    Inherited,
    /// Draft or unknown.
    Draft,
}

impl ConceptClass {
    /// Classifies a concept.
    ///
    /// Only direct matches (`exact`, `synonym`, `override`) count as aligned.
    #[must_use]
    pub fn of(concept: &Concept) -> Self {
        match concept.definition_source() {
            DefinitionSource::Fibo => ConceptClass::FiboDef,
            DefinitionSource::Schema => ConceptClass::SchemaDef,
            DefinitionSource::Explicit
                if concept.has_direct_fibo() || concept.has_direct_schema() =>
            {
                ConceptClass::ExplicitAligned
            }
            DefinitionSource::Explicit => ConceptClass::ExplicitDomain,
            DefinitionSource::Inherited => ConceptClass::Inherited,
            DefinitionSource::Draft => ConceptClass::Draft,
        }
    }

    /// Returns the class tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            ConceptClass::FiboDef => FIBO_DEF,
            ConceptClass::SchemaDef => SCHEMA_DEF,
            ConceptClass::ExplicitAligned => EXPLICIT_ALIGNED,
            ConceptClass::ExplicitDomain => EXPLICIT_DOMAIN,
            ConceptClass::Inherited => INHERITED,
            ConceptClass::Draft => DRAFT,
        }
    }
}
