//! Core dataset types.
//!
//! Every record type here is the canonical shape consumed by the engine.
//! Variant field spellings found in exported payloads are folded into that
//! shape during deserialization (see [`Relationship`] and [`Subsumption`]),
//! so no consumer ever inspects alternate keys.

use serde::{Deserialize, Serialize};

use crate::de::{
    first_non_blank, id_string, null_default, opt_id_string, opt_non_blank,
};

/// Who is the authority for a concept's definition text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DefinitionSource {
    /// FIBO defines the concept.
    Fibo,
    /// Schema.org defines the concept.
    Schema,
    /// The domain defines the concept explicitly.
    Explicit,
    /// The definition is inherited from a parent concept.
    Inherited,
    /// Draft definition awaiting review. Also the fallback for unknown values.
    #[default]
    Draft,
}

impl DefinitionSource {
    /// Returns the upper-case wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DefinitionSource::Fibo => "FIBO",
            DefinitionSource::Schema => "SCHEMA",
            DefinitionSource::Explicit => "EXPLICIT",
            DefinitionSource::Inherited => "INHERITED",
            DefinitionSource::Draft => "DRAFT",
        }
    }
}

impl From<String> for DefinitionSource {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "FIBO" => DefinitionSource::Fibo,
            "SCHEMA" => DefinitionSource::Schema,
            "EXPLICIT" => DefinitionSource::Explicit,
            "INHERITED" => DefinitionSource::Inherited,
            _ => DefinitionSource::Draft,
        }
    }
}

impl From<DefinitionSource> for String {
    fn from(value: DefinitionSource) -> Self {
        value.as_str().to_string()
    }
}

/// Strength of an external mapping.
///
/// Only `exact`, `synonym` and `override` are *direct* matches; the weaker
/// kinds never count as alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MatchType {
    /// Same concept.
    Exact,
    /// Same concept under another name.
    Synonym,
    /// Manually asserted mapping.
    Override,
    /// Mapped to a broader parent concept.
    Parent,
    /// Keyword hit.
    Keyword,
    /// Fuzzy text match.
    Fuzzy,
    /// Explicitly recorded as no usable mapping (`"none"`).
    NoMatch,
    /// Missing, null or unrecognized match type.
    #[default]
    Unspecified,
}

impl MatchType {
    /// Returns the lower-case wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MatchType::Exact => "exact",
            MatchType::Synonym => "synonym",
            MatchType::Override => "override",
            MatchType::Parent => "parent",
            MatchType::Keyword => "keyword",
            MatchType::Fuzzy => "fuzzy",
            MatchType::NoMatch => "none",
            MatchType::Unspecified => "unspecified",
        }
    }

    /// Returns true for `exact`, `synonym` and `override`.
    #[must_use]
    pub fn is_direct(self) -> bool {
        matches!(
            self,
            MatchType::Exact | MatchType::Synonym | MatchType::Override
        )
    }

    /// Returns true when a synthesized subsumption should read "same as".
    #[must_use]
    pub fn is_equivalence(self) -> bool {
        matches!(self, MatchType::Exact | MatchType::Synonym)
    }
}

impl From<String> for MatchType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => MatchType::Exact,
            "synonym" => MatchType::Synonym,
            "override" => MatchType::Override,
            "parent" => MatchType::Parent,
            "keyword" => MatchType::Keyword,
            "fuzzy" => MatchType::Fuzzy,
            "none" => MatchType::NoMatch,
            _ => MatchType::Unspecified,
        }
    }
}

impl From<MatchType> for String {
    fn from(value: MatchType) -> Self {
        value.as_str().to_string()
    }
}

/// Whether a concept belongs to the domain or is referenced for context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConceptKind {
    /// A concept owned by the domain.
    #[default]
    Domain,
    /// A concept borrowed from another domain for context.
    ContextReference,
}

impl From<String> for ConceptKind {
    fn from(value: String) -> Self {
        if value == "context_reference" {
            ConceptKind::ContextReference
        } else {
            ConceptKind::Domain
        }
    }
}

impl From<ConceptKind> for String {
    fn from(value: ConceptKind) -> Self {
        match value {
            ConceptKind::Domain => "domain".into(),
            ConceptKind::ContextReference => "context_reference".into(),
        }
    }
}

/// The standard that owns an external concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExternalType {
    /// Financial Industry Business Ontology. Also the fallback for unknown values.
    #[default]
    Fibo,
    /// Schema.org vocabulary.
    SchemaOrg,
    /// OMG Commons ontologies.
    Omg,
}

impl ExternalType {
    /// Returns the lower-case wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExternalType::Fibo => "fibo",
            ExternalType::SchemaOrg => "schema.org",
            ExternalType::Omg => "omg",
        }
    }
}

impl From<String> for ExternalType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "schema.org" | "schema" => ExternalType::SchemaOrg,
            "omg" => ExternalType::Omg,
            _ => ExternalType::Fibo,
        }
    }
}

impl From<ExternalType> for String {
    fn from(value: ExternalType) -> Self {
        value.as_str().to_string()
    }
}

/// The `domain` header of a payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainInfo {
    /// Display name, e.g. `"Investment"`.
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Colon-separated hierarchy path, e.g. `"RBCZ:MIB:Investment"`.
    #[serde(deserialize_with = "null_default")]
    pub path: String,
}

/// One provenance record: the file a concept was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRef {
    /// Source file, optionally with a `#ViewId` fragment.
    #[serde(deserialize_with = "null_default")]
    pub file: String,
    /// Source kind, e.g. `"schema.org"`.
    #[serde(rename = "type", deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    /// The concept is only referenced for context in this source.
    #[serde(deserialize_with = "null_default")]
    pub is_context: bool,
    /// The source is hidden from provenance listings.
    #[serde(deserialize_with = "null_default")]
    pub hidden: bool,
}

/// Definition text and its authority.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Definition {
    /// Definition text.
    #[serde(deserialize_with = "null_default")]
    pub text: String,
    /// Who is the authority for the text.
    #[serde(deserialize_with = "null_default")]
    pub source: DefinitionSource,
}

/// Mapping of a domain concept onto a FIBO class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FiboMapping {
    /// FIBO class URI.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// FIBO class label.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Mapping strength.
    #[serde(deserialize_with = "null_default")]
    pub match_type: MatchType,
    /// FIBO's own definition of the mapped class.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub fibo_definition: Option<String>,
}

/// Mapping of a domain concept onto a Schema.org type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaMapping {
    /// Schema.org type URI.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Schema.org type label.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Mapping strength.
    #[serde(deserialize_with = "null_default")]
    pub match_type: MatchType,
}

/// Hierarchy hint carried on a concept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchyHint {
    /// Qualified name of the extended type, e.g. `"schema:Car"`.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,
}

/// A named business entity owned (or referenced for context) by the domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concept {
    /// Exporter identifier, referenced by [`Property::definition_concept_id`].
    #[serde(deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name. Not unique across namespaces.
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Qualified name; the concept's identity when present.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub qname: Option<String>,
    /// Domain concept or context reference.
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub kind: ConceptKind,
    /// Definition text and authority.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub definition: Option<Definition>,
    /// FIBO alignment channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fibo_mapping: Option<FiboMapping>,
    /// Schema.org alignment channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_mapping: Option<SchemaMapping>,
    /// The exporter found a FIBO mapping.
    #[serde(deserialize_with = "null_default")]
    pub has_fibo_mapping: bool,
    /// The exporter found a Schema.org mapping.
    #[serde(deserialize_with = "null_default")]
    pub has_schema_mapping: bool,
    /// Hierarchy hint (schema extends).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<HierarchyHint>,
    /// Provenance records; they drive view membership.
    #[serde(deserialize_with = "null_default")]
    pub sources: Vec<SourceRef>,
}

impl Concept {
    /// Returns the node identity: the qname when present, else the name.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.qname.as_deref().unwrap_or(&self.name)
    }

    /// Returns the definition authority, `Draft` when absent.
    #[must_use]
    pub fn definition_source(&self) -> DefinitionSource {
        self.definition
            .as_ref()
            .map_or(DefinitionSource::Draft, |d| d.source)
    }

    /// Returns the definition text, empty when absent.
    #[must_use]
    pub fn definition_text(&self) -> &str {
        self.definition.as_ref().map_or("", |d| d.text.as_str())
    }

    /// Returns the FIBO match type, `none` when unmapped.
    #[must_use]
    pub fn fibo_match_type(&self) -> MatchType {
        self.fibo_mapping
            .as_ref()
            .map_or(MatchType::NoMatch, |m| m.match_type)
    }

    /// True when the concept carries a direct FIBO match.
    #[must_use]
    pub fn has_direct_fibo(&self) -> bool {
        self.has_fibo_mapping && self.fibo_match_type().is_direct()
    }

    /// True when the concept carries a direct Schema.org match. A flagged
    /// mapping without a recorded match type counts as direct.
    #[must_use]
    pub fn has_direct_schema(&self) -> bool {
        self.has_schema_mapping
            && self
                .schema_mapping
                .as_ref()
                .map_or(true, |m| m.match_type.is_direct())
    }

    /// True when the concept is a context reference.
    #[must_use]
    pub fn is_context_reference(&self) -> bool {
        self.kind == ConceptKind::ContextReference
    }

    /// Returns the schema-extends hint, if any.
    #[must_use]
    pub fn extends(&self) -> Option<&str> {
        self.hierarchy.as_ref().and_then(|h| h.extends.as_deref())
    }
}

/// A concept owned by an external standard and referenced by the domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalConcept {
    /// Local name.
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Qualified name, e.g. `"fibo-fnd-dat-fd:Date"`.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub qname: Option<String>,
    /// Preferred display label.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Canonical URI.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Owning standard.
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub external_type: ExternalType,
    /// Definition text from the standard.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Provenance records.
    #[serde(deserialize_with = "null_default")]
    pub sources: Vec<SourceRef>,
}

impl ExternalConcept {
    /// Returns the identity: the qname when present, else the name.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.qname.as_deref().unwrap_or(&self.name)
    }

    /// Returns the label when present, else the name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// A named grouping of child concepts under a parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Categorization {
    /// Parent concept name.
    #[serde(deserialize_with = "null_default")]
    pub parent_name: String,
    /// Category label, e.g. `"kind"`.
    #[serde(deserialize_with = "null_default")]
    pub category_name: String,
    /// Child concept names.
    #[serde(deserialize_with = "null_default")]
    pub children_names: Vec<String>,
    /// Legacy record type; `"isA"` marks the superseded is-a form.
    #[serde(rename = "type", deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub categorization_type: Option<String>,
    /// Context-only grouping.
    #[serde(deserialize_with = "null_default")]
    pub is_context: bool,
}

impl Categorization {
    /// True for the legacy is-a form, which is parsed but never rendered.
    #[must_use]
    pub fn is_is_a(&self) -> bool {
        self.categorization_type.as_deref() == Some("isA")
    }
}

/// Wire shape of a relationship before field-alias normalization.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawRelationship {
    #[serde(deserialize_with = "opt_id_string")]
    id: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    subject_name: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    source_name: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    from: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    object_name: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    target_name: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    to: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    verb_phrase: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    forward_verb: Option<String>,
    #[serde(deserialize_with = "opt_non_blank")]
    inverse_verb_phrase: Option<String>,
    #[serde(rename = "type", deserialize_with = "opt_non_blank")]
    relationship_type: Option<String>,
    #[serde(deserialize_with = "null_default")]
    is_context: bool,
}

/// A binary verb fact between two concepts.
///
/// Accepts `subject_name | source_name | from` for the subject,
/// `object_name | target_name | to` for the object and
/// `verb_phrase | forward_verb` for the forward label; the first non-blank
/// value wins. Verb phrases are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRelationship")]
pub struct Relationship {
    /// Exporter identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Subject concept name (empty when missing).
    #[serde(rename = "subject_name")]
    pub subject: String,
    /// Object concept name (empty when missing).
    #[serde(rename = "object_name")]
    pub object: String,
    /// Forward label, read subject → object.
    pub verb_phrase: String,
    /// Inverse label, read object → subject.
    pub inverse_verb_phrase: String,
    /// Legacy record type; `"isA"` marks the superseded is-a form.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub relationship_type: Option<String>,
    /// Context-only relationship.
    pub is_context: bool,
}

impl Relationship {
    /// True for the legacy is-a form, which is parsed but never rendered.
    #[must_use]
    pub fn is_is_a(&self) -> bool {
        self.relationship_type.as_deref() == Some("isA")
    }
}

impl From<RawRelationship> for Relationship {
    fn from(raw: RawRelationship) -> Self {
        let trimmed = |s: Option<String>| s.map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            id: raw.id,
            subject: first_non_blank([raw.subject_name, raw.source_name, raw.from])
                .unwrap_or_default(),
            object: first_non_blank([raw.object_name, raw.target_name, raw.to])
                .unwrap_or_default(),
            verb_phrase: trimmed(first_non_blank([raw.verb_phrase, raw.forward_verb])),
            inverse_verb_phrase: trimmed(raw.inverse_verb_phrase),
            relationship_type: raw.relationship_type,
            is_context: raw.is_context,
        }
    }
}

/// A concept reference given either as a bare name or as `{ "name": ... }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NamedRef {
    Name(String),
    Object {
        #[serde(default, deserialize_with = "null_default")]
        name: String,
    },
}

impl NamedRef {
    fn into_name(self) -> String {
        match self {
            NamedRef::Name(name) | NamedRef::Object { name } => name,
        }
    }
}

/// Wire shape of a subsumption before normalization.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawSubsumption {
    #[serde(deserialize_with = "opt_non_blank")]
    child_name: Option<String>,
    child: Option<NamedRef>,
    #[serde(deserialize_with = "opt_non_blank")]
    parent_name: Option<String>,
    parent: Option<NamedRef>,
    #[serde(deserialize_with = "opt_non_blank")]
    label: Option<String>,
    #[serde(deserialize_with = "null_default")]
    is_context: bool,
    #[serde(deserialize_with = "opt_non_blank")]
    external_uri: Option<String>,
}

/// Canonical is-a-kind-of fact.
///
/// Both the flat (`child_name`, `parent_name`) and nested
/// (`child.name`, `parent.name`) wire formats are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawSubsumption")]
pub struct Subsumption {
    /// Child concept name (empty when missing).
    #[serde(rename = "child_name")]
    pub child: String,
    /// Internal parent concept name (empty when the parent is external only).
    #[serde(rename = "parent_name")]
    pub parent: String,
    /// Edge label, defaults to `"is a kind of"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Context-only subsumption.
    pub is_context: bool,
    /// URI of an external parent class.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_uri: Option<String>,
}

impl Subsumption {
    /// Returns the edge label, `"is a kind of"` by default.
    #[must_use]
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or("is a kind of")
    }

    /// True when the record names a child and some parent (internal or external).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.child.is_empty() && (!self.parent.is_empty() || self.external_uri.is_some())
    }
}

impl From<RawSubsumption> for Subsumption {
    fn from(raw: RawSubsumption) -> Self {
        Self {
            child: first_non_blank([raw.child_name, raw.child.map(NamedRef::into_name)])
                .unwrap_or_default(),
            parent: first_non_blank([raw.parent_name, raw.parent.map(NamedRef::into_name)])
                .unwrap_or_default(),
            label: raw.label,
            is_context: raw.is_context,
            external_uri: raw.external_uri,
        }
    }
}

/// A typed attribute attached to a concept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Property {
    /// Exporter identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Property name.
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Name of the owning concept.
    #[serde(deserialize_with = "null_default")]
    pub parent_concept: String,
    /// Name of the value type.
    #[serde(rename = "type", deserialize_with = "null_default")]
    pub type_name: String,
    /// Identifier of the shared [`PropertyType`].
    #[serde(deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub type_id: Option<String>,
    /// Identifier of the concept that defines this property's meaning.
    #[serde(deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub definition_concept_id: Option<String>,
    /// Free-form annotations.
    #[serde(deserialize_with = "null_default")]
    pub annotations: Vec<serde_json::Value>,
}

/// A value type shared by properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyType {
    /// Exporter identifier.
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    /// Type name, e.g. `"String"` or `"ISIN"`.
    #[serde(deserialize_with = "null_default")]
    pub name: String,
    /// Definition text.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    /// Canonical URI.
    #[serde(deserialize_with = "opt_non_blank", skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

/// One domain's complete dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainData {
    /// Domain header.
    #[serde(deserialize_with = "null_default")]
    pub domain: DomainInfo,
    /// Domain concepts.
    #[serde(deserialize_with = "null_default")]
    pub concepts: Vec<Concept>,
    /// Referenced external concepts.
    #[serde(deserialize_with = "null_default")]
    pub external_concepts: Vec<ExternalConcept>,
    /// Categorizations.
    #[serde(deserialize_with = "null_default")]
    pub categorizations: Vec<Categorization>,
    /// Relationships.
    #[serde(deserialize_with = "null_default")]
    pub relationships: Vec<Relationship>,
    /// Subsumptions.
    #[serde(deserialize_with = "null_default")]
    pub subsumptions: Vec<Subsumption>,
    /// Properties.
    #[serde(deserialize_with = "null_default")]
    pub properties: Vec<Property>,
    /// Property types.
    #[serde(deserialize_with = "null_default")]
    pub property_types: Vec<PropertyType>,
}

impl DomainData {
    /// Parses a payload from JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the text is not a valid payload.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let data: DomainData = serde_json::from_str(json)?;
        tracing::debug!(
            domain = %data.domain.name,
            concepts = data.concepts.len(),
            externals = data.external_concepts.len(),
            categorizations = data.categorizations.len(),
            relationships = data.relationships.len(),
            subsumptions = data.subsumptions.len(),
            "parsed domain payload"
        );
        Ok(data)
    }

    /// Returns the concept with the given display name (the last one wins
    /// when names repeat).
    #[must_use]
    pub fn concept_named(&self, name: &str) -> Option<&Concept> {
        self.concepts.iter().rev().find(|c| c.name == name)
    }
}
