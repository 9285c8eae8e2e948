//! Ingestion tests over realistic payload fragments.

use bkb_model::{
    ConceptKind, DefinitionSource, DomainData, ExternalType, MatchType,
};
use pretty_assertions::assert_eq;

const PAYLOAD: &str = r#"{
    "domain": {"name": "Investment", "path": "RBCZ:MIB:Investment"},
    "concepts": [
        {
            "id": 17,
            "name": "Order",
            "qname": "bkb:Order",
            "definition": {"text": "An instruction to trade.", "source": "explicit"},
            "fibo_mapping": {"uri": "https://spec.edmcouncil.org/fibo/ontology/FBC/Order", "label": "order", "match_type": "exact"},
            "has_fibo_mapping": true,
            "sources": [{"file": "Investment-Order.cs"}, {"file": "bundle.yaml#Position", "is_context": true}]
        },
        {
            "name": "Date",
            "qname": "",
            "type": "context_reference",
            "definition": null,
            "fibo_mapping": {"match_type": "fuzzy"},
            "has_fibo_mapping": true,
            "sources": null
        }
    ],
    "external_concepts": [
        {"name": "Date", "qname": "omg:Date", "type": "omg"},
        {"name": "Car", "label": "Car", "type": "schema.org", "uri": "https://schema.org/Car"}
    ],
    "categorizations": [
        {"parent_name": "Order", "category_name": "kind", "children_names": ["Buy", "Sell"]},
        {"parent_name": "Order", "category_name": "is a", "children_names": ["Trade"], "type": "isA"}
    ],
    "relationships": [
        {"id": 3, "subject_name": "", "source_name": "Order", "to": "Account", "verb_phrase": "", "forward_verb": " is placed for ", "inverse_verb_phrase": "has "},
        {"from": "Trade", "object_name": "Order", "type": "isA"}
    ],
    "subsumptions": [
        {"child_name": "Buy", "parent_name": "Order"},
        {"child": {"name": "Sell"}, "parent": {"name": "Order"}, "label": "is a variant of"},
        {"child_name": "Order", "external_uri": "https://spec.edmcouncil.org/fibo/ontology/FBC/Order", "is_context": true},
        {"child_name": "Orphan"}
    ],
    "properties": [
        {"id": 5, "name": "isin", "parent_concept": "Order", "type": "String", "type_id": 9, "definition_concept_id": "17"}
    ],
    "property_types": [{"id": 9, "name": "String"}]
}"#;

/// Alias fields collapse into one canonical relationship shape.
#[test]
fn relationship_aliases_normalize() {
    let data = DomainData::from_json_str(PAYLOAD).unwrap();
    let rel = &data.relationships[0];
    assert_eq!(rel.id.as_deref(), Some("3"));
    assert_eq!(rel.subject, "Order", "blank subject_name falls through to source_name");
    assert_eq!(rel.object, "Account");
    assert_eq!(rel.verb_phrase, "is placed for");
    assert_eq!(rel.inverse_verb_phrase, "has");
    assert!(!rel.is_is_a());
    assert!(data.relationships[1].is_is_a());
    assert_eq!(data.relationships[1].subject, "Trade");
}

/// Flat and nested subsumption formats are both accepted.
#[test]
fn subsumption_formats_normalize() {
    let data = DomainData::from_json_str(PAYLOAD).unwrap();
    let subs = &data.subsumptions;
    assert_eq!((subs[0].child.as_str(), subs[0].parent.as_str()), ("Buy", "Order"));
    assert_eq!(subs[0].label(), "is a kind of");
    assert_eq!((subs[1].child.as_str(), subs[1].parent.as_str()), ("Sell", "Order"));
    assert_eq!(subs[1].label(), "is a variant of");
    assert!(subs[2].is_well_formed());
    assert!(subs[2].is_context);
    assert!(!subs[3].is_well_formed(), "no parent and no external uri");
}

#[test]
fn concept_fields_and_fallbacks() {
    let data = DomainData::from_json_str(PAYLOAD).unwrap();
    let order = &data.concepts[0];
    assert_eq!(order.id.as_deref(), Some("17"));
    assert_eq!(order.identity(), "bkb:Order");
    assert_eq!(order.definition_source(), DefinitionSource::Explicit);
    assert_eq!(order.fibo_match_type(), MatchType::Exact);
    assert!(order.has_direct_fibo());
    assert_eq!(order.sources.len(), 2);
    assert!(order.sources[1].is_context);

    let date = &data.concepts[1];
    assert_eq!(date.identity(), "Date", "blank qname falls back to the name");
    assert_eq!(date.kind, ConceptKind::ContextReference);
    assert_eq!(date.definition_source(), DefinitionSource::Draft);
    assert!(!date.has_direct_fibo(), "fuzzy matches are never direct");
    assert!(date.sources.is_empty());
}

#[test]
fn externals_categorizations_and_properties() {
    let data = DomainData::from_json_str(PAYLOAD).unwrap();
    assert_eq!(data.external_concepts[0].external_type, ExternalType::Omg);
    assert_eq!(data.external_concepts[1].external_type, ExternalType::SchemaOrg);
    assert_eq!(data.external_concepts[1].identity(), "Car");

    assert!(!data.categorizations[0].is_is_a());
    assert!(data.categorizations[1].is_is_a());

    let prop = &data.properties[0];
    assert_eq!(prop.id, "5");
    assert_eq!(prop.type_id.as_deref(), Some("9"));
    assert_eq!(prop.definition_concept_id.as_deref(), Some("17"));
    assert_eq!(data.property_types[0].id, "9");
}

/// Canonical records survive a serialize/parse cycle unchanged.
#[test]
fn canonical_form_reparses() {
    let data = DomainData::from_json_str(PAYLOAD).unwrap();
    let json = serde_json::to_string(&data).unwrap();
    let again = DomainData::from_json_str(&json).unwrap();
    assert_eq!(again, data);
}

#[test]
fn empty_object_is_an_empty_domain() {
    let data = DomainData::from_json_str("{}").unwrap();
    assert!(data.concepts.is_empty());
    assert!(data.domain.name.is_empty());
}

#[test]
fn missing_match_type_is_not_an_explicit_none() {
    let data = DomainData::from_json_str(
        r#"{"concepts": [
            {"name": "A", "fibo_mapping": {"uri": "u"}},
            {"name": "B", "fibo_mapping": {"uri": "u", "match_type": null}},
            {"name": "C", "fibo_mapping": {"uri": "u", "match_type": "NONE"}},
            {"name": "D", "fibo_mapping": {"uri": "u", "match_type": "partial"}}
        ]}"#,
    )
    .unwrap();
    let kinds: Vec<MatchType> = data.concepts.iter().map(|c| c.fibo_match_type()).collect();
    assert_eq!(
        kinds,
        [
            MatchType::Unspecified,
            MatchType::Unspecified,
            MatchType::NoMatch,
            MatchType::Unspecified
        ]
    );
    assert!(kinds.iter().all(|k| !k.is_direct()));
}
