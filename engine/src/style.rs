//! The renderer stylesheet: one rule per class tag.
//!
//! Rules are ordered from generic to specific. A renderer applies every rule
//! whose selector matches an element, later rules overriding earlier ones, so
//! `node.context` after the concept colours turns any context concept white.

use serde::Serialize;

use crate::classes;
use crate::elements::EdgeKind;

/// One style property value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StyleValue {
    /// A numeric value (pixels, weights, opacities).
    Number(f64),
    /// A keyword, colour or data binding such as `data(name)`.
    Text(&'static str),
}

/// A selector and the properties it sets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StyleRule {
    /// `node`, `edge`, `node.<class>` or `edge.<class>`.
    pub selector: &'static str,
    /// Property name/value pairs.
    pub properties: &'static [(&'static str, StyleValue)],
}

impl StyleRule {
    /// Returns the class part of the selector, if any.
    #[must_use]
    pub fn class(&self) -> Option<&'static str> {
        self.selector.split_once('.').map(|(_, class)| class)
    }

    /// Returns one property's value.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<StyleValue> {
        self.properties
            .iter()
            .find(|(name, _)| *name == property)
            .map(|(_, value)| *value)
    }
}

use StyleValue::{Number as N, Text as T};

const SUBSUMPTION: &[(&str, StyleValue)] = &[
    ("width", N(1.0)),
    ("line-color", T("#8e44ad")),
    ("line-style", T("dashed")),
    ("target-arrow-shape", T("triangle")),
    ("target-arrow-color", T("#8e44ad")),
    ("label", T("data(sourceLabel)")),
    ("text-rotation", T("autorotate")),
    ("font-size", N(10.0)),
    ("color", T("#8e44ad")),
    ("text-background-color", T("#ffffff")),
    ("text-background-padding", T("4px")),
    ("z-index", N(100.0)),
];

// Context kinds replace the base class, so their rules stand alone.
const CONTEXT_SUBSUMPTION: &[(&str, StyleValue)] = &[
    ("width", N(1.0)),
    ("line-color", T("#8e44ad")),
    ("line-style", T("dotted")),
    ("target-arrow-shape", T("triangle")),
    ("target-arrow-color", T("#8e44ad")),
    ("label", T("data(sourceLabel)")),
    ("text-rotation", T("autorotate")),
    ("font-size", N(10.0)),
    ("color", T("#8e44ad")),
    ("text-background-color", T("#ffffff")),
    ("text-background-padding", T("4px")),
    ("z-index", N(100.0)),
];

/// The full stylesheet.
pub static STYLESHEET: &[StyleRule] = &[
    StyleRule {
        selector: "edge",
        properties: &[("width", N(2.0)), ("line-color", T("#95a5a6")), ("curve-style", T("bezier"))],
    },
    StyleRule {
        selector: "node",
        properties: &[
            ("shape", T("rectangle")),
            ("width", T("label")),
            ("height", N(36.0)),
            ("padding", T("12px")),
            ("label", T("data(name)")),
            ("text-valign", T("center")),
            ("text-halign", T("center")),
            ("font-size", N(12.0)),
            ("font-weight", N(700.0)),
            ("background-color", T("#dedaff")),
            ("border-width", N(1.0)),
            ("border-color", T("#1a1a1a")),
        ],
    },
    StyleRule { selector: "node.fibo-def", properties: &[("background-color", T("#d5f4e6"))] },
    StyleRule { selector: "node.schema-def", properties: &[("background-color", T("#d4f4f4"))] },
    StyleRule { selector: "node.explicit-aligned", properties: &[("background-color", T("#e3f2fd"))] },
    StyleRule { selector: "node.explicit-domain", properties: &[("background-color", T("#f8d7da"))] },
    StyleRule { selector: "node.inherited", properties: &[("background-color", T("#eceff1"))] },
    StyleRule { selector: "node.draft", properties: &[("background-color", T("#fce4e7"))] },
    StyleRule {
        selector: "node.ghost",
        properties: &[
            ("opacity", N(0.7)),
            ("border-style", T("dotted")),
            ("border-width", N(2.0)),
            ("border-color", T("#888888")),
            ("background-color", T("#f0f0f0")),
            ("color", T("#666666")),
        ],
    },
    StyleRule {
        selector: "node.external",
        properties: &[
            ("background-color", T("#f5f5f5")),
            ("border-style", T("dashed")),
            ("border-width", N(1.0)),
            ("border-color", T("#666666")),
            ("font-style", T("italic")),
            ("color", T("#666666")),
        ],
    },
    StyleRule { selector: "node.hub", properties: &[("font-size", N(14.0)), ("height", N(42.0))] },
    StyleRule {
        selector: "node.context",
        properties: &[
            ("border-style", T("dotted")),
            ("border-width", N(1.0)),
            ("border-color", T("#1a1a1a")),
            ("background-color", T("#ffffff")),
        ],
    },
    StyleRule {
        selector: "node.junction",
        properties: &[
            ("shape", T("ellipse")),
            ("width", N(2.0)),
            ("height", N(2.0)),
            ("background-color", T("#333333")),
            ("border-width", N(0.0)),
            ("padding", N(0.0)),
            ("label", T("")),
        ],
    },
    StyleRule {
        selector: "node.property",
        properties: &[
            ("height", N(28.0)),
            ("padding", T("8px")),
            ("background-color", T("#ffe4c4")),
            ("border-color", T("#d2691e")),
            ("font-size", N(10.0)),
            ("font-weight", N(400.0)),
        ],
    },
    StyleRule {
        selector: "node.property-type",
        properties: &[
            ("height", N(28.0)),
            ("padding", T("8px")),
            ("background-color", T("#e0e0e0")),
            ("border-color", T("#808080")),
            ("font-size", N(10.0)),
            ("font-weight", N(400.0)),
            ("font-style", T("italic")),
        ],
    },
    StyleRule {
        selector: "node.primitive",
        properties: &[("background-color", T("#f0f0f0")), ("border-style", T("dashed")), ("color", T("#808080"))],
    },
    StyleRule {
        selector: "node.highlighted",
        properties: &[
            ("border-color", T("#9b59b6")),
            ("border-width", N(5.0)),
            ("background-color", T("#f5eef8")),
        ],
    },
    StyleRule {
        selector: "edge.relationship",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#9b59b6")),
            ("target-arrow-shape", T("none")),
            ("source-label", T("data(sourceLabel)")),
            ("source-text-offset", N(15.0)),
            ("target-label", T("data(targetLabel)")),
            ("target-text-offset", N(5.0)),
            ("font-size", N(9.0)),
            ("color", T("#8e44ad")),
            ("text-background-color", T("#fff")),
            ("text-background-opacity", N(0.9)),
        ],
    },
    StyleRule {
        selector: "edge.context-rel",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#9b59b6")),
            ("line-style", T("dotted")),
            ("target-arrow-shape", T("none")),
            ("source-label", T("data(sourceLabel)")),
            ("target-label", T("data(targetLabel)")),
            ("font-size", N(9.0)),
            ("color", T("#8e44ad")),
        ],
    },
    StyleRule {
        selector: "edge.isA",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#9370db")),
            ("line-style", T("dashed")),
            ("target-arrow-shape", T("triangle")),
            ("target-arrow-color", T("#9370db")),
            ("source-label", T("data(label)")),
            ("source-text-offset", N(15.0)),
            ("font-size", N(8.0)),
            ("color", T("#9370db")),
        ],
    },
    StyleRule {
        selector: "edge.context-isA",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#9370db")),
            ("line-style", T("dotted")),
            ("target-arrow-shape", T("triangle")),
            ("target-arrow-color", T("#9370db")),
            ("source-label", T("data(label)")),
            ("font-size", N(8.0)),
            ("color", T("#9370db")),
        ],
    },
    StyleRule { selector: "edge.subsumption", properties: SUBSUMPTION },
    StyleRule { selector: "edge.context-subsumption", properties: CONTEXT_SUBSUMPTION },
    StyleRule {
        selector: "edge.transitive",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#999999")),
            ("line-style", T("dotted")),
            ("target-arrow-shape", T("none")),
            ("label", T("data(hops)")),
            ("font-size", N(8.0)),
            ("color", T("#999999")),
        ],
    },
    StyleRule {
        selector: "edge.has-property",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#d2691e")),
            ("source-label", T("data(label)")),
            ("source-text-offset", N(20.0)),
            ("font-size", N(8.0)),
            ("color", T("#d2691e")),
        ],
    },
    StyleRule {
        selector: "edge.has-type",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#808080")),
            ("source-label", T("data(label)")),
            ("source-text-offset", N(15.0)),
            ("font-size", N(8.0)),
            ("color", T("#808080")),
        ],
    },
    StyleRule {
        selector: "edge.trunk",
        properties: &[
            ("line-color", T("#333333")),
            ("curve-style", T("haystack")),
            ("haystack-radius", N(0.5)),
            ("label", T("data(label)")),
            ("font-size", N(10.0)),
            ("color", T("#333333")),
        ],
    },
    StyleRule {
        selector: "edge.branch",
        properties: &[
            ("line-color", T("#333333")),
            ("curve-style", T("unbundled-bezier")),
            ("control-point-distances", N(20.0)),
            ("control-point-weights", N(0.5)),
        ],
    },
    StyleRule {
        selector: "edge.categorization",
        properties: &[
            ("line-color", T("#333333")),
            ("label", T("data(label)")),
            ("font-size", N(10.0)),
            ("color", T("#333333")),
        ],
    },
    StyleRule {
        selector: "edge.extends",
        properties: &[
            ("width", N(1.0)),
            ("line-color", T("#8e44ad")),
            ("line-style", T("dashed")),
            ("target-arrow-shape", T("triangle")),
        ],
    },
];

/// Finds the rule for an exact selector.
#[must_use]
pub fn lookup(selector: &str) -> Option<&'static StyleRule> {
    STYLESHEET.iter().find(|rule| rule.selector == selector)
}

/// Finds the rule for a class tag, whether it styles nodes or edges.
#[must_use]
pub fn rule_for_class(class: &str) -> Option<&'static StyleRule> {
    STYLESHEET.iter().find(|rule| rule.class() == Some(class))
}

/// Every node class tag the builder and the search helper can emit.
pub const NODE_CLASSES: &[&str] = &[
    classes::FIBO_DEF,
    classes::SCHEMA_DEF,
    classes::EXPLICIT_ALIGNED,
    classes::EXPLICIT_DOMAIN,
    classes::INHERITED,
    classes::DRAFT,
    classes::CONTEXT,
    classes::GHOST,
    classes::EXTERNAL,
    classes::HUB,
    classes::JUNCTION,
    classes::PROPERTY,
    classes::PROPERTY_TYPE,
    classes::PRIMITIVE,
    classes::HIGHLIGHTED,
];

/// Every edge class tag.
pub const EDGE_CLASSES: &[&str] = &[
    EdgeKind::Categorization.class(),
    EdgeKind::Trunk.class(),
    EdgeKind::Branch.class(),
    EdgeKind::Relationship.class(),
    EdgeKind::Subsumption.class(),
    EdgeKind::IsA.class(),
    EdgeKind::HasProperty.class(),
    EdgeKind::HasType.class(),
    EdgeKind::Transitive.class(),
    EdgeKind::Extends.class(),
    classes::CONTEXT_REL,
    classes::CONTEXT_IS_A,
    classes::CONTEXT_SUBSUMPTION,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_class_has_a_rule() {
        for class in NODE_CLASSES {
            let rule = lookup(&format!("node.{class}"));
            assert!(rule.is_some(), "no rule for node.{class}");
        }
        for class in EDGE_CLASSES {
            let rule = lookup(&format!("edge.{class}"));
            assert!(rule.is_some(), "no rule for edge.{class}");
        }
    }

    #[test]
    fn selectors_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for rule in STYLESHEET {
            assert!(seen.insert(rule.selector), "duplicate selector {}", rule.selector);
        }
    }

    #[test]
    fn context_overrides_concept_colour() {
        let draft = STYLESHEET.iter().position(|r| r.selector == "node.draft").unwrap();
        let context = STYLESHEET.iter().position(|r| r.selector == "node.context").unwrap();
        assert!(context > draft);
        assert_eq!(
            rule_for_class("context").unwrap().get("background-color"),
            Some(StyleValue::Text("#ffffff"))
        );
        assert_eq!(lookup("node.junction").unwrap().get("label"), Some(StyleValue::Text("")));
    }
}
