//! Fallback component inference for elements without an explicit marker.
//!
//! Markup written before markers existed is still recognized by its shape.
//! The match is a plain substring test on the raw class attribute, so a
//! hand-written `<blockquote class="cardboard">` also reads as a card. Rules
//! are tried in order and the first hit wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceRule {
    pub tag: &'static str,
    pub class: &'static str,
    pub component: &'static str,
}

pub const INFERENCE_RULES: &[InferenceRule] = &[
    InferenceRule {
        tag: "blockquote",
        class: "card",
        component: "card",
    },
    InferenceRule {
        tag: "blockquote",
        class: "callout",
        component: "calloutInfo",
    },
    InferenceRule {
        tag: "h2",
        class: "titlebar",
        component: "titlebarH2",
    },
];

/// Component id inferred from an element's tag and raw class attribute.
pub fn infer_component(tag: &str, class: &str) -> Option<&'static str> {
    INFERENCE_RULES
        .iter()
        .find(|rule| rule.tag.eq_ignore_ascii_case(tag) && class.contains(rule.class))
        .map(|rule| rule.component)
}

/// Whether `tag` appears anywhere in the inference table.
pub fn is_inferable_tag(tag: &str) -> bool {
    INFERENCE_RULES
        .iter()
        .any(|rule| rule.tag.eq_ignore_ascii_case(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_is_table_order() {
        assert_eq!(infer_component("blockquote", "card callout"), Some("card"));
        assert_eq!(infer_component("blockquote", "callout callout--warn"), Some("calloutInfo"));
        assert_eq!(infer_component("BLOCKQUOTE", "cardboard"), Some("card"));
        assert_eq!(infer_component("h2", "titlebar"), Some("titlebarH2"));
        assert_eq!(infer_component("h3", "titlebar"), None);
        assert_eq!(infer_component("blockquote", "quote"), None);
    }

    #[test]
    fn test_inferable_tags() {
        assert!(is_inferable_tag("h2"));
        assert!(is_inferable_tag("blockquote"));
        assert!(!is_inferable_tag("p"));
    }
}
