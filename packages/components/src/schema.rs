use crate::PropertyBag;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Heading,
    Card,
    Quote,
    Divider,
    Separator,
    List,
    Image,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Heading,
        Category::Card,
        Category::Quote,
        Category::Divider,
        Category::Separator,
        Category::List,
        Category::Image,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Heading => "heading",
            Category::Card => "card",
            Category::Quote => "quote",
            Category::Divider => "divider",
            Category::Separator => "separator",
            Category::List => "list",
            Category::Image => "image",
        }
    }

    pub fn parse(raw: &str) -> Option<Category> {
        let raw = raw.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.as_str() == raw)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Textarea,
    Select,
    Color,
    Switch,
    Number,
    Range,
}

/// What a field controls. Style fields are the ones copied between
/// instances of the same component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldRole {
    Style,
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

/// `values[key] == equals`, with missing keys reading as empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub equals: String,
}

impl Condition {
    pub fn new(key: impl Into<String>, equals: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            equals: equals.into(),
        }
    }

    pub fn matches(&self, values: &PropertyBag) -> bool {
        values.get(&self.key).map(String::as_str).unwrap_or("") == self.equals
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<FieldRole>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_when: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disabled_when: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl FieldSpec {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            default: None,
            role: None,
            options: Vec::new(),
            visible_when: None,
            disabled_when: None,
            placeholder: None,
            min: None,
            max: None,
            step: None,
        }
    }

    pub fn text(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldType::Text)
    }

    pub fn textarea(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldType::Textarea)
    }

    pub fn switch(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(key, label, FieldType::Switch)
    }

    pub fn select(key: impl Into<String>, label: impl Into<String>, options: &[(&str, &str)]) -> Self {
        let mut field = Self::new(key, label, FieldType::Select);
        field.options = options
            .iter()
            .map(|(label, value)| FieldOption {
                label: label.to_string(),
                value: value.to_string(),
            })
            .collect();
        field
    }

    pub fn range(key: impl Into<String>, label: impl Into<String>, min: f64, max: f64, step: f64) -> Self {
        let mut field = Self::new(key, label, FieldType::Range);
        field.min = Some(min);
        field.max = Some(max);
        field.step = Some(step);
        field
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn role(mut self, role: FieldRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.placeholder = Some(text.into());
        self
    }

    pub fn visible_when(mut self, key: impl Into<String>, equals: impl Into<String>) -> Self {
        self.visible_when = Some(Condition::new(key, equals));
        self
    }

    pub fn disabled_when(mut self, key: impl Into<String>, equals: impl Into<String>) -> Self {
        self.disabled_when = Some(Condition::new(key, equals));
        self
    }

    pub fn is_visible(&self, values: &PropertyBag) -> bool {
        self.visible_when.as_ref().map_or(true, |c| c.matches(values))
    }

    pub fn is_disabled(&self, values: &PropertyBag) -> bool {
        self.disabled_when.as_ref().map_or(false, |c| c.matches(values))
    }

    /// Style fields: explicit `role = style`, or no role and a select/color type.
    pub fn is_style(&self) -> bool {
        match self.role {
            Some(role) => role == FieldRole::Style,
            None => matches!(self.field_type, FieldType::Select | FieldType::Color),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldSpec>,
}

impl ComponentSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            title: None,
            description: None,
            fields,
        }
    }

    pub fn field(&self, key: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Field defaults; fields without one default to the empty string.
    pub fn defaults(&self) -> PropertyBag {
        self.fields
            .iter()
            .map(|f| (f.key.clone(), f.default.clone().unwrap_or_default()))
            .collect()
    }

    pub fn style_keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_style())
            .map(|f| f.key.as_str())
            .collect()
    }
}

/// Switch fields store `"1"`/`"0"`, but hand-edited payloads may say
/// `true`, `yes` or `on`.
pub fn is_switch_on(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(pairs: &[(&str, &str)]) -> PropertyBag {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_style_key_rule() {
        let schema = ComponentSchema::new(vec![
            FieldSpec::text("title", "Title"),
            FieldSpec::select("kind", "Kind", &[("Info", "info")]),
            FieldSpec::new("tint", "Tint", FieldType::Color),
            FieldSpec::select("layout", "Layout", &[]).role(FieldRole::Content),
            FieldSpec::range("count", "Count", 1.0, 5.0, 1.0).role(FieldRole::Style),
        ]);
        assert_eq!(schema.style_keys(), vec!["kind", "tint", "count"]);
    }

    #[test]
    fn test_visibility_conditions() {
        let field = FieldSpec::text("caption", "Caption")
            .visible_when("showCaption", "1")
            .disabled_when("locked", "yes");
        assert!(field.is_visible(&bag(&[("showCaption", "1")])));
        assert!(!field.is_visible(&bag(&[])));
        assert!(field.is_disabled(&bag(&[("locked", "yes")])));
        assert!(!field.is_disabled(&bag(&[("locked", "no")])));
    }

    #[test]
    fn test_defaults_fill_missing_with_empty() {
        let schema = ComponentSchema::new(vec![
            FieldSpec::text("a", "A").default_value("x"),
            FieldSpec::text("b", "B"),
        ]);
        assert_eq!(schema.defaults(), bag(&[("a", "x"), ("b", "")]));
    }

    #[test]
    fn test_switch_spellings() {
        assert!(is_switch_on(" TRUE "));
        assert!(is_switch_on("1"));
        assert!(!is_switch_on("0"));
        assert!(!is_switch_on(""));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("Card"), Some(Category::Card));
        assert_eq!(Category::parse("nope"), None);
    }
}
