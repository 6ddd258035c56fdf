use crate::error::ComponentResult;
use crate::PropertyBag;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last-applied property values per component id.
///
/// Lives for the process. The host decides whether to persist it; the JSON
/// form is a plain `{ componentId: { key: value } }` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedDefaults {
    entries: BTreeMap<String, PropertyBag>,
}

impl SavedDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, component_id: &str) -> Option<&PropertyBag> {
        self.entries.get(component_id)
    }

    pub fn save(&mut self, component_id: impl Into<String>, values: PropertyBag) {
        self.entries.insert(component_id.into(), values);
    }

    pub fn remove(&mut self, component_id: &str) -> Option<PropertyBag> {
        self.entries.remove(component_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_json(text: &str) -> ComponentResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> ComponentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shape() {
        let mut saved = SavedDefaults::new();
        let mut values = PropertyBag::new();
        values.insert("kind".into(), "warn".into());
        saved.save("calloutInfo", values.clone());

        let json = saved.to_json().unwrap();
        assert!(json.contains("\"calloutInfo\""));
        let back = SavedDefaults::from_json(&json).unwrap();
        assert_eq!(back.get("calloutInfo"), Some(&values));
        assert!(SavedDefaults::from_json("  ").unwrap().is_empty());
        assert!(SavedDefaults::from_json("[]").is_err());
    }
}
