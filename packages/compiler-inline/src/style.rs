/// Ordered inline declarations with last-write-wins per property.
///
/// Overwriting a property moves it to the end, so a later longhand still
/// overrides an earlier shorthand (and the other way round) exactly as it
/// would in a concatenated style attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDecls {
    entries: Vec<(String, String)>,
}

impl StyleDecls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an existing `style` attribute. Malformed pieces are dropped.
    pub fn parse(style: &str) -> Self {
        let mut decls = Self::new();
        for piece in style.split(';') {
            if let Some((prop, value)) = piece.split_once(':') {
                decls.set(prop, value);
            }
        }
        decls
    }

    /// Set a declaration. Blank values are ignored.
    pub fn set(&mut self, property: &str, value: &str) {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        if property.is_empty() || value.is_empty() {
            return;
        }
        self.entries.retain(|(p, _)| *p != property);
        self.entries.push((property, value.to_string()));
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn extend<'a>(&mut self, decls: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (property, value) in decls {
            self.set(property, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// `prop:value;prop:value`
    pub fn to_attr(&self) -> String {
        self.entries
            .iter()
            .map(|(p, v)| format!("{}:{}", p, v))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_write_moves_to_end() {
        let mut decls = StyleDecls::parse("border-left: 4px solid red; margin:0");
        decls.set("border", "1px solid #ccc");
        decls.set("border-left", "none");
        assert_eq!(decls.to_attr(), "margin:0;border:1px solid #ccc;border-left:none");
    }

    #[test]
    fn test_parse_skips_garbage() {
        let decls = StyleDecls::parse(";;color:red;nonsense; :x;width:");
        assert_eq!(decls.to_attr(), "color:red");
    }
}
