use crate::ast::{is_void_tag, Attribute, Document, Element, Node};
use crate::error::{ParseError, ParseResult};
use crate::tokenizer::{tokenize, Token};
use regex::Regex;
use std::sync::OnceLock;

/// Maximum element nesting accepted by the parser.
pub const MAX_DEPTH: usize = 256;

/// Lenient markup parser producing a [`Document`].
///
/// Unknown or unbalanced markup is recovered from rather than rejected:
/// stray closing tags are dropped, unclosed elements are closed at the end
/// of input, and a closing tag implicitly closes any elements opened inside
/// it.
pub struct Parser<'src> {
    source: &'src str,
    stack: Vec<Element>,
    root: Vec<Node>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    pub fn parse_nodes(mut self) -> ParseResult<Vec<Node>> {
        for (token, span) in tokenize(self.source) {
            match token {
                Token::OpenTag(raw) => {
                    let Some(tag) = token.tag_name() else {
                        continue;
                    };
                    let element = Element {
                        tag: tag.clone(),
                        attributes: parse_attributes(raw),
                        children: Vec::new(),
                    };
                    if token.is_self_closing() || is_void_tag(&tag) {
                        self.push_node(Node::Element(element));
                    } else {
                        if self.stack.len() >= MAX_DEPTH {
                            return Err(ParseError::nesting_too_deep(span.start, MAX_DEPTH));
                        }
                        self.stack.push(element);
                    }
                }
                Token::CloseTag(_) => {
                    if let Some(tag) = token.tag_name() {
                        self.close(&tag);
                    }
                }
                Token::Text(raw) | Token::Lt(raw) => {
                    self.push_text(&decode_entities(raw));
                }
                Token::Comment(_) | Token::Doctype(_) => {}
            }
        }

        while let Some(element) = self.stack.pop() {
            self.push_node(Node::Element(element));
        }

        Ok(self.root)
    }

    fn close(&mut self, tag: &str) {
        if !self.stack.iter().any(|el| el.tag == tag) {
            return;
        }
        while let Some(element) = self.stack.pop() {
            let done = element.tag == tag;
            self.push_node(Node::Element(element));
            if done {
                break;
            }
        }
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn push_text(&mut self, text: &str) {
        // Formatting whitespace between blocks is not content.
        if text.trim().is_empty() && text.contains('\n') {
            return;
        }
        let siblings = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let Some(Node::Text { content }) = siblings.last_mut() {
            content.push_str(text);
        } else {
            siblings.push(Node::text(text));
        }
    }
}

/// Parse markup into a document.
pub fn parse(source: &str) -> ParseResult<Document> {
    Ok(Document::new(parse_fragment(source)?))
}

/// Parse markup into a node list.
pub fn parse_fragment(source: &str) -> ParseResult<Vec<Node>> {
    Parser::new(source).parse_nodes()
}

/// Parse the attributes of a raw opening tag such as `<p class="a" hidden>`.
pub fn parse_attributes(open_tag: &str) -> Vec<Attribute> {
    static ATTR_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ATTR_REGEX.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
            .unwrap()
    });

    let body = open_tag
        .trim_start_matches('<')
        .trim_end_matches('>')
        .trim_end()
        .trim_end_matches('/');
    // Skip the tag name itself.
    let body = body
        .find(|c: char| c.is_whitespace())
        .map(|i| &body[i..])
        .unwrap_or("");

    re.captures_iter(body)
        .map(|caps| {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            Attribute {
                name: caps[1].to_ascii_lowercase(),
                value,
            }
        })
        .collect()
}

/// Decode the character references markup producers commonly emit.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => {
                    entity[1..].parse::<u32>().ok().and_then(char::from_u32)
                }
                _ => None,
            };
            ch.map(|c| (c, end))
        });
        match decoded {
            Some((c, end)) => {
                out.push(c);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
