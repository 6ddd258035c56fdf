//! Markdown bridge between the two representations.
//!
//! Tree to text writes plain Markdown for prose and keeps component blocks
//! (marker or inference match) as raw markup so they stay locatable and
//! editable in the flat text. Text to tree renders Markdown with raw markup
//! passed through and parses the result.

use crate::errors::EditorResult;
use folio_components::COMPONENT_ATTR;
use folio_locator::infer_component;
use folio_parser::{escape_text, parse, serialize_nodes, Document, Element, Node};
use pulldown_cmark::{html, Event, Options, Parser};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, instrument};

/// Elements written out as raw markup even when they are not components.
const KEPT_AS_MARKUP: &[&str] = &["img", "span", "div"];

/// Whether `el` is written to text as a raw component block.
pub fn is_component_block(el: &Element) -> bool {
    el.attr(COMPONENT_ATTR).is_some() || infer_component(&el.tag, el.class()).is_some()
}

/// Flat-text projection of a tree.
#[instrument(skip(doc), fields(nodes = doc.children.len()))]
pub fn tree_to_markdown(doc: &Document) -> String {
    let mut writer = MarkdownWriter::default();
    let blocks = writer.blocks(&doc.children);
    let text = blocks.join("\n\n");
    debug!(blocks = blocks.len(), raw = writer.raw_blocks, "wrote markdown");
    text
}

/// Render Markdown to markup. Single newlines become line breaks.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let events = Parser::new_ext(markdown, options).map(|event| match event {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });

    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, events);
    out
}

/// Tree derived from Markdown text.
pub fn markdown_to_tree(markdown: &str) -> EditorResult<Document> {
    Ok(parse(&markdown_to_html(markdown))?)
}

#[derive(Default)]
struct MarkdownWriter {
    raw_blocks: usize,
}

impl MarkdownWriter {
    fn blocks(&mut self, nodes: &[Node]) -> Vec<String> {
        let mut blocks = Vec::new();
        let mut inline_run: Vec<&Node> = Vec::new();

        for node in nodes {
            match node {
                Node::Element(el) if is_block(el) => {
                    self.flush_inline(&mut inline_run, &mut blocks);
                    if let Some(block) = self.block(el) {
                        if !block.trim().is_empty() {
                            blocks.push(block);
                        }
                    }
                }
                other => inline_run.push(other),
            }
        }
        self.flush_inline(&mut inline_run, &mut blocks);
        blocks
    }

    fn flush_inline(&mut self, run: &mut Vec<&Node>, blocks: &mut Vec<String>) {
        if run.is_empty() {
            return;
        }
        let text = run.iter().map(|n| self.inline(n)).collect::<String>();
        let text = text.trim();
        if !text.is_empty() {
            blocks.push(text.to_string());
        }
        run.clear();
    }

    fn raw(&mut self, el: &Element) -> String {
        self.raw_blocks += 1;
        single_line(&serialize_nodes(&[Node::Element(el.clone())]))
    }

    fn block(&mut self, el: &Element) -> Option<String> {
        if is_component_block(el) {
            return Some(self.raw(el));
        }

        let tag = el.tag.as_str();
        let text = match tag {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = tag[1..].parse::<usize>().unwrap_or(1);
                format!("{} {}", "#".repeat(level), self.inline_children(el).trim())
            }
            "p" => self.inline_children(el).trim().to_string(),
            "blockquote" => {
                let inner = self.blocks(&el.children).join("\n\n");
                prefix_lines(&inner, "> ", ">")
            }
            "ul" | "ol" => self.list(el),
            "pre" => fenced_code(el),
            "hr" => "---".to_string(),
            _ => self.raw(el),
        };
        Some(text)
    }

    fn list(&mut self, el: &Element) -> String {
        let ordered = el.tag == "ol";
        let mut items = Vec::new();
        for (n, item) in el
            .children
            .iter()
            .filter_map(Node::as_element)
            .filter(|child| child.tag == "li")
            .enumerate()
        {
            let marker = if ordered {
                format!("{}. ", n + 1)
            } else {
                "- ".to_string()
            };
            let body = self.blocks(&item.children).join("\n\n");
            let indent = " ".repeat(marker.len());
            let mut lines = body.lines();
            let mut out = format!("{}{}", marker, lines.next().unwrap_or(""));
            for line in lines {
                out.push('\n');
                if !line.is_empty() {
                    out.push_str(&indent);
                    out.push_str(line);
                }
            }
            items.push(out);
        }
        items.join("\n")
    }

    fn inline_children(&mut self, el: &Element) -> String {
        el.children.iter().map(|n| self.inline(n)).collect()
    }

    fn inline(&mut self, node: &Node) -> String {
        let el = match node {
            Node::Text { content } => return escape_markdown(content),
            Node::Element(el) => el,
        };

        if KEPT_AS_MARKUP.contains(&el.tag.as_str()) || is_component_block(el) {
            return self.raw(el);
        }

        match el.tag.as_str() {
            "strong" | "b" => wrap_inline(&self.inline_children(el), "**"),
            "em" | "i" => wrap_inline(&self.inline_children(el), "_"),
            "s" | "del" => wrap_inline(&self.inline_children(el), "~~"),
            "code" => code_span(&el.text_content()),
            "br" => "  \n".to_string(),
            "a" => {
                let label = self.inline_children(el);
                let href = el.attr("href").unwrap_or("");
                match el.attr("title").filter(|t| !t.is_empty()) {
                    Some(title) => format!("[{}]({} \"{}\")", label, href, title.replace('"', "\\\"")),
                    None => format!("[{}]({})", label, href),
                }
            }
            _ => self.raw(el),
        }
    }
}

/// Markup for a raw block of flat text. Line breaks become character
/// references: a blank line would end a raw HTML block in Markdown.
pub(crate) fn single_line(markup: &str) -> String {
    let mut out = String::with_capacity(markup.len());
    for ch in markup.chars() {
        match ch {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            other => out.push(other),
        }
    }
    out
}

fn is_block(el: &Element) -> bool {
    matches!(
        el.tag.as_str(),
        "p" | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "blockquote"
            | "ul"
            | "ol"
            | "pre"
            | "hr"
            | "div"
            | "section"
            | "figure"
            | "table"
    ) || is_component_block(el)
}

fn wrap_inline(content: &str, delimiter: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    format!("{}{}{}", delimiter, trimmed, delimiter)
}

fn code_span(code: &str) -> String {
    if code.contains('`') {
        format!("`` {} ``", code)
    } else {
        format!("`{}`", code)
    }
}

fn fenced_code(pre: &Element) -> String {
    let code = pre
        .children
        .iter()
        .filter_map(Node::as_element)
        .find(|child| child.tag == "code");
    let language = code
        .and_then(|c| c.class().split_whitespace().find_map(|cls| cls.strip_prefix("language-")))
        .unwrap_or("");
    let body = code.map(Element::text_content).unwrap_or_else(|| pre.text_content());
    let fence = if body.contains("```") { "~~~" } else { "```" };
    format!("{}{}\n{}\n{}", fence, language, body.trim_end_matches('\n'), fence)
}

fn prefix_lines(text: &str, prefix: &str, empty_prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                empty_prefix.to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Escape prose so Markdown renders it back literally.
fn escape_markdown(text: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static LINE_START: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s*\n\s*").unwrap());
    let line_start = LINE_START.get_or_init(|| Regex::new(r"(?m)^(\s*)([#+=-]|\d+\.)").unwrap());

    let collapsed = whitespace.replace_all(text, " ");
    let mut out = String::with_capacity(collapsed.len());
    for ch in escape_text(&collapsed).chars() {
        if matches!(ch, '\\' | '*' | '_' | '`' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
    line_start
        .replace_all(&out, |caps: &regex::Captures| {
            let marker = &caps[2];
            match marker.strip_suffix('.') {
                Some(number) => format!("{}{}\\.", &caps[1], number),
                None => format!("{}\\{}", &caps[1], marker),
            }
        })
        .into_owned()
}
