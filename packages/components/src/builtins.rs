//! The built-in component catalog.
//!
//! Renderers emit one root element followed by an empty paragraph, so every
//! instance is a single addressable span and the caret has somewhere to go
//! after an insertion.

use crate::definition::{ComponentDefinition, RenderResult};
use crate::schema::{Category, ComponentSchema, FieldRole, FieldSpec};
use crate::{is_switch_on, PropertyBag};
use folio_parser::{escape_attr, Element, Node};

const CALLOUT_KINDS: &[(&str, &str)] = &[("Info", "info"), ("Warning", "warn"), ("Success", "ok")];

const DIVIDER_PATTERNS: &[(&str, &str)] = &[("Flower", "flower"), ("Wave", "wave")];

const LANTERN_COLORS: &[(&str, &str)] = &[
    ("Festive red", "red"),
    ("Gold", "gold"),
    ("Elegant purple", "purple"),
    ("Fresh green", "green"),
    ("Navy blue", "blue"),
    ("Muted gray", "gray"),
];

fn get<'a>(values: &'a PropertyBag, key: &str) -> &'a str {
    values.get(key).map(String::as_str).unwrap_or("")
}

/// Value of a select field, restricted to its options.
fn choice<'a>(values: &'a PropertyBag, key: &str, options: &[(&str, &'a str)], fallback: &'a str) -> &'a str {
    let raw = get(values, key).trim();
    options
        .iter()
        .map(|(_, v)| *v)
        .find(|v| *v == raw)
        .unwrap_or(fallback)
}

fn esc(text: &str) -> String {
    escape_attr(text)
}

fn esc_with_breaks(text: &str) -> String {
    esc(&text.replace("\r\n", "\n").replace('\r', "\n")).replace('\n', "<br />")
}

fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

fn list_items(text: &str) -> String {
    lines(text)
        .into_iter()
        .map(|line| format!("<li>{}</li>", esc(line)))
        .collect()
}

fn render_titlebar_h2(values: &PropertyBag) -> RenderResult {
    RenderResult::markup(format!(
        r#"<h2 class="titlebar">{}</h2><p></p>"#,
        esc(get(values, "text"))
    ))
}

fn render_badge_h3(values: &PropertyBag) -> RenderResult {
    RenderResult::markup(format!(
        r#"<h3 class="badge">{}</h3><p></p>"#,
        esc(get(values, "text"))
    ))
}

fn render_card(values: &PropertyBag) -> RenderResult {
    let title = if is_switch_on(get(values, "showTitle")) {
        format!(
            r#"<p class="card__title"><strong>{}</strong></p>"#,
            esc(get(values, "title"))
        )
    } else {
        String::new()
    };
    RenderResult::markup(format!(
        r#"<blockquote class="card">{}<p>{}</p></blockquote><p></p>"#,
        title,
        esc_with_breaks(get(values, "body"))
    ))
}

fn render_guide(values: &PropertyBag) -> RenderResult {
    let items = list_items(get(values, "steps"));
    let list = if items.is_empty() {
        String::new()
    } else {
        format!("<ol>{}</ol>", items)
    };
    RenderResult::markup(format!(
        r#"<blockquote class="guide"><p class="guide__kicker"><strong>{}</strong></p>{}</blockquote><p></p>"#,
        esc(get(values, "kicker")),
        list
    ))
}

fn render_royal_frame(values: &PropertyBag) -> RenderResult {
    let caption = if is_switch_on(get(values, "showCaption")) {
        format!(r#"<p class="caption">{}</p>"#, esc(get(values, "caption")))
    } else {
        String::new()
    };
    RenderResult::markup(format!(
        r#"<blockquote class="frame frame--royal"><p class="frame__kicker"><strong>{}</strong></p><p>{}</p>{}</blockquote><p></p>"#,
        esc(get(values, "kicker")),
        esc_with_breaks(get(values, "body")),
        caption
    ))
}

/// The scroll box is a `div`, which the flat-text surface cannot hold as a
/// component body, so this one renders a tree fragment only.
fn render_royal_frame_scroll(values: &PropertyBag) -> RenderResult {
    let mut scroll = Element::new("div").with_attr("class", "frame__scroll");
    for line in lines(get(values, "body")) {
        scroll = scroll.with_child(Element::new("p").with_text(line));
    }

    let frame = Element::new("blockquote")
        .with_attr("class", "frame frame--royal")
        .with_child(
            Element::new("p")
                .with_attr("class", "frame__kicker")
                .with_child(Element::new("strong").with_text(get(values, "kicker"))),
        )
        .with_child(scroll)
        .with_child(
            Element::new("p")
                .with_attr("class", "caption")
                .with_text(get(values, "caption")),
        );

    RenderResult::fragment(vec![frame.into(), Node::Element(Element::new("p"))])
}

fn render_quote_focus(values: &PropertyBag) -> RenderResult {
    RenderResult::markup(format!(
        r#"<blockquote class="quote"><p>{}</p></blockquote><p></p>"#,
        esc_with_breaks(get(values, "text"))
    ))
}

fn render_callout_info(values: &PropertyBag) -> RenderResult {
    let kind = choice(values, "kind", CALLOUT_KINDS, "info");
    RenderResult::markup(format!(
        r#"<blockquote class="callout callout--{}"><p><strong>{}</strong></p><p>{}</p></blockquote><p></p>"#,
        kind,
        esc(get(values, "title")),
        esc_with_breaks(get(values, "body"))
    ))
}

fn render_divider_fancy(values: &PropertyBag) -> RenderResult {
    let pattern = choice(values, "pattern", DIVIDER_PATTERNS, "flower");
    let glyph = if pattern == "wave" { "～" } else { "✦" };
    let count = get(values, "count")
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(|n| n.round().clamp(3.0, 7.0) as usize)
        .unwrap_or(3);
    RenderResult::markup(format!(
        r#"<p class="divider divider--{}">{}</p><p></p>"#,
        pattern,
        vec![glyph; count].join(" ")
    ))
}

fn render_separator_lantern(values: &PropertyBag) -> RenderResult {
    let color = choice(values, "color", LANTERN_COLORS, "red");
    RenderResult::markup(format!(
        r#"<p class="divider divider--lantern divider--c-{}">🧧 🧧 🧧</p><p></p>"#,
        color
    ))
}

fn render_checklist(values: &PropertyBag) -> RenderResult {
    RenderResult::markup(format!("<ul>{}</ul><p></p>", list_items(get(values, "items"))))
}

fn render_steps(values: &PropertyBag) -> RenderResult {
    RenderResult::markup(format!("<ol>{}</ol><p></p>", list_items(get(values, "items"))))
}

/// Definitions in catalog order.
pub fn definitions() -> Vec<ComponentDefinition> {
    vec![
        ComponentDefinition::new("titlebarH2", "Title bar (H2)", Category::Heading)
            .description("Opens a chapter")
            .schema(ComponentSchema::new(vec![FieldSpec::text("text", "Text")
                .default_value("Section title")
                .role(FieldRole::Content)]))
            .renderer(render_titlebar_h2),
        ComponentDefinition::new("badgeH3", "Badge subtitle (H3)", Category::Heading)
            .description("For sub-sections and key points")
            .schema(ComponentSchema::new(vec![FieldSpec::text("text", "Text")
                .default_value("Key point")
                .role(FieldRole::Content)]))
            .renderer(render_badge_h3),
        ComponentDefinition::new("card", "Content card", Category::Card)
            .description("A highlighted block of information")
            .schema(ComponentSchema::new(vec![
                FieldSpec::switch("showTitle", "Show title").default_value("1"),
                FieldSpec::text("title", "Title")
                    .default_value("Card title")
                    .role(FieldRole::Content)
                    .disabled_when("showTitle", "0"),
                FieldSpec::textarea("body", "Body")
                    .default_value("Write the card content here…")
                    .role(FieldRole::Content),
            ]))
            .renderer(render_card),
        ComponentDefinition::new("guide", "Guide (steps)", Category::Card)
            .description("For tutorials and procedures")
            .schema(ComponentSchema::new(vec![
                FieldSpec::text("kicker", "Heading")
                    .default_value("How to")
                    .role(FieldRole::Content),
                FieldSpec::textarea("steps", "Steps (one per line)")
                    .default_value("Step one: …\nStep two: …\nStep three: …")
                    .role(FieldRole::Content),
            ]))
            .renderer(render_guide),
        ComponentDefinition::new("royalFrame", "Royal frame", Category::Card)
            .description("Poster-style frame for announcements and events")
            .schema(ComponentSchema::new(vec![
                FieldSpec::text("kicker", "Heading")
                    .default_value("Event title")
                    .role(FieldRole::Content),
                FieldSpec::textarea("body", "Body")
                    .default_value("Write the content here…")
                    .role(FieldRole::Content),
                FieldSpec::switch("showCaption", "Show caption").default_value("1"),
                FieldSpec::text("caption", "Caption")
                    .default_value("(scroll to read everything)")
                    .role(FieldRole::Content)
                    .visible_when("showCaption", "1"),
            ]))
            .renderer(render_royal_frame),
        ComponentDefinition::new("royalFrameScroll", "Royal frame with scroll box", Category::Card)
            .description("Frame with an independently scrolling inner area")
            .schema(ComponentSchema::new(vec![
                FieldSpec::text("kicker", "Heading")
                    .default_value("Announcement")
                    .role(FieldRole::Content),
                FieldSpec::textarea("body", "Scrolling paragraphs (one per line)")
                    .default_value(
                        "Long content goes here so the article itself stays short.\nYou can add images or lists here too.\nKeep adding paragraphs to make it scroll…",
                    )
                    .role(FieldRole::Content),
                FieldSpec::text("caption", "Caption")
                    .default_value("(the box scrolls; use a plain frame if the platform does not)")
                    .role(FieldRole::Content),
            ]))
            .renderer(render_royal_frame_scroll),
        ComponentDefinition::new("quoteFocus", "Focus quote", Category::Quote)
            .description("For a key opinion or a memorable line")
            .schema(ComponentSchema::new(vec![FieldSpec::textarea("text", "Quote")
                .default_value("“One line worth highlighting between paragraphs.”")
                .role(FieldRole::Content)]))
            .renderer(render_quote_focus),
        ComponentDefinition::new("calloutInfo", "Callout", Category::Quote)
            .schema_version(2)
            .schema(ComponentSchema::new(vec![
                FieldSpec::select("kind", "Kind", CALLOUT_KINDS)
                    .default_value("info")
                    .role(FieldRole::Style),
                FieldSpec::text("title", "Title")
                    .default_value("Info")
                    .role(FieldRole::Content),
                FieldSpec::textarea("body", "Body")
                    .default_value("Write the content here…")
                    .role(FieldRole::Content),
            ]))
            .renderer(render_callout_info),
        ComponentDefinition::new("dividerLine", "Divider (dashed)", Category::Divider)
            .static_markup("<hr /><p></p>"),
        ComponentDefinition::new("dividerFancy", "Divider (ornament)", Category::Divider)
            .schema(ComponentSchema::new(vec![
                FieldSpec::select("pattern", "Pattern", DIVIDER_PATTERNS).default_value("flower"),
                FieldSpec::range("count", "Glyphs", 3.0, 7.0, 1.0)
                    .default_value("3")
                    .role(FieldRole::Style),
            ]))
            .renderer(render_divider_fancy),
        ComponentDefinition::new("separatorLantern", "Lantern separator", Category::Separator)
            .description("Festive lantern separator in a choice of colors")
            .schema(ComponentSchema::new(vec![FieldSpec::select(
                "color",
                "Color",
                LANTERN_COLORS,
            )
            .default_value("red")]))
            .renderer(render_separator_lantern),
        ComponentDefinition::new("checklist", "Checklist", Category::List)
            .schema(ComponentSchema::new(vec![FieldSpec::textarea(
                "items",
                "Items (one per line)",
            )
            .default_value("Point one\nPoint two\nPoint three")
            .role(FieldRole::Content)]))
            .renderer(render_checklist),
        ComponentDefinition::new("steps", "Steps (1-2-3)", Category::List)
            .schema(ComponentSchema::new(vec![FieldSpec::textarea(
                "items",
                "Steps (one per line)",
            )
            .default_value("Step one: write the point\nStep two: explain it\nStep three: conclude")
            .role(FieldRole::Content)]))
            .renderer(render_steps),
        ComponentDefinition::new("imageCaption", "Image with caption", Category::Image)
            .static_markup(
                r#"<p><img src="https://placehold.co/900x520/png" alt="Sample image" /></p><p class="caption">Caption: one line describing the image</p><p></p>"#,
            ),
    ]
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
    fn test_text_is_escaped() {
        let out = render_titlebar_h2(&bag(&[("text", "<b>\"A&B\"</b>")]));
        assert_eq!(
            out.markup.as_deref(),
            Some(r#"<h2 class="titlebar">&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;</h2><p></p>"#)
        );
    }

    #[test]
    fn test_callout_kind_is_restricted() {
        let out = render_callout_info(&bag(&[("kind", "evil\" onclick=\"x"), ("title", "T")]));
        assert!(out.markup.unwrap().starts_with(r#"<blockquote class="callout callout--info">"#));
    }

    #[test]
    fn test_card_without_title() {
        let out = render_card(&bag(&[("showTitle", "0"), ("body", "a\nb")]));
        assert_eq!(
            out.markup.as_deref(),
            Some(r#"<blockquote class="card"><p>a<br />b</p></blockquote><p></p>"#)
        );
    }

    #[test]
    fn test_divider_count_is_clamped() {
        let out = render_divider_fancy(&bag(&[("pattern", "wave"), ("count", "12")]));
        assert_eq!(
            out.markup.as_deref(),
            Some(r#"<p class="divider divider--wave">～ ～ ～ ～ ～ ～ ～</p><p></p>"#)
        );
    }

    #[test]
    fn test_scroll_frame_is_fragment_only() {
        let out = render_royal_frame_scroll(&bag(&[("body", "a\n\nb"), ("kicker", "K")]));
        assert!(out.markup.is_none());
        let nodes = out.fragment.unwrap();
        assert_eq!(nodes.len(), 2);
        let frame = nodes[0].as_element().unwrap();
        assert!(frame.has_class("frame--royal"));
        let scroll = frame.children[1].as_element().unwrap();
        assert!(scroll.has_class("frame__scroll"));
        assert_eq!(scroll.children.len(), 2);
    }
}
