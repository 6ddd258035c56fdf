//! The page a render context loads and the script that reads it back.

use folio_compiler_inline::SnapshotRequest;
use folio_theme::ARTICLE_CLASS;

/// Id of the fixed-width element the article is laid out in.
pub const HOST_ID: &str = "folio-snapshot-host";

/// Full HTML document for one capture.
pub fn snapshot_page(request: &SnapshotRequest) -> String {
    format!(
        concat!(
            "<!doctype html>\n",
            "<html><head><meta charset=\"utf-8\"></head>\n",
            "<body style=\"margin:0\">\n",
            "<div id=\"{host}\" style=\"position:fixed;left:0;top:0;width:{width}px;\">\n",
            "<style>{css}</style>\n",
            "{article}\n",
            "</div>\n",
            "</body></html>\n"
        ),
        host = HOST_ID,
        width = request.width_px,
        css = request.css.replace("</style", "<\\/style"),
        article = request.article_html,
    )
}

/// Script evaluated in the tab. Returns the snapshot as a JSON string:
/// the article root then every descendant element in document order,
/// followed by the `::before` bars of the accent selector.
pub fn snapshot_script(request: &SnapshotRequest) -> String {
    let properties = serde_json::to_string(&request.properties).unwrap_or_else(|_| "[]".to_string());
    let selector = serde_json::to_string(&request.accent_bar_selector).unwrap_or_else(|_| "\"\"".to_string());
    let root = serde_json::to_string(&format!("#{} .{}", HOST_ID, ARTICLE_CLASS))
        .unwrap_or_else(|_| "\"\"".to_string());

    format!(
        r#"(() => {{
  const props = {properties};
  const root = document.querySelector({root});
  if (!root) return JSON.stringify({{ elements: [], accentBars: [] }});
  const read = (el) => {{
    const cs = getComputedStyle(el);
    const out = {{}};
    for (const p of props) out[p] = cs.getPropertyValue(p);
    return out;
  }};
  const elements = [root, ...root.querySelectorAll('*')].map(read);
  const accentBars = Array.from(root.querySelectorAll({selector})).map((el) => {{
    const cs = getComputedStyle(el, '::before');
    return {{ backgroundColor: cs.getPropertyValue('background-color'), width: cs.getPropertyValue('width') }};
  }});
  return JSON.stringify({{ elements, accentBars }});
}})()"#
    )
}
