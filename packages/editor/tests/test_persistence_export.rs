use folio_common::{MockPersistence, PersistenceBridge, RootedFileSystem};
use folio_compiler_inline::{
    CompileError, CompileResult, RenderContext, Snapshot, SnapshotBackend, SnapshotRequest,
};
use folio_editor::{EditSession, EditorError, ExportMode, Format, SyncTiming};
use folio_parser::{parse_fragment, Node};
use folio_theme::ThemeId;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

#[test]
fn test_markdown_opens_as_text_and_saves_as_markup() {
    let mut bridge = MockPersistence::new();
    bridge.add_file("post.md", "# Hi\n\nSome text");

    let session = EditSession::open(&bridge, Path::new("post.md"), SyncTiming::default()).unwrap();
    assert_eq!(session.format(), Format::Text);

    session.save(&mut bridge, Path::new("post.html")).unwrap();
    assert_eq!(
        bridge.read(Path::new("post.html")).unwrap(),
        "<h1>Hi</h1><p>Some text</p>"
    );
}

#[test]
fn test_markup_opens_as_tree_and_saves_as_markdown() {
    let mut bridge = MockPersistence::new();
    bridge.add_file("post.html", "<h2>Title</h2><p>Body</p>");

    let session = EditSession::open(&bridge, Path::new("post.html"), SyncTiming::default()).unwrap();
    assert_eq!(session.format(), Format::Tree);

    session.save(&mut bridge, Path::new("post.md")).unwrap();
    assert_eq!(bridge.read(Path::new("post.md")).unwrap(), "## Title\n\nBody");
}

#[test]
fn test_unknown_extension_is_rejected() {
    let bridge = MockPersistence::new();
    let err = EditSession::open(&bridge, Path::new("photo.png"), SyncTiming::default())
        .err()
        .unwrap();
    assert!(matches!(err, EditorError::UnsupportedFile { .. }));
}

#[test]
fn test_rooted_file_system_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("draft.html"), "<p>Hello</p>").unwrap();
    let mut fs = RootedFileSystem::new(dir.path());

    let mut session = EditSession::open(&fs, Path::new("draft.html"), SyncTiming::default()).unwrap();
    session.insert_component("dividerLine", 99).unwrap();
    session.save(&mut fs, Path::new("out/draft.html")).unwrap();

    let written = std::fs::read_to_string(dir.path().join("out/draft.html")).unwrap();
    assert!(written.starts_with("<p>Hello</p><hr data-comp=\"dividerLine\""));

    let err = session.save(&mut fs, Path::new("../escape.html")).unwrap_err();
    assert!(matches!(err, EditorError::Persistence(_)));
}

#[test]
fn test_article_exports() {
    let session = EditSession::from_markup("<h2 class=\"section\">Title</h2><p>Body</p>", SyncTiming::default())
        .unwrap()
        .with_theme(ThemeId::parse("warm"));

    let body = session.export_body().unwrap();
    assert_eq!(
        body,
        "<section class=\"folio-article\" data-theme=\"warm\"><h2 class=\"section\">Title</h2><p>Body</p></section>"
    );
    assert!(session.export_css().contains(".folio-article"));
    assert!(session.export_clipboard().unwrap().ends_with(&body));

    let inline = session.export_inlined(ExportMode::Inline).unwrap();
    assert!(inline.starts_with("<section"));
    assert!(inline.contains("style=\""));

    let ultra = session.export_inlined(ExportMode::Ultra).unwrap();
    assert!(!ultra.contains("<h2"));
    assert!(!ultra.contains("class="));
}

#[test]
fn test_text_mode_exports_current_text() {
    let mut session = EditSession::from_markdown("first", SyncTiming::default()).unwrap();
    session
        .text_changed("second", std::time::Instant::now())
        .unwrap();
    // No tick yet: the export still reflects the latest text.
    assert!(session.export_body().unwrap().contains("<p>second</p>"));
}

/// Reports the same color for every element it is shown.
#[derive(Default)]
struct FlatBackend {
    released: Rc<Cell<usize>>,
}

struct FlatContext {
    released: Rc<Cell<usize>>,
}

fn count_elements(nodes: &[Node]) -> usize {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .map(|el| 1 + count_elements(&el.children))
        .sum()
}

impl SnapshotBackend for FlatBackend {
    type Context = FlatContext;

    fn acquire(&mut self, _width_px: u32) -> CompileResult<FlatContext> {
        Ok(FlatContext {
            released: self.released.clone(),
        })
    }
}

impl RenderContext for FlatContext {
    fn capture(&mut self, request: &SnapshotRequest) -> CompileResult<Snapshot> {
        let nodes = parse_fragment(&request.article_html)?;
        let mut color = BTreeMap::new();
        color.insert("color".to_string(), "rgb(1, 2, 3)".to_string());
        Ok(Snapshot {
            elements: vec![color; count_elements(&nodes)],
            accent_bars: Vec::new(),
        })
    }

    fn release(&mut self) -> CompileResult<()> {
        self.released.set(self.released.get() + 1);
        Ok(())
    }
}

#[test]
fn test_computed_export_uses_backend() {
    let session = EditSession::from_markup("<p>One</p><p>Two</p>", SyncTiming::default()).unwrap();
    let mut backend = FlatBackend::default();

    let html = session.export_computed(&mut backend).unwrap();
    assert_eq!(backend.released.get(), 1);
    assert_eq!(html.matches("color:rgb(1, 2, 3)").count(), 3);
    assert!(!html.contains("class="));

    let err = session.export_inlined(ExportMode::Computed).unwrap_err();
    assert!(matches!(err, EditorError::Compile(CompileError::ContextUnavailable(_))));
}
