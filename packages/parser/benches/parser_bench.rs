use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_parser::{parse, serialize};

fn parse_simple_card(c: &mut Criterion) {
    let source = r#"<blockquote class="card"><p class="card__title"><strong>Title</strong></p><p>Body text</p></blockquote>"#;

    c.bench_function("parse_simple_card", |b| b.iter(|| parse(black_box(source))));
}

fn parse_large_article(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(
            r#"<h2 class="titlebar">Section {i}</h2>
<p>Paragraph <strong>{i}</strong> with <a href="https://example.com/{i}">a link</a>.</p>
<blockquote class="callout callout--info"><p><strong>Note</strong></p><p>Callout {i}</p></blockquote>
<hr />
"#
        ));
    }

    c.bench_function("parse_large_article_500_sections", |b| {
        b.iter(|| parse(black_box(&source)))
    });
}

fn serialize_large_article(c: &mut Criterion) {
    let mut source = String::new();
    for i in 0..500 {
        source.push_str(&format!(r#"<p class="lead">Line {i} &amp; more</p><hr />"#));
    }
    let doc = parse(&source).unwrap();

    c.bench_function("serialize_large_article", |b| {
        b.iter(|| serialize(black_box(&doc)))
    });
}

fn tokenize_only(c: &mut Criterion) {
    use folio_parser::tokenize;

    let source = r#"<section data-theme="warm"><h1>Title</h1><p>a &lt; b</p><!-- note --><img src="x.png" alt="x"></section>"#;

    c.bench_function("tokenize_only", |b| b.iter(|| tokenize(black_box(source))));
}

criterion_group!(
    benches,
    parse_simple_card,
    parse_large_article,
    serialize_large_article,
    tokenize_only
);
criterion_main!(benches);
