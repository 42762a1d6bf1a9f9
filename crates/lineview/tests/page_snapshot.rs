use insta::assert_snapshot;
use lineview::app::navigation::History;
use lineview::app::page::{PageRenderer, RenderOptions};
use lineview::app::registry::PageLines;
use lineview::app::selector::RangeSelector;
use lineview::app::source::SourceFile;
use lineview::infra::config::Config;

const SOURCE: &str = "fn max(a: i32, b: i32) -> i32 {
    if a > b && b < 0 { a }
    else { b }
}
";

#[test]
fn page_lines_reflect_fragment_selection() {
    let config = Config::default();
    let source = SourceFile::from_text("max.rs", SOURCE);
    let registry = PageLines::new(source.line_count(), config.ids.scheme());

    let mut selector = RangeSelector::new(registry, History::new("#L2-L3"));
    assert!(selector.init_from_fragment("#L2-L3"));
    let (registry, _) = selector.into_parts();

    let mut options = RenderOptions::from_config(&config);
    options.syntax = false;
    let rendered = PageRenderer::new()
        .expect("renderer")
        .render(&source, &registry, &options)
        .expect("render page");

    let line_markup = rendered
        .lines()
        .filter(|line| line.contains(r#"id="L"#) || line.contains(r#"id="codeline-"#))
        .collect::<Vec<_>>()
        .join("\n");
    assert_snapshot!("page_lines", line_markup);
}
