//! Rich text blocks as exported by the CMS.
//!
//! Prose fields (section bodies, FAQ answers) arrive as a flat sequence of
//! block objects, each holding styled text spans:
//!
//! ```json
//! [{"_type": "block", "style": "normal", "children": [
//!     {"_type": "span", "text": "Hello ", "marks": []},
//!     {"_type": "span", "text": "bold", "marks": ["strong"]}]}]
//! ```
//!
//! Recognized block styles are `normal`, `h2`, `h3` and `blockquote`; any
//! other style renders as a plain paragraph. Recognized span marks are
//! `strong` and `em`; unrecognized marks are ignored. Span text is always
//! escaped on output, so CMS content can never inject markup.

use maud::{html, Markup};
use serde::Deserialize;

/// One block of rich text: a style plus a run of inline spans.
///
/// Extra fields from the CMS (`_type`, `_key`, `markDefs`, …) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub style: String,
    #[serde(default)]
    pub children: Vec<Span>,
}

/// An inline span of text with optional emphasis marks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

impl Span {
    fn has_mark(&self, mark: &str) -> bool {
        self.marks.iter().any(|m| m == mark)
    }
}

/// Render a block sequence to HTML.
pub fn render_blocks(blocks: &[Block]) -> Markup {
    html! {
        @for block in blocks {
            (render_block(block))
        }
    }
}

fn render_block(block: &Block) -> Markup {
    let inner = render_spans(&block.children);
    match block.style.as_str() {
        "h2" => html! { h2 { (inner) } },
        "h3" => html! { h3 { (inner) } },
        "blockquote" => html! { blockquote { (inner) } },
        // "normal" and anything unrecognized is a paragraph.
        _ => html! { p { (inner) } },
    }
}

fn render_spans(spans: &[Span]) -> Markup {
    html! {
        @for span in spans {
            (render_span(span))
        }
    }
}

/// Marks nest in a fixed order (`strong` outside `em`) so the same spans
/// always produce the same markup, whatever order the CMS listed marks in.
fn render_span(span: &Span) -> Markup {
    let mut markup = html! { (span.text) };
    if span.has_mark("em") {
        markup = html! { em { (markup) } };
    }
    if span.has_mark("strong") {
        markup = html! { strong { (markup) } };
    }
    markup
}

/// Flatten a block sequence to unstyled text, for meta descriptions and
/// terminal summaries. Blocks are joined with single spaces.
pub fn plain_text(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        let text: String = block.children.iter().map(|s| s.text.as_str()).collect();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, marks: &[&str]) -> Span {
        Span {
            text: text.to_string(),
            marks: marks.iter().map(|m| m.to_string()).collect(),
        }
    }

    fn block(style: &str, children: Vec<Span>) -> Block {
        Block {
            style: style.to_string(),
            children,
        }
    }

    #[test]
    fn renders_paragraph_with_marks() {
        let blocks = vec![block(
            "normal",
            vec![span("Hello ", &[]), span("bold", &["strong"])],
        )];
        let html = render_blocks(&blocks).into_string();
        assert_eq!(html, "<p>Hello <strong>bold</strong></p>");
    }

    #[test]
    fn renders_headings_and_quotes() {
        let blocks = vec![
            block("h2", vec![span("Services", &[])]),
            block("h3", vec![span("Details", &[])]),
            block("blockquote", vec![span("Trust the process.", &[])]),
        ];
        let html = render_blocks(&blocks).into_string();
        assert!(html.contains("<h2>Services</h2>"));
        assert!(html.contains("<h3>Details</h3>"));
        assert!(html.contains("<blockquote>Trust the process.</blockquote>"));
    }

    #[test]
    fn unknown_style_falls_back_to_paragraph() {
        let blocks = vec![block("h9", vec![span("odd", &[])])];
        assert_eq!(render_blocks(&blocks).into_string(), "<p>odd</p>");
    }

    #[test]
    fn combined_marks_nest_deterministically() {
        // Mark order in the document must not change the output.
        let a = vec![block("normal", vec![span("x", &["strong", "em"])])];
        let b = vec![block("normal", vec![span("x", &["em", "strong"])])];
        let rendered = render_blocks(&a).into_string();
        assert_eq!(rendered, "<p><strong><em>x</em></strong></p>");
        assert_eq!(rendered, render_blocks(&b).into_string());
    }

    #[test]
    fn unknown_marks_are_ignored() {
        let blocks = vec![block("normal", vec![span("plain", &["highlight"])])];
        assert_eq!(render_blocks(&blocks).into_string(), "<p>plain</p>");
    }

    #[test]
    fn text_is_escaped() {
        let blocks = vec![block("normal", vec![span("1 < 2 & <script>", &[])])];
        let html = render_blocks(&blocks).into_string();
        assert!(html.contains("1 &lt; 2 &amp; &lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn deserializes_cms_export_shape() {
        let json = r#"[{"_type": "block", "style": "normal", "_key": "a1",
            "children": [{"_type": "span", "text": "hi", "marks": []}]}]"#;
        let blocks: Vec<Block> = serde_json::from_str(json).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].children[0].text, "hi");
    }

    #[test]
    fn missing_fields_default() {
        let blocks: Vec<Block> = serde_json::from_str(r#"[{"children": [{"text": "x"}]}]"#).unwrap();
        assert_eq!(render_blocks(&blocks).into_string(), "<p>x</p>");
    }

    #[test]
    fn plain_text_joins_blocks() {
        let blocks = vec![
            block("normal", vec![span("One ", &[]), span("two.", &["strong"])]),
            block("normal", vec![]),
            block("h2", vec![span("Three", &[])]),
        ];
        assert_eq!(plain_text(&blocks), "One two. Three");
    }
}
