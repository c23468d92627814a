use ego_tree::iter::Edge;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use scraper::node::Node;
use scraper::{Html, HtmlTreeSink};

pub trait Extractor: Send + Sync {
    fn extract_text(&self, html: &str) -> String;
}

/// Plain-text extractor for archived pages:
/// - walks the parsed document as a stream of open/close edges
/// - drops text inside `script`, `style` and `noscript`
/// - trims every remaining text node and joins the non-empty ones with `\n`.
///
/// The skip state is a single slot: opening any skip tag replaces it and the
/// first closing tag with the same name clears it. Documents are parsed with
/// scripting disabled so `noscript` children are elements, not raw text.
#[derive(Debug, Default, Clone, Copy)]
pub struct VisibleTextExtractor;

const SKIP_TAGS: [&str; 3] = ["script", "style", "noscript"];

impl Extractor for VisibleTextExtractor {
    fn extract_text(&self, html: &str) -> String {
        let doc = parse_without_scripting(html);
        let mut chunks: Vec<&str> = Vec::new();
        let mut skipping: Option<&str> = None;

        for edge in doc.tree.root().traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Element(element) if SKIP_TAGS.contains(&element.name()) => {
                        skipping = Some(element.name());
                    }
                    Node::Text(text) if skipping.is_none() => {
                        let cleaned = text.trim();
                        if !cleaned.is_empty() {
                            chunks.push(cleaned);
                        }
                    }
                    _ => {}
                },
                Edge::Close(node) => {
                    if let Node::Element(element) = node.value() {
                        if skipping == Some(element.name()) {
                            skipping = None;
                        }
                    }
                }
            }
        }

        chunks.join("\n")
    }
}

fn parse_without_scripting(html: &str) -> Html {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    html5ever::parse_document(HtmlTreeSink::new(Html::new_document()), opts).one(html)
}
