//! The directive compiler driver.
//!
//! Walks the parsed document, finds every link or image whose destination
//! starts with `$`, evaluates the expression against a fresh content root,
//! validates the resulting directive's placement, and attaches it to the
//! node. Failures become diagnostics; the walk always continues so one
//! build reports every error in the document.

pub mod diagnostics;
mod preprocess;

use std::collections::HashMap;

use comrak::nodes::AstNode;
use comrak::{Arena, parse_document};

use crate::ast::{Node, NodeId, NodeKind};
use crate::config::Config;
use crate::directive::{Content, Directive};
use crate::script;
use crate::validate;
use crate::value::Value;
use diagnostics::{Diagnostic, Location};

/// A parsed document with directives attached.
///
/// Directives live in a side map keyed by node identity; the tree itself
/// is only mutated where a katex directive consumed its code child.
pub struct Compiled<'a> {
    pub root: &'a AstNode<'a>,
    pub diagnostics: Vec<Diagnostic>,
    directives: HashMap<NodeId, Directive>,
}

impl<'a> Compiled<'a> {
    /// The directive attached to `node`, if any.
    pub fn directive(&self, node: &'a AstNode<'a>) -> Option<&Directive> {
        self.directives.get(&Node::new(node).id())
    }

    pub fn directive_count(&self) -> usize {
        self.directives.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Render the annotated tree for inspection.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_node(Node::new(self.root), 0, &mut out);
        out
    }

    fn dump_node(&self, node: Node<'a>, depth: usize, out: &mut String) {
        use std::fmt::Write;

        let _ = write!(out, "{:indent$}{}", "", node.kind().name(), indent = depth * 2);
        if let Some(literal) = node.literal() {
            let _ = write!(out, " {literal:?}");
        }
        if let Some(directive) = self.directives.get(&node.id()) {
            let _ = write!(out, " -> {directive:?}");
        }
        out.push('\n');

        for child in node.children() {
            self.dump_node(child, depth + 1, out);
        }
    }
}

/// Parse and compile one document.
pub fn compile<'a>(
    arena: &'a Arena<AstNode<'a>>,
    input: &str,
    config: &Config,
) -> Compiled<'a> {
    let source = preprocess::rewrite_spaced_destinations(input);
    let root = parse_document(arena, &source, &config.comrak_options());

    let mut directives = HashMap::new();
    let mut diagnostics = Vec::new();

    // Collect first: katex validation unlinks nodes mid-walk.
    let candidates: Vec<Node<'a>> = root
        .descendants()
        .map(Node::new)
        .filter(|node| matches!(node.kind(), NodeKind::Link | NodeKind::Image))
        .collect();

    for node in candidates {
        let Some(url) = node.url() else { continue };
        let Some(expression) = url.strip_prefix('$') else {
            continue;
        };
        log::debug!("evaluating directive expression: {expression}");

        let content = Content::new();
        match script::eval(Value::Content(&content), expression) {
            Value::Directive(cell) => {
                let mut directive = cell.borrow().clone();
                match validate::placement(node, &mut directive) {
                    Ok(()) => {
                        directives.insert(node.id(), directive);
                    }
                    Err(message) => {
                        diagnostics.push(Diagnostic::error(Location::from_node(node), message));
                    }
                }
            }
            Value::Err(message) => {
                diagnostics.push(Diagnostic::error(Location::from_node(node), message));
            }
            _ => {
                diagnostics.push(Diagnostic::error(
                    Location::from_node(node),
                    "expression did not produce a directive",
                ));
            }
        }
    }

    diagnostics.sort_by_key(|diagnostic| diagnostic.location);
    Compiled {
        root,
        diagnostics,
        directives,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_str<'a>(arena: &'a Arena<AstNode<'a>>, input: &str) -> Compiled<'a> {
        compile(arena, input, &Config::default())
    }

    #[test]
    fn plain_documents_have_nothing_attached() {
        let arena = Arena::new();
        let compiled = compile_str(&arena, "# Hello\n\n[link](https://example.com)\n");
        assert_eq!(compiled.directive_count(), 0);
        assert!(!compiled.has_errors());
    }

    #[test]
    fn one_bad_directive_does_not_stop_the_walk() {
        let arena = Arena::new();
        let input = "# [A]($heading.id('a').id('b'))\n\n# [B]($heading.id('ok'))\n";
        let compiled = compile_str(&arena, input);

        assert_eq!(compiled.diagnostics.len(), 1);
        assert_eq!(compiled.diagnostics[0].message, "field already set");
        assert_eq!(compiled.diagnostics[0].location.line, 1);
        // The second heading still compiled.
        assert_eq!(compiled.directive_count(), 1);
    }

    #[test]
    fn diagnostics_come_out_in_document_order() {
        let arena = Arena::new();
        let input = "[a]($nope)\n\n[b]($link)\n";
        let compiled = compile_str(&arena, input);
        assert_eq!(compiled.diagnostics.len(), 2);
        assert!(compiled.diagnostics[0].location.line < compiled.diagnostics[1].location.line);
    }

    #[test]
    fn dump_shows_attached_directives() {
        let arena = Arena::new();
        let compiled = compile_str(&arena, "# [W]($heading.id('w'))\n");
        let dump = compiled.dump();
        assert!(dump.contains("document"));
        assert!(dump.contains("heading"));
        assert!(dump.contains("id: Some(\"w\")"));
    }
}
