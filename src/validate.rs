//! Context-sensitive placement rules.
//!
//! A directive that evaluated cleanly can still be illegal where it
//! stands: a section placeholder buried in a quote block, a block
//! definition that shares its quote with prose, a katex directive with no
//! formula to wrap. These rules run after the expression and before the
//! directive is attached, so every attached directive sits in a legal
//! position.

use crate::ast::{Node, NodeKind};
use crate::builtins;
use crate::directive::{Body, Directive, Src};

const SECTION_PLACEMENT: &str = "sections must be top level elements or be embedded in headings";
const BLOCK_EMBEDS_TEXT: &str = "block definitions directly under a quote block cannot embed any \
                                 text, use a heading to give the block a title";
const TEXT_NEEDS_TEXT: &str = "text directive must contain some text between square brackets";
const KATEX_NEEDS_CODE: &str =
    "katex directives must wrap an inline code element that contains the formula";
const REF_NEEDS_PAGE: &str =
    "'ref' and 'alternative' can only be specified when linking to a content page";
const LINK_NEEDS_SRC: &str =
    "missing call to 'url', 'asset', 'siteAsset', 'buildAsset', 'page', 'sub' or 'sibling'";

/// Check the directive against its node's surroundings.
///
/// May mutate both sides: katex copies the wrapped formula out of the tree
/// and unlinks the code node, and link directives synthesize a self-page
/// source when only `ref`/`alternative` were given.
pub fn placement(node: Node<'_>, directive: &mut Directive) -> Result<(), String> {
    match directive.body {
        Body::Section { .. } => section(node, directive)?,
        Body::Block => block(node)?,
        Body::Heading => heading(node)?,
        Body::Text => text(node)?,
        Body::Katex { .. } => katex(node, directive)?,
        Body::Link { .. } => link(directive)?,
        Body::Code { .. } | Body::Image { .. } | Body::Video { .. } => {}
    }
    mandatory_fields(directive)
}

fn section(node: Node<'_>, directive: &Directive) -> Result<(), String> {
    if let Body::Section { end: Some(_) } = directive.body
        && (directive.id.is_some()
            || directive.attrs.is_some()
            || directive.title.is_some()
            || directive.data.is_some())
    {
        return Err("section end markers cannot set any other field".to_string());
    }

    let Some(parent) = node.parent() else {
        return Err(SECTION_PLACEMENT.to_string());
    };

    match parent.kind() {
        NodeKind::Paragraph => {
            nested_under_document(parent)?;
            if parent.first_child() != Some(node) {
                return Err(
                    "section placeholders must be the first element of their paragraph".to_string(),
                );
            }
            if node.first_child().is_some() {
                return Err("section placeholders cannot wrap any text".to_string());
            }
            Ok(())
        }
        NodeKind::Heading => nested_under_document(parent),
        _ => Err(SECTION_PLACEMENT.to_string()),
    }
}

fn nested_under_document(parent: Node<'_>) -> Result<(), String> {
    match parent.parent() {
        Some(grandparent) if grandparent.kind() == NodeKind::Document => Ok(()),
        Some(grandparent) => Err(format!(
            "{SECTION_PLACEMENT}, not nested inside of a '{}'",
            grandparent.kind().name()
        )),
        None => Err(SECTION_PLACEMENT.to_string()),
    }
}

fn block(node: Node<'_>) -> Result<(), String> {
    let Some(parent) = node.parent() else {
        return Err(block_context("document"));
    };
    let grandparent = parent.parent();
    let in_quote =
        grandparent.is_some_and(|grandparent| grandparent.kind() == NodeKind::BlockQuote);

    match parent.kind() {
        NodeKind::Paragraph if in_quote => {
            // Placeholder form: the placeholder opens the quote and wraps
            // nothing. The quote body may continue after it on the
            // following lines of the same paragraph.
            let quote = grandparent.ok_or_else(|| block_context(parent.kind().name()))?;
            let placeholder_first = quote.first_child() == Some(parent)
                && parent.first_child() == Some(node)
                && node.first_child().is_none();
            if !placeholder_first {
                return Err(BLOCK_EMBEDS_TEXT.to_string());
            }
            Ok(())
        }
        NodeKind::Heading if in_quote => Ok(()),
        NodeKind::Paragraph | NodeKind::Heading => {
            let kind = grandparent.map_or(NodeKind::Other, Node::kind);
            Err(block_context(kind.name()))
        }
        kind => Err(block_context(kind.name())),
    }
}

fn block_context(kind: &str) -> String {
    format!("block directives must be placed inside of a quote block, not a '{kind}'")
}

fn heading(node: Node<'_>) -> Result<(), String> {
    match node.parent() {
        Some(parent) if parent.kind() == NodeKind::Heading => Ok(()),
        Some(parent) => Err(format!(
            "heading directives must be placed inside of a heading, not a '{}'",
            parent.kind().name()
        )),
        None => Err(
            "heading directives must be placed inside of a heading, not a 'document'".to_string(),
        ),
    }
}

fn text(node: Node<'_>) -> Result<(), String> {
    let has_text = node.first_child().is_some_and(|child| {
        child.kind() == NodeKind::Text && child.literal().is_some_and(|s| !s.is_empty())
    });
    if has_text {
        Ok(())
    } else {
        Err(TEXT_NEEDS_TEXT.to_string())
    }
}

fn katex(node: Node<'_>, directive: &mut Directive) -> Result<(), String> {
    let Some(child) = node.first_child() else {
        return Err(KATEX_NEEDS_CODE.to_string());
    };
    if child.kind() != NodeKind::Code {
        return Err(KATEX_NEEDS_CODE.to_string());
    }
    let Some(literal) = child.literal().filter(|s| !s.is_empty()) else {
        return Err(KATEX_NEEDS_CODE.to_string());
    };

    let Body::Katex { formula } = &mut directive.body else {
        return Err(KATEX_NEEDS_CODE.to_string());
    };
    *formula = Some(literal);
    child.unlink();
    Ok(())
}

fn link(directive: &mut Directive) -> Result<(), String> {
    let Body::Link {
        src,
        alternative,
        reference,
        ..
    } = &mut directive.body
    else {
        return Err(LINK_NEEDS_SRC.to_string());
    };

    if reference.is_some() || alternative.is_some() {
        match src {
            None => {
                *src = Some(Src::SelfPage {
                    alt: alternative.clone(),
                });
            }
            Some(Src::Page { .. }) | Some(Src::SelfPage { .. }) => {}
            Some(_) => return Err(REF_NEEDS_PAGE.to_string()),
        }
    }

    if src.is_none() {
        return Err(LINK_NEEDS_SRC.to_string());
    }
    Ok(())
}

fn mandatory_fields(directive: &Directive) -> Result<(), String> {
    let spec = builtins::kind_spec(&directive.body);
    for field in spec.mandatory {
        if !body_field_is_set(directive, field) {
            return Err(format!("mandatory field '{field}' is unset"));
        }
    }
    for field in spec.directive_mandatory {
        if !common_field_is_set(directive, field) {
            return Err(format!("mandatory field '{field}' is unset"));
        }
    }
    Ok(())
}

fn body_field_is_set(directive: &Directive, field: &str) -> bool {
    match (field, &directive.body) {
        ("src", _) => directive.src().is_some(),
        ("formula", Body::Katex { formula }) => formula.is_some(),
        ("language", Body::Code { language, .. }) => language.is_some(),
        ("alt", Body::Image { alt, .. }) => alt.is_some(),
        _ => false,
    }
}

fn common_field_is_set(directive: &Directive, field: &str) -> bool {
    match field {
        "id" => directive.id.is_some(),
        "attrs" => directive.attrs.is_some(),
        "title" => directive.title.is_some(),
        "data" => directive.data.is_some(),
        _ => false,
    }
}
