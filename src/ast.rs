//! A thin, navigable view over the comrak AST.
//!
//! The compiler only needs a small capability set from the tree: node
//! kind, parent/child/sibling navigation, literal text, unlinking, and a
//! stable identity to key the directive side map (comrak nodes carry no
//! user-data slot, so directives live next to the tree, not in it).

use comrak::nodes::{AstNode, NodeValue};

/// The node kinds the compiler can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    FrontMatter,
    BlockQuote,
    List,
    Item,
    CodeBlock,
    HtmlBlock,
    Paragraph,
    Heading,
    ThematicBreak,
    Table,
    Text,
    SoftBreak,
    LineBreak,
    Code,
    HtmlInline,
    Emph,
    Strong,
    Link,
    Image,
    Other,
}

impl NodeKind {
    /// Human-readable name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::FrontMatter => "front matter",
            NodeKind::BlockQuote => "quote block",
            NodeKind::List => "list",
            NodeKind::Item => "list item",
            NodeKind::CodeBlock => "code block",
            NodeKind::HtmlBlock => "html block",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::ThematicBreak => "thematic break",
            NodeKind::Table => "table",
            NodeKind::Text => "text",
            NodeKind::SoftBreak => "soft break",
            NodeKind::LineBreak => "line break",
            NodeKind::Code => "code",
            NodeKind::HtmlInline => "inline html",
            NodeKind::Emph => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
            NodeKind::Other => "other",
        }
    }
}

/// Stable identity of an AST node, used to key the directive map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Copyable handle to one AST node.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    inner: &'a AstNode<'a>,
}

impl<'a> PartialEq for Node<'a> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.inner, other.inner)
    }
}

impl<'a> Eq for Node<'a> {}

impl<'a> Node<'a> {
    pub fn new(inner: &'a AstNode<'a>) -> Self {
        Self { inner }
    }

    pub fn inner(self) -> &'a AstNode<'a> {
        self.inner
    }

    pub fn id(self) -> NodeId {
        NodeId(self.inner as *const AstNode<'a> as usize)
    }

    pub fn kind(self) -> NodeKind {
        match self.inner.data.borrow().value {
            NodeValue::Document => NodeKind::Document,
            NodeValue::FrontMatter(_) => NodeKind::FrontMatter,
            NodeValue::BlockQuote => NodeKind::BlockQuote,
            NodeValue::List(_) => NodeKind::List,
            NodeValue::Item(_) => NodeKind::Item,
            NodeValue::CodeBlock(_) => NodeKind::CodeBlock,
            NodeValue::HtmlBlock(_) => NodeKind::HtmlBlock,
            NodeValue::Paragraph => NodeKind::Paragraph,
            NodeValue::Heading(_) => NodeKind::Heading,
            NodeValue::ThematicBreak => NodeKind::ThematicBreak,
            NodeValue::Table(_) => NodeKind::Table,
            NodeValue::Text(_) => NodeKind::Text,
            NodeValue::SoftBreak => NodeKind::SoftBreak,
            NodeValue::LineBreak => NodeKind::LineBreak,
            NodeValue::Code(_) => NodeKind::Code,
            NodeValue::HtmlInline(_) => NodeKind::HtmlInline,
            NodeValue::Emph => NodeKind::Emph,
            NodeValue::Strong => NodeKind::Strong,
            NodeValue::Link(_) => NodeKind::Link,
            NodeValue::Image(_) => NodeKind::Image,
            _ => NodeKind::Other,
        }
    }

    pub fn parent(self) -> Option<Node<'a>> {
        self.inner.parent().map(Node::new)
    }

    pub fn first_child(self) -> Option<Node<'a>> {
        self.inner.first_child().map(Node::new)
    }

    pub fn next_sibling(self) -> Option<Node<'a>> {
        self.inner.next_sibling().map(Node::new)
    }

    pub fn children(self) -> impl Iterator<Item = Node<'a>> {
        self.inner.children().map(Node::new)
    }

    /// Literal text carried by the node, for kinds that have one.
    pub fn literal(self) -> Option<String> {
        match &self.inner.data.borrow().value {
            NodeValue::Text(s) | NodeValue::HtmlInline(s) | NodeValue::FrontMatter(s) => {
                Some(s.clone())
            }
            NodeValue::Code(code) => Some(code.literal.clone()),
            NodeValue::CodeBlock(block) => Some(block.literal.clone()),
            _ => None,
        }
    }

    /// Destination of a link or image node.
    pub fn url(self) -> Option<String> {
        match &self.inner.data.borrow().value {
            NodeValue::Link(link) | NodeValue::Image(link) => Some(link.url.clone()),
            _ => None,
        }
    }

    /// Detach the node (and its subtree) from the tree.
    pub fn unlink(self) {
        self.inner.detach();
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node").field("kind", &self.kind()).finish()
    }
}
