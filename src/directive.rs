//! The typed directive object model.
//!
//! A directive is the annotation a SuperMD expression builds up and the
//! compiler attaches to a link node. Every directive carries the four common
//! attributes (`id`, `attrs`, `title`, `data`) plus a kind-specific body.
//! All optional fields are single-assignment: builtins refuse to overwrite
//! a value that is already present.

use std::cell::RefCell;
use std::collections::BTreeMap;

/// Where a directive's source points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Src {
    /// Absolute external URL, stored as written.
    Url(String),
    /// Implicit reference to the current page, synthesized by link
    /// validation when `ref`/`alternative` are given without a target.
    SelfPage { alt: Option<String> },
    /// Reference to another content page. `resolved` is filled in by a
    /// later pass, outside this crate.
    Page {
        kind: PageKind,
        path: String,
        locale: Option<String>,
        resolved: Option<String>,
    },
    /// Asset next to the current page.
    PageAsset {
        path: String,
        resolved: Option<String>,
    },
    /// Asset in the site-wide asset tree.
    SiteAsset {
        path: String,
        resolved: Option<String>,
    },
    /// Asset produced by the build system; stored verbatim.
    BuildAsset { path: String },
}

/// How a cross-page reference is anchored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// Path from the content root.
    Absolute,
    /// Path below the current page.
    Sub,
    /// Path next to the current page.
    Sibling,
}

/// Pixel dimensions for an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub w: i64,
    pub h: i64,
}

/// Kind-specific directive payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Section {
        /// Marks the end of an open section. Not reachable through a
        /// builtin yet; the placement rule for it is live.
        end: Option<bool>,
    },
    Block,
    Heading,
    Text,
    Katex {
        /// Populated by the validator from the wrapped inline code node.
        formula: Option<String>,
    },
    Link {
        src: Option<Src>,
        alternative: Option<String>,
        reference: Option<String>,
        ref_unsafe: bool,
        new_tab: Option<bool>,
    },
    Code {
        src: Option<Src>,
        language: Option<String>,
    },
    Image {
        src: Option<Src>,
        alt: Option<String>,
        linked: Option<bool>,
        size: Option<Size>,
    },
    Video {
        src: Option<Src>,
        loop_: Option<bool>,
        muted: Option<bool>,
        autoplay: Option<bool>,
        controls: Option<bool>,
        pip: Option<bool>,
    },
}

/// A rendering directive attached to one AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub id: Option<String>,
    pub attrs: Option<Vec<String>>,
    pub title: Option<String>,
    pub data: Option<BTreeMap<String, String>>,
    pub body: Body,
}

impl Directive {
    pub fn new(body: Body) -> Self {
        Self {
            id: None,
            attrs: None,
            title: None,
            data: None,
            body,
        }
    }

    /// The lowercase kind name used in expressions and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self.body {
            Body::Section { .. } => "section",
            Body::Block => "block",
            Body::Heading => "heading",
            Body::Text => "text",
            Body::Katex { .. } => "katex",
            Body::Link { .. } => "link",
            Body::Code { .. } => "code",
            Body::Image { .. } => "image",
            Body::Video { .. } => "video",
        }
    }

    /// The directive's source reference, for kinds that carry one.
    pub fn src(&self) -> Option<&Src> {
        match &self.body {
            Body::Link { src, .. }
            | Body::Code { src, .. }
            | Body::Image { src, .. }
            | Body::Video { src, .. } => src.as_ref(),
            _ => None,
        }
    }
}

/// The root object handed to every directive expression.
///
/// Holds one default-constructed directive per kind; `$section`, `$block`
/// and friends resolve to these fields. A fresh `Content` is seeded for
/// each expression, so directives never leak between nodes.
#[derive(Debug)]
pub struct Content {
    pub section: RefCell<Directive>,
    pub block: RefCell<Directive>,
    pub heading: RefCell<Directive>,
    pub text: RefCell<Directive>,
    pub katex: RefCell<Directive>,
    pub link: RefCell<Directive>,
    pub code: RefCell<Directive>,
    pub image: RefCell<Directive>,
    pub video: RefCell<Directive>,
}

impl Content {
    pub fn new() -> Self {
        Self {
            section: RefCell::new(Directive::new(Body::Section { end: None })),
            block: RefCell::new(Directive::new(Body::Block)),
            heading: RefCell::new(Directive::new(Body::Heading)),
            text: RefCell::new(Directive::new(Body::Text)),
            katex: RefCell::new(Directive::new(Body::Katex { formula: None })),
            link: RefCell::new(Directive::new(Body::Link {
                src: None,
                alternative: None,
                reference: None,
                ref_unsafe: false,
                new_tab: None,
            })),
            code: RefCell::new(Directive::new(Body::Code {
                src: None,
                language: None,
            })),
            image: RefCell::new(Directive::new(Body::Image {
                src: None,
                alt: None,
                linked: None,
                size: None,
            })),
            video: RefCell::new(Directive::new(Body::Video {
                src: None,
                loop_: None,
                muted: None,
                autoplay: None,
                controls: None,
                pip: None,
            })),
        }
    }

    /// Resolve a directive field by its expression name.
    pub fn field(&self, name: &str) -> Option<&RefCell<Directive>> {
        match name {
            "section" => Some(&self.section),
            "block" => Some(&self.block),
            "heading" => Some(&self.heading),
            "text" => Some(&self.text),
            "katex" => Some(&self.katex),
            "link" => Some(&self.link),
            "code" => Some(&self.code),
            "image" => Some(&self.image),
            "video" => Some(&self.video),
            _ => None,
        }
    }
}

impl Default for Content {
    fn default() -> Self {
        Self::new()
    }
}
