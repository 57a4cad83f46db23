//! Named, typed directive mutators and their dispatch tables.
//!
//! Each kind owns a fixed table of builtins; the four common builtins
//! (`id`, `attrs`, `title`, `data`) apply to every kind. Lookup is
//! two-level: the active kind's table first, then the common table. All
//! failures are returned as error values, never panics, and every
//! successful mutation hands the same directive handle back so calls chain
//! left to right.

use std::cell::RefCell;
use std::collections::BTreeMap;

use url::Url;

use crate::directive::{Body, Directive, PageKind, Src};
use crate::path;
use crate::value::Value;

pub type BuiltinFn = for<'v> fn(&mut Directive, &[Value<'v>]) -> Result<(), String>;

/// One entry per directive kind: expression name, builtin table, and the
/// fields the validator requires to be set.
pub struct KindSpec {
    pub name: &'static str,
    pub builtins: &'static [(&'static str, BuiltinFn)],
    /// Required fields on the kind body.
    pub mandatory: &'static [&'static str],
    /// Required fields on the common record.
    pub directive_mandatory: &'static [&'static str],
}

pub const COMMON_BUILTINS: &[(&str, BuiltinFn)] = &[
    ("id", set_id as BuiltinFn),
    ("attrs", set_attrs as BuiltinFn),
    ("title", set_title as BuiltinFn),
    ("data", set_data as BuiltinFn),
];

const SECTION: KindSpec = KindSpec {
    name: "section",
    builtins: &[],
    mandatory: &[],
    directive_mandatory: &[],
};

const BLOCK: KindSpec = KindSpec {
    name: "block",
    builtins: &[],
    mandatory: &[],
    directive_mandatory: &[],
};

const HEADING: KindSpec = KindSpec {
    name: "heading",
    builtins: &[],
    mandatory: &[],
    directive_mandatory: &[],
};

const TEXT: KindSpec = KindSpec {
    name: "text",
    builtins: &[],
    mandatory: &[],
    directive_mandatory: &[],
};

const KATEX: KindSpec = KindSpec {
    name: "katex",
    builtins: &[],
    mandatory: &[],
    directive_mandatory: &[],
};

const LINK: KindSpec = KindSpec {
    name: "link",
    builtins: &[
        ("url", set_url as BuiltinFn),
        ("asset", set_page_asset as BuiltinFn),
        ("siteAsset", set_site_asset as BuiltinFn),
        ("buildAsset", set_build_asset as BuiltinFn),
        ("page", set_page as BuiltinFn),
        ("sub", set_sub as BuiltinFn),
        ("sibling", set_sibling as BuiltinFn),
        ("ref", set_ref as BuiltinFn),
        ("unsafeRef", set_unsafe_ref as BuiltinFn),
        ("alternative", set_alternative as BuiltinFn),
        ("new", set_new as BuiltinFn),
    ],
    // `src` has its own validation rule with a more helpful message.
    mandatory: &[],
    directive_mandatory: &[],
};

const CODE: KindSpec = KindSpec {
    name: "code",
    builtins: &[
        ("asset", set_page_asset as BuiltinFn),
        ("siteAsset", set_site_asset as BuiltinFn),
        ("buildAsset", set_build_asset as BuiltinFn),
        ("language", set_language as BuiltinFn),
    ],
    mandatory: &["src"],
    directive_mandatory: &[],
};

const IMAGE: KindSpec = KindSpec {
    name: "image",
    builtins: &[
        ("url", set_url as BuiltinFn),
        ("asset", set_page_asset as BuiltinFn),
        ("siteAsset", set_site_asset as BuiltinFn),
        ("buildAsset", set_build_asset as BuiltinFn),
        ("alt", set_alt as BuiltinFn),
        ("linked", set_linked as BuiltinFn),
    ],
    mandatory: &["src"],
    directive_mandatory: &[],
};

const VIDEO: KindSpec = KindSpec {
    name: "video",
    builtins: &[
        ("url", set_url as BuiltinFn),
        ("asset", set_page_asset as BuiltinFn),
        ("siteAsset", set_site_asset as BuiltinFn),
        ("buildAsset", set_build_asset as BuiltinFn),
        ("loop", set_loop as BuiltinFn),
        ("muted", set_muted as BuiltinFn),
        ("autoplay", set_autoplay as BuiltinFn),
        ("controls", set_controls as BuiltinFn),
        ("pip", set_pip as BuiltinFn),
    ],
    mandatory: &["src"],
    directive_mandatory: &[],
};

pub fn kind_spec(body: &Body) -> &'static KindSpec {
    match body {
        Body::Section { .. } => &SECTION,
        Body::Block => &BLOCK,
        Body::Heading => &HEADING,
        Body::Text => &TEXT,
        Body::Katex { .. } => &KATEX,
        Body::Link { .. } => &LINK,
        Body::Code { .. } => &CODE,
        Body::Image { .. } => &IMAGE,
        Body::Video { .. } => &VIDEO,
    }
}

/// Resolve and run a builtin on a directive handle.
///
/// On success the handle itself is returned so the expression can keep
/// chaining; on failure the error value carries the builtin's message.
pub fn call<'a>(handle: &'a RefCell<Directive>, name: &str, args: &[Value<'a>]) -> Value<'a> {
    let mut directive = handle.borrow_mut();
    let spec = kind_spec(&directive.body);

    let found = spec
        .builtins
        .iter()
        .chain(COMMON_BUILTINS)
        .find(|(builtin_name, _)| *builtin_name == name);

    match found {
        Some((_, builtin)) => match builtin(&mut directive, args) {
            Ok(()) => {
                drop(directive);
                Value::Directive(handle)
            }
            Err(message) => Value::Err(message),
        },
        None => Value::Err(format!("builtin not found in '{}'", spec.name)),
    }
}

// ---- argument helpers -------------------------------------------------

fn one_string<'x>(args: &'x [Value<'_>]) -> Result<&'x str, String> {
    match args {
        [Value::Str(s)] => Ok(s),
        _ => Err("expected 1 string argument".to_string()),
    }
}

fn one_bool(args: &[Value<'_>]) -> Result<bool, String> {
    match args {
        [Value::Bool(b)] => Ok(*b),
        _ => Err("expected 1 bool argument".to_string()),
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> Result<(), String> {
    if slot.is_some() {
        return Err("field already set".to_string());
    }
    *slot = Some(value);
    Ok(())
}

fn checked_path(p: &str) -> Result<&str, String> {
    match path::validation_error(p) {
        Some(message) => Err(message.to_string()),
        None => Ok(path::strip_trailing_slash(p)),
    }
}

fn set_src(directive: &mut Directive, src: Src) -> Result<(), String> {
    let kind = directive.kind_name();
    let slot = match &mut directive.body {
        Body::Link { src, .. }
        | Body::Code { src, .. }
        | Body::Image { src, .. }
        | Body::Video { src, .. } => src,
        _ => return Err(format!("builtin not found in '{kind}'")),
    };
    set_once(slot, src)
}

// ---- common builtins --------------------------------------------------

fn set_id(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let s = one_string(args)?;
    set_once(&mut directive.id, s.to_string())
}

fn set_title(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let s = one_string(args)?;
    set_once(&mut directive.title, s.to_string())
}

fn set_attrs(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    if args.is_empty() {
        return Err("expected at least 1 string argument".to_string());
    }
    let mut attrs = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            Value::Str(s) => attrs.push(s.to_string()),
            _ => return Err("expected at least 1 string argument".to_string()),
        }
    }
    set_once(&mut directive.attrs, attrs)
}

fn set_data(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    if args.is_empty() || args.len() % 2 != 0 {
        return Err("expected a non-zero, even number of string arguments".to_string());
    }
    let mut map = BTreeMap::new();
    for pair in args.chunks(2) {
        let (Value::Str(key), Value::Str(value)) = (&pair[0], &pair[1]) else {
            return Err("expected a non-zero, even number of string arguments".to_string());
        };
        if map
            .insert(key.to_string(), value.to_string())
            .is_some()
        {
            return Err(format!("duplicate key: '{key}'"));
        }
    }
    set_once(&mut directive.data, map)
}

// ---- src-setting builtins ---------------------------------------------

fn set_url(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let s = one_string(args)?;
    match Url::parse(s) {
        Ok(_) => set_src(directive, Src::Url(s.to_string())),
        Err(url::ParseError::RelativeUrlWithoutBase) => Err(
            "URLs must specify a scheme, to reference assets and pages use 'asset', \
             'siteAsset', 'buildAsset', 'page', 'sub' or 'sibling' instead"
                .to_string(),
        ),
        Err(e) => Err(e.to_string()),
    }
}

fn set_page_asset(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let p = checked_path(one_string(args)?)?;
    set_src(
        directive,
        Src::PageAsset {
            path: p.to_string(),
            resolved: None,
        },
    )
}

fn set_site_asset(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let p = checked_path(one_string(args)?)?;
    set_src(
        directive,
        Src::SiteAsset {
            path: p.to_string(),
            resolved: None,
        },
    )
}

fn set_build_asset(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    // Build asset names come from the build tool, not the content tree,
    // so they bypass path validation.
    let s = one_string(args)?;
    set_src(
        directive,
        Src::BuildAsset {
            path: s.to_string(),
        },
    )
}

fn page_reference(
    directive: &mut Directive,
    args: &[Value<'_>],
    kind: PageKind,
) -> Result<(), String> {
    let (raw, locale) = match args {
        [Value::Str(path)] => (path, None),
        [Value::Str(path), Value::Str(locale)] => (path, Some(locale.to_string())),
        _ => return Err("expected 1 or 2 string arguments".to_string()),
    };
    let p = checked_path(raw)?;
    set_src(
        directive,
        Src::Page {
            kind,
            path: p.to_string(),
            locale,
            resolved: None,
        },
    )
}

fn set_page(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    page_reference(directive, args, PageKind::Absolute)
}

fn set_sub(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    page_reference(directive, args, PageKind::Sub)
}

fn set_sibling(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    page_reference(directive, args, PageKind::Sibling)
}

// ---- link builtins ----------------------------------------------------

fn link_reference(
    directive: &mut Directive,
    args: &[Value<'_>],
    unsafe_ref: bool,
) -> Result<(), String> {
    let s = one_string(args)?.to_string();
    let kind = directive.kind_name();
    let Body::Link {
        reference,
        ref_unsafe,
        ..
    } = &mut directive.body
    else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(reference, s)?;
    *ref_unsafe = unsafe_ref;
    Ok(())
}

fn set_ref(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    link_reference(directive, args, false)
}

fn set_unsafe_ref(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    link_reference(directive, args, true)
}

fn set_alternative(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let s = one_string(args)?.to_string();
    let kind = directive.kind_name();
    let Body::Link { alternative, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(alternative, s)
}

fn set_new(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Link { new_tab, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(new_tab, b)
}

// ---- other kind-specific setters --------------------------------------

fn set_language(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let s = one_string(args)?.to_string();
    let kind = directive.kind_name();
    let Body::Code { language, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(language, s)
}

fn set_alt(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let s = one_string(args)?.to_string();
    let kind = directive.kind_name();
    let Body::Image { alt, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(alt, s)
}

fn set_linked(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Image { linked, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(linked, b)
}

fn set_loop(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Video { loop_, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(loop_, b)
}

fn set_muted(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Video { muted, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(muted, b)
}

fn set_autoplay(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Video { autoplay, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(autoplay, b)
}

fn set_controls(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Video { controls, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(controls, b)
}

fn set_pip(directive: &mut Directive, args: &[Value<'_>]) -> Result<(), String> {
    let b = one_bool(args)?;
    let kind = directive.kind_name();
    let Body::Video { pip, .. } = &mut directive.body else {
        return Err(format!("builtin not found in '{kind}'"));
    };
    set_once(pip, b)
}
