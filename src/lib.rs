//! Directive compiler for SuperMD, an extended Markdown.
//!
//! SuperMD augments CommonMark/GFM with typed rendering directives written
//! as links whose destination starts with `$`:
//!
//! ```text
//! # [Welcome]($heading.id('intro').attrs('center'))
//! ```
//!
//! This crate parses a document, evaluates every directive expression
//! against a typed object model, validates each directive's position in
//! the tree, and hands back the annotated AST plus any diagnostics. It
//! does not render HTML; that is the templating layer's job.

pub mod ast;
pub mod builtins;
pub mod compiler;
pub mod config;
pub mod directive;
pub mod path;
pub mod script;
pub mod validate;
pub mod value;

pub use compiler::diagnostics::{Diagnostic, Location, Severity};
pub use compiler::{Compiled, compile};
pub use config::Config;
pub use directive::{Body, Content, Directive, PageKind, Size, Src};
pub use value::Value;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Compile a document and return only its diagnostics.
///
/// Convenience for callers that do not need the annotated tree, like the
/// `check` subcommand.
///
/// # Examples
///
/// ```rust
/// let diagnostics = supermd::check(
///     "# [Welcome]($heading.id('intro'))\n",
///     &supermd::Config::default(),
/// );
/// assert!(diagnostics.is_empty());
/// ```
pub fn check(input: &str, config: &Config) -> Vec<Diagnostic> {
    #[cfg(debug_assertions)]
    {
        init_logger();
    }

    let arena = comrak::Arena::new();
    let compiled = compile(&arena, input, config);
    compiled.diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_reports_directive_errors() {
        let diagnostics = check("[x]($link.url('nope'))\n", &Config::default());
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("URLs must specify a scheme"));
    }
}
