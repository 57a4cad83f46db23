use crate::ast::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// 1-based source position of the offending node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn from_node(node: Node<'_>) -> Self {
        let sourcepos = node.inner().data.borrow().sourcepos;
        Self {
            line: sourcepos.start.line,
            column: sourcepos.start.column,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub location: Location,
    pub message: String,
}

impl Diagnostic {
    pub fn error(location: Location, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            location,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.location.line, self.location.column, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_position() {
        let diagnostic = Diagnostic::error(Location { line: 3, column: 2 }, "path is empty");
        assert_eq!(diagnostic.to_string(), "3:2: path is empty");
        assert_eq!(diagnostic.severity, Severity::Error);
    }
}
