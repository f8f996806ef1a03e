//! Discovery of `import` statements in schema text.

use regex::Regex;

/// Pattern for single-line YANG imports: `import <name> {`.
pub const IMPORT_PATTERN: &str = r"import (.+) \{";

/// Extracts the identifiers a schema body imports.
pub trait ImportScanner {
    /// Imported identifiers, in the order they appear in `body`.
    fn scan(&self, body: &str) -> Vec<String>;
}

impl<F> ImportScanner for F
where
    F: Fn(&str) -> Vec<String>,
{
    fn scan(&self, body: &str) -> Vec<String> {
        self(body)
    }
}

/// Line-oriented textual scanner.
///
/// This is a heuristic, not a YANG parser: an import split across lines is
/// missed, and a comment or string containing `import x {` is reported.
#[derive(Debug, Clone)]
pub struct RegexImportScanner {
    pattern: Regex,
}

impl RegexImportScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scanner with a caller-supplied pattern. Capture group 1 is the name.
    pub fn with_pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }
}

impl Default for RegexImportScanner {
    fn default() -> Self {
        Self {
            pattern: Regex::new(IMPORT_PATTERN).expect("import pattern is valid"),
        }
    }
}

impl ImportScanner for RegexImportScanner {
    fn scan(&self, body: &str) -> Vec<String> {
        self.pattern
            .captures_iter(body)
            .filter_map(|caps| caps.get(1))
            .map(|name| name.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(body: &str) -> Vec<String> {
        RegexImportScanner::new().scan(body)
    }

    #[test]
    fn finds_imports_in_order() {
        let body = "module root {\n  \
                    import ietf-yang-types {\n    prefix yang;\n  }\n  \
                    import ietf-inet-types {\n    prefix inet;\n  }\n}\n";
        assert_eq!(scan(body), vec!["ietf-yang-types", "ietf-inet-types"]);
    }

    #[test]
    fn single_line_import_block() {
        let body = "  import ietf-interfaces { prefix if; }\n";
        assert_eq!(scan(body), vec!["ietf-interfaces"]);
    }

    #[test]
    fn no_imports() {
        assert!(scan("module leaf {\n  namespace \"urn:leaf\";\n}\n").is_empty());
    }

    #[test]
    fn include_is_not_an_import() {
        assert!(scan("  include root-submodule {\n").is_empty());
    }

    #[test]
    fn multiline_import_is_missed() {
        let body = "  import\n    ietf-yang-types {\n";
        assert!(scan(body).is_empty());
    }

    #[test]
    fn comment_mentioning_import_matches() {
        let body = "  // import legacy-types { was removed\n";
        assert_eq!(scan(body), vec!["legacy-types"]);
    }

    #[test]
    fn duplicates_are_reported() {
        let body = "import a {\nimport a {\n";
        assert_eq!(scan(body), vec!["a", "a"]);
    }

    #[test]
    fn custom_pattern() {
        let scanner = RegexImportScanner::with_pattern(r"uses-module (\S+);").unwrap();
        assert_eq!(scanner.scan("uses-module x;\nuses-module y;"), vec!["x", "y"]);
        assert!(RegexImportScanner::with_pattern("(").is_err());
    }

    #[test]
    fn closure_scanner() {
        let scanner = |body: &str| -> Vec<String> {
            body.lines()
                .filter_map(|l| l.strip_prefix("dep "))
                .map(str::to_string)
                .collect()
        };
        assert_eq!(ImportScanner::scan(&scanner, "dep a\nother\ndep b"), vec!["a", "b"]);
    }
}
