//! Structural checks on Rust source files, behind `analyze_code` and `analyze_self`.

use crate::core::error::AssistantError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use syn::visit::{self, Visit};
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub line: usize,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Analysis {
    Clean,
    Issues(Vec<Issue>),
    SyntaxError { line: usize, message: String },
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Analysis::Clean => write!(f, "The code has no syntax or logical structure issues."),
            Analysis::Issues(issues) => {
                write!(f, "The code has the following issues:")?;
                for issue in issues {
                    write!(f, "\nLine {}: {}", issue.line, issue.message)?;
                }
                Ok(())
            }
            Analysis::SyntaxError { line, message } => {
                write!(f, "Syntax Error detected: {} on line {}", message, line)
            }
        }
    }
}

#[derive(Default)]
struct EmptyBodyFinder {
    issues: Vec<Issue>,
}

impl EmptyBodyFinder {
    fn flag(&mut self, line: usize, message: String) {
        self.issues.push(Issue { line, message });
    }
}

impl<'ast> Visit<'ast> for EmptyBodyFinder {
    fn visit_item_fn(&mut self, node: &'ast syn::ItemFn) {
        if node.block.stmts.is_empty() {
            let ident = &node.sig.ident;
            self.flag(
                ident.span().start().line,
                format!("Function '{}' has no body.", ident),
            );
        }
        visit::visit_item_fn(self, node);
    }

    fn visit_impl_item_fn(&mut self, node: &'ast syn::ImplItemFn) {
        if node.block.stmts.is_empty() {
            let ident = &node.sig.ident;
            self.flag(
                ident.span().start().line,
                format!("Function '{}' has no body.", ident),
            );
        }
        visit::visit_impl_item_fn(self, node);
    }

    fn visit_expr_for_loop(&mut self, node: &'ast syn::ExprForLoop) {
        if node.body.stmts.is_empty() {
            self.flag(
                node.for_token.span.start().line,
                "'for' loop has no body.".to_string(),
            );
        }
        visit::visit_expr_for_loop(self, node);
    }

    fn visit_expr_while(&mut self, node: &'ast syn::ExprWhile) {
        if node.body.stmts.is_empty() {
            self.flag(
                node.while_token.span.start().line,
                "'while' loop has no body.".to_string(),
            );
        }
        visit::visit_expr_while(self, node);
    }

    fn visit_expr_loop(&mut self, node: &'ast syn::ExprLoop) {
        if node.body.stmts.is_empty() {
            self.flag(
                node.loop_token.span.start().line,
                "'loop' has no body.".to_string(),
            );
        }
        visit::visit_expr_loop(self, node);
    }
}

pub fn analyze_source(code: &str) -> Analysis {
    let file = match syn::parse_file(code) {
        Ok(file) => file,
        Err(e) => {
            return Analysis::SyntaxError {
                line: e.span().start().line,
                message: e.to_string(),
            };
        }
    };

    let mut finder = EmptyBodyFinder::default();
    finder.visit_file(&file);

    if finder.issues.is_empty() {
        Analysis::Clean
    } else {
        finder.issues.sort_by_key(|i| i.line);
        Analysis::Issues(finder.issues)
    }
}

pub fn analyze_code(path: &Path) -> Result<Analysis, AssistantError> {
    let code = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            AssistantError::Input(format!("The file '{}' does not exist.", path.display()))
        }
        _ => AssistantError::from(e),
    })?;
    Ok(analyze_source(&code))
}

/// Analyzes every `.rs` file below `root`, in path order.
pub fn analyze_tree(root: &Path) -> Result<Vec<(PathBuf, Analysis)>, AssistantError> {
    if !root.is_dir() {
        return Err(AssistantError::Input(format!(
            "Source directory '{}' is not available.",
            root.display()
        )));
    }

    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.path().extension().is_some_and(|x| x == "rs"))
        .map(|e| {
            let analysis = analyze_code(e.path())?;
            Ok((e.into_path(), analysis))
        })
        .collect()
}

/// This crate's own `src/` directory.
pub fn own_source_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("src")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_code_has_no_issues() {
        let code = "fn main() {\n    for i in 0..3 {\n        println!(\"{}\", i);\n    }\n}\n";
        assert_eq!(analyze_source(code), Analysis::Clean);
    }

    #[test]
    fn empty_bodies_are_reported_with_lines() {
        let code = "fn stub() {}\n\nfn main() {\n    while false {}\n    for _ in 0..1 {}\n}\n";
        let Analysis::Issues(issues) = analyze_source(code) else {
            panic!("expected issues");
        };
        assert_eq!(
            issues,
            vec![
                Issue {
                    line: 1,
                    message: "Function 'stub' has no body.".to_string()
                },
                Issue {
                    line: 4,
                    message: "'while' loop has no body.".to_string()
                },
                Issue {
                    line: 5,
                    message: "'for' loop has no body.".to_string()
                },
            ]
        );
    }

    #[test]
    fn syntax_errors_carry_a_line() {
        let analysis = analyze_source("fn main() {\n    let x = ;\n}\n");
        match analysis {
            Analysis::SyntaxError { line, .. } => assert_eq!(line, 2),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_input_error() {
        let err = analyze_code(Path::new("/no/such/file.rs")).unwrap_err();
        assert_eq!(err.to_string(), "The file '/no/such/file.rs' does not exist.");
    }

    #[test]
    fn own_sources_parse() {
        let results = analyze_tree(&own_source_dir()).unwrap();
        assert!(!results.is_empty());
        assert!(
            results
                .iter()
                .all(|(_, a)| !matches!(a, Analysis::SyntaxError { .. }))
        );
    }
}
