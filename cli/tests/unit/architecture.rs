//! Structural tests for architectural boundary enforcement.
//!
//! These tests scan source files to verify that the layer boundaries hold:
//! domain is pure, application talks to the outside only through ports, and
//! infra never reaches up into presentation code.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Track brace depth and return whether a line is inside a `#[cfg(test)]` block.
struct CfgTestTracker {
    in_test_block: bool,
    brace_depth: i32,
    test_block_start_depth: i32,
}

impl CfgTestTracker {
    fn new() -> Self {
        Self {
            in_test_block: false,
            brace_depth: 0,
            test_block_start_depth: 0,
        }
    }

    /// Process a line and return `true` if it's inside a `#[cfg(test)]` block.
    fn process_line(&mut self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") {
            self.in_test_block = true;
            self.test_block_start_depth = self.brace_depth;
        }
        for ch in line.chars() {
            match ch {
                '{' => self.brace_depth += 1,
                '}' => {
                    self.brace_depth -= 1;
                    if self.in_test_block && self.brace_depth <= self.test_block_start_depth {
                        self.in_test_block = false;
                    }
                }
                _ => {}
            }
        }
        self.in_test_block
    }
}

/// Non-comment lines outside `#[cfg(test)]` blocks, with 1-based line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut tracker = CfgTestTracker::new();
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let in_test = tracker.process_line(line);
            let trimmed = line.trim();
            !in_test && !trimmed.starts_with("//")
        })
        .map(|(i, line)| (i + 1, line.to_string()))
        .collect()
}

/// Report every production line under `src/<layer>` containing a forbidden token.
fn violations_in(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let mut violations = Vec::new();
    for file in collect_rs_files(&root.join("src").join(layer)) {
        let rel = file.strip_prefix(root).unwrap_or(&file).display().to_string();
        for (lineno, line) in production_lines(&file) {
            for token in forbidden {
                if line.contains(token) {
                    violations.push(format!("{rel}:{lineno}: `{token}` in: {}", line.trim()));
                }
            }
        }
    }
    violations
}

#[test]
fn domain_has_no_io_or_outer_layer_imports() {
    let violations = violations_in(
        "domain",
        &[
            "tokio",
            "std::fs",
            "std::process",
            "std::net",
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
        ],
    );
    assert!(
        violations.is_empty(),
        "domain/ must stay pure:\n{}",
        violations.join("\n")
    );
}

#[test]
fn application_reaches_infra_only_through_ports() {
    let violations = violations_in(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "tokio::"],
    );
    assert!(
        violations.is_empty(),
        "application/ must depend on port traits, not implementations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_imports_from_commands_or_output() {
    let violations = violations_in("infra", &["crate::commands", "crate::output"]);
    assert!(
        violations.is_empty(),
        "infra/ must not import presentation code:\n{}",
        violations.join("\n")
    );
}

#[test]
fn infra_has_no_print_macros_outside_tests() {
    let violations = violations_in("infra", &["println!", "eprintln!", "print!("]);
    assert!(
        violations.is_empty(),
        "infra/ must log through tracing, not print:\n{}",
        violations.join("\n")
    );
}
