//! Path expression validation and joining.
//!
//! Pure string functions. Existence is never checked here, that is the
//! [`EntryIndex`](super::EntryIndex)'s job.

use regex::Regex;
use std::sync::LazyLock;

/// Non-empty, space-free segments separated by single slashes, with at
/// most one leading and one trailing slash.
static VALID_EXPR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/?[^/ ]+(?:/[^/ ]+)*/?$").expect("valid path regex"));

/// Check the syntax of a path expression before any lookup.
pub fn is_syntactically_valid(expr: &str) -> bool {
    expr == "/" || VALID_EXPR.is_match(expr)
}

/// Join `expr` onto `base` with '/' semantics.
///
/// Backslashes become slashes, empty and `.` segments vanish, and `..` pops
/// one segment (doing nothing once `base` is used up). A leading slash on
/// `expr` does not restart from the top: it is joined like any other
/// segment separator.
pub fn normalize_join(base: &str, expr: &str) -> String {
    let joined = format!("{}/{}", base, expr).replace('\\', "/");
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    segments.join("/")
}

/// The part of `cwd` below `root`, empty when `cwd` is the root itself.
fn below_root<'a>(root: &str, cwd: &'a str) -> &'a str {
    cwd.strip_prefix(root)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or("")
}

/// Resolve `expr` against `cwd` to an absolute path that never climbs
/// above `root`.
pub fn resolve(root: &str, cwd: &str, expr: &str) -> String {
    let inner = normalize_join(below_root(root, cwd), expr);
    if inner.is_empty() {
        root.to_string()
    } else {
        format!("{}/{}", root, inner)
    }
}

/// One level up from `cwd`; the root is its own parent.
pub fn parent(root: &str, cwd: &str) -> String {
    resolve(root, cwd, "..")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_expressions() {
        for expr in [".", "..", "/", "sub", "sub/", "/sub", "a/b/c", "../x", "a.txt", "a\\b"] {
            assert!(is_syntactically_valid(expr), "{expr} should be valid");
        }
    }

    #[test]
    fn rejects_spaces_and_empty_segments() {
        for expr in ["", " ", "a b", "a//b", "//a", "a//", "//", "sub/ "] {
            assert!(!is_syntactically_valid(expr), "{expr:?} should be invalid");
        }
    }

    #[test]
    fn normalize_join_collapses_dots() {
        assert_eq!(normalize_join("root/a", "b"), "root/a/b");
        assert_eq!(normalize_join("root/a", "./b/../c"), "root/a/c");
        assert_eq!(normalize_join("root/a", "/b"), "root/a/b");
        assert_eq!(normalize_join("root/a", "b\\c"), "root/a/b/c");
        assert_eq!(normalize_join("root", "../.."), "");
    }

    #[test]
    fn resolve_stays_under_root() {
        assert_eq!(resolve("root", "root", "sub"), "root/sub");
        assert_eq!(resolve("root", "root/sub", ".."), "root");
        assert_eq!(resolve("root", "root/sub", "../../.."), "root");
        assert_eq!(resolve("root", "root/a/b", "../c/"), "root/a/c");
        assert_eq!(resolve("root", "root", "."), "root");
    }

    #[test]
    fn parent_is_idempotent_at_root() {
        assert_eq!(parent("root", "root/a/b"), "root/a");
        assert_eq!(parent("root", "root/a"), "root");
        assert_eq!(parent("root", "root"), "root");
    }
}
