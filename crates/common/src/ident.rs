//! Identifier classification for declared names.

use unicode_ident::{is_xid_continue, is_xid_start};

/// Words which can never be used as a binding name.
///
/// Contextual keywords like `let`, `async` or `of` are valid binding names and
/// are deliberately absent.
const RESERVED: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

fn is_ident_start(c: char) -> bool {
    c == '$' || c == '_' || is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '$' || is_xid_continue(c)
}

/// Returns whether the given string is a valid, non-reserved identifier.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !is_ident_start(first) {
        return false;
    }
    if !chars.all(is_ident_continue) {
        return false;
    }
    RESERVED.binary_search(&name).is_err()
}
