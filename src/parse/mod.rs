//! Recursive-descent parsing with Pratt-style precedence climbing for
//! binary operators. The operator precedence table is owned by the
//! `CompileContext`, not the parser — it is read on every operator token
//! and mutated when a `binary` prototype is lowered.

mod parser;

pub use self::parser::Parser;

use std::collections::HashMap;

/// Built-in operator precedences, per the language's fixed seed table.
pub fn builtin_precedence() -> HashMap<String, i32> {
    let mut table = HashMap::new();
    table.insert("=".to_string(), 1);
    table.insert("&&".to_string(), 5);
    table.insert("||".to_string(), 5);
    table.insert("==".to_string(), 10);
    table.insert("!=".to_string(), 10);
    table.insert("<".to_string(), 10);
    table.insert(">".to_string(), 10);
    table.insert("<=".to_string(), 10);
    table.insert(">=".to_string(), 10);
    table.insert("+".to_string(), 20);
    table.insert("-".to_string(), 20);
    table.insert("*".to_string(), 40);
    table.insert("/".to_string(), 40);
    table
}
