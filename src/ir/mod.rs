//! Lowers the AST to LLVM IR against a `CompileContext`. Every `Expr`,
//! `Prototype`, and `Function` gets a `lower` method here rather than on
//! its own type, since emission needs the full context the `ast` module
//! deliberately knows nothing about.

mod emitter;

pub use self::emitter::get_function;
