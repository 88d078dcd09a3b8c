//! The REPL loop: reads top-level items one token at a time and dispatches
//! on the leading token, per §4.E of the design notes.

use log::error;

use ast::Function;
use context::CompileContext;
use error::CompileResult;
use lex::{Lexer, Token};
use parse::Parser;

/// Drives `input` to completion against `ctx`, printing IR dumps (unless
/// `ctx.quiet()`) to stderr and expression results to stdout. Returns once
/// the lexer reaches end of file; a `CompileError` in any single item is
/// logged and does not stop the loop.
pub fn run(input: &str, ctx: &mut CompileContext) {
    let mut lexer = Lexer::new(input);

    loop {
        let precedence = ctx.precedence().clone();
        let mut parser = match Parser::new(&mut lexer, &precedence) {
            Ok(parser) => parser,
            Err(err) => {
                error!("{}", err);
                break;
            }
        };

        match parser.current().clone() {
            Token::Eof => break,
            // A bare `end` or `;` between items is a no-op separator.
            Token::End | Token::Char(';') => {
                if let Err(err) = parser.advance() {
                    error!("{}", err);
                    break;
                }
            }
            Token::Def => {
                if let Err(err) = handle_definition(&mut parser, ctx) {
                    error!("{}", err);
                }
            }
            Token::Extern => {
                if let Err(err) = handle_extern(&mut parser, ctx) {
                    error!("{}", err);
                }
            }
            _ => {
                if let Err(err) = handle_top_level_expr(&mut parser, ctx) {
                    error!("{}", err);
                }
            }
        }
    }
}

fn handle_definition(parser: &mut Parser, ctx: &mut CompileContext) -> CompileResult<()> {
    let func = parser.parse_definition()?;
    if let Err(err) = func.lower(ctx) {
        // Discard the module the half-lowered function was left sitting in,
        // so a later `get_function` can't find and reuse the broken body.
        ctx.retire_module();
        return Err(err);
    }
    if !ctx.quiet() {
        ctx.module().print_to_stderr();
    }
    let old_module = ctx.retire_module();
    ctx.jit().add_module(old_module)?;
    Ok(())
}

fn handle_extern(parser: &mut Parser, ctx: &mut CompileContext) -> CompileResult<()> {
    let proto = parser.parse_extern()?;
    proto.lower(ctx);
    ctx.register_prototype(proto);
    Ok(())
}

fn handle_top_level_expr(parser: &mut Parser, ctx: &mut CompileContext) -> CompileResult<()> {
    let func = parser.parse_top_level_expr()?;
    let result = eval_anon_function(func, ctx)?;
    println!("{}", result);
    Ok(())
}

/// Lowers and invokes an already-parsed top-level expression, removing its
/// anonymous module from the JIT afterward. Shared by the REPL loop and by
/// tests driving the pipeline without going through stdin.
fn eval_anon_function(func: Function, ctx: &mut CompileContext) -> CompileResult<f64> {
    if let Err(err) = func.lower(ctx) {
        ctx.retire_module();
        return Err(err);
    }
    let old_module = ctx.retire_module();
    let key = ctx.jit().add_module(old_module)?;

    let result = unsafe {
        let entry = ctx.jit().find_symbol_as::<extern "C" fn() -> f64>("__anon_expr")?;
        entry()
    };

    ctx.jit().remove_module(key)?;
    Ok(result)
}

/// Parses and evaluates a single top-level expression from `source` against
/// `ctx`, returning its numeric result. Intended for tests and embedders
/// that want a value back rather than a line printed to stdout; `def` and
/// `extern` items should go through `run` instead.
pub fn eval_expression(source: &str, ctx: &mut CompileContext) -> CompileResult<f64> {
    let mut lexer = Lexer::new(source);
    let precedence = ctx.precedence().clone();
    let mut parser = Parser::new(&mut lexer, &precedence)?;
    let func = parser.parse_top_level_expr()?;
    eval_anon_function(func, ctx)
}
