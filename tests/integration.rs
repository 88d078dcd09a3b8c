//! End-to-end scenarios driving the public `CompileContext`/`driver` API
//! directly against the JIT, rather than spawning the `scalarc` binary.

use scalarc::llvm::{self, Context};
use scalarc::{driver, CompileContext};

fn new_context(context: &Context) -> CompileContext {
    llvm::target::initialize_native_target().expect("failed to initialize native target");
    CompileContext::new(context, true).expect("failed to build compile context")
}

#[test]
fn adds_two_numbers() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    let result = driver::eval_expression("4 + 5", &mut ctx).unwrap();
    assert_eq!(result, 9.0);
}

#[test]
fn calls_a_user_defined_function() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    driver::run("def foo(a b) a*a + 2*a*b + b*b end", &mut ctx);
    let result = driver::eval_expression("foo(3, 4)", &mut ctx).unwrap();
    assert_eq!(result, 49.0);
}

#[test]
fn logical_and_uses_widen_and_semantics() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    let result = driver::eval_expression("1 && 2", &mut ctx).unwrap();
    assert_eq!(result, 1.0);
}

#[test]
fn recursive_fibonacci() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    driver::run(
        "def fib(n) if n < 2 then n else fib(n-1) + fib(n-2) end end",
        &mut ctx,
    );
    let result = driver::eval_expression("fib(10)", &mut ctx).unwrap();
    assert_eq!(result, 55.0);
}

#[test]
fn calls_a_host_extern() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    driver::run("extern sin(x)", &mut ctx);
    let result = driver::eval_expression("sin(0)", &mut ctx).unwrap();
    assert_eq!(result, 0.0);
}

#[test]
fn for_loop_with_implicit_local() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    driver::run(
        "def sum(n) for i = 1, i <= n, 1 in s = s + i end s end",
        &mut ctx,
    );
    let result = driver::eval_expression("sum(5)", &mut ctx).unwrap();
    assert_eq!(result, 15.0);
}

#[test]
fn anonymous_module_is_removed_after_invocation() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    driver::eval_expression("1 + 1", &mut ctx).unwrap();
    // A second anonymous expression reuses the name `__anon_expr` in a fresh
    // module; this only succeeds if the first module's symbol no longer
    // shadows it inside the JIT.
    let result = driver::eval_expression("2 + 2", &mut ctx).unwrap();
    assert_eq!(result, 4.0);
}

#[test]
fn redefining_a_function_rebinds_later_calls() {
    let context = Context::new();
    let mut ctx = new_context(&context);
    driver::run("def answer() 1 end", &mut ctx);
    driver::run("def answer() 2 end", &mut ctx);
    let result = driver::eval_expression("answer()", &mut ctx).unwrap();
    assert_eq!(result, 2.0);
}
