use llvm_sys::analysis::LLVMVerifierFailureAction;
use llvm_sys::LLVMRealPredicate;

use ast::{Expr, Function, ProtoKind, Prototype};
use context::CompileContext;
use error::{CompileError, CompileResult};
use llvm::types::{const_double, scalar_function_type};
use llvm::Value;

/// Resolves a callee by name: a declaration already sitting in the current
/// module, or (failing that) the most recent prototype seen for that name,
/// re-declared fresh into this module so the call can be emitted against it.
pub fn get_function(name: &str, ctx: &mut CompileContext) -> CompileResult<Value> {
    if let Some(func) = ctx.module().get_function(name) {
        return Ok(func);
    }
    let proto = ctx
        .prototype(name)
        .cloned()
        .ok_or_else(|| CompileError::UnknownCallee(name.to_string()))?;
    Ok(proto.lower(ctx))
}

fn current_function(ctx: &CompileContext) -> Value {
    ctx.builder().insert_block().get_parent()
}

/// Allocates a `double` slot at the top of `func`'s entry block, regardless
/// of where the builder is currently positioned -- this is what lets
/// `mem2reg` later promote the slot to a register.
fn create_entry_block_alloca(ctx: &CompileContext, func: &Value, name: &str) -> Value {
    use llvm::Builder;

    let entry = func.entry_block();
    let temp_builder = Builder::new(ctx.llvm_context());
    match entry.first_instruction() {
        Some(instr) => temp_builder.position_before(&instr),
        None => temp_builder.position_at_end(&entry),
    }
    temp_builder.build_alloca(&ctx.llvm_context().double_type(), name)
}

/// Lowers a sequence of expressions, yielding the last one's value (or
/// `0.0` for an empty sequence -- an empty `if`/`for` body, say).
fn lower_body(body: &[Expr], ctx: &mut CompileContext) -> CompileResult<Value> {
    let mut last = None;
    for expr in body {
        last = Some(expr.lower(ctx)?);
    }
    Ok(last.unwrap_or_else(|| const_double(ctx.llvm_context(), 0.0)))
}

/// Widens an `i1` predicate result to the language's one scalar type.
fn widen(ctx: &CompileContext, bit: &Value) -> Value {
    ctx.builder()
        .build_ui_to_fp(bit, &ctx.llvm_context().double_type(), "booltmp")
}

/// Truthiness test used by `!`, `&&`, and `||`: nonzero is true, matching
/// the result every comparison and logical operator already widens to.
fn truthy(ctx: &CompileContext, value: &Value) -> Value {
    let zero = const_double(ctx.llvm_context(), 0.0);
    ctx.builder()
        .build_fcmp(LLVMRealPredicate::LLVMRealONE, value, &zero, "ifcond")
}

impl Prototype {
    /// Declares this signature as a function in the current module and
    /// names its formal parameters. Does not register it in the context's
    /// prototype table -- callers that need the name resolvable from other
    /// modules must do that themselves (`Function::lower` does, for
    /// `extern` it happens at the driver).
    pub fn lower(&self, ctx: &CompileContext) -> Value {
        let fn_type = scalar_function_type(ctx.llvm_context(), self.params.len());
        let func = ctx.module().add_function(&self.name, fn_type);
        for (i, param_name) in self.params.iter().enumerate() {
            func.get_param(i as u32).set_name(param_name);
        }
        func
    }

    /// The bare operator text for a `binary`/`unary` prototype, e.g. the
    /// `+` in `binary+`. Meaningless for `ProtoKind::Plain`.
    fn operator_text(&self) -> &str {
        match self.kind {
            ProtoKind::BinaryOp => &self.name["binary".len()..],
            ProtoKind::UnaryOp => &self.name["unary".len()..],
            ProtoKind::Plain => &self.name,
        }
    }
}

impl Function {
    pub fn lower(&self, ctx: &mut CompileContext) -> CompileResult<Value> {
        ctx.register_prototype(self.proto.clone());
        if self.proto.kind == ProtoKind::BinaryOp {
            ctx.declare_operator(self.proto.operator_text().to_string(), self.proto.op_precedence);
        }

        let func = get_function(&self.proto.name, ctx)?;
        let entry = ctx.llvm_context().append_basic_block(&func, "entry");
        ctx.builder().position_at_end(&entry);

        ctx.clear_locals();
        for (i, param_name) in self.proto.params.iter().enumerate() {
            let alloca = create_entry_block_alloca(ctx, &func, param_name);
            ctx.builder().build_store(&func.get_param(i as u32), &alloca);
            ctx.bind_local(param_name.clone(), alloca);
        }

        let body_value = lower_body(&self.body, ctx)?;
        ctx.builder().build_ret(&body_value);

        if !func.verify_function(LLVMVerifierFailureAction::LLVMReturnStatusAction) {
            ctx.module().print_to_stderr();
            return Err(CompileError::VerifierFailure(format!(
                "function `{}` failed verification",
                self.proto.name
            )));
        }
        ctx.pass_manager().run(&func);
        Ok(func)
    }
}

impl Expr {
    pub fn lower(&self, ctx: &mut CompileContext) -> CompileResult<Value> {
        match *self {
            Expr::Number(value) => Ok(const_double(ctx.llvm_context(), value)),
            Expr::Variable { ref name, .. } => {
                let slot = ctx
                    .lookup_variable(name)
                    .cloned()
                    .ok_or_else(|| CompileError::UnboundName(name.clone()))?;
                Ok(ctx.builder().build_load(&slot, name))
            }
            Expr::Unary { ref op, ref operand } => lower_unary(op, operand, ctx),
            Expr::Binary {
                ref op,
                ref lhs,
                ref rhs,
            } => lower_binary(op, lhs, rhs, ctx),
            Expr::Call {
                ref callee,
                ref args,
            } => {
                let func = get_function(callee, ctx)?;
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(arg.lower(ctx)?);
                }
                Ok(ctx.builder().build_call(&func, &arg_values, "calltmp"))
            }
            Expr::If {
                ref cond,
                ref then_body,
                ref else_body,
            } => lower_if(cond, then_body, else_body, ctx),
            Expr::For {
                ref var,
                ref start,
                ref end,
                ref step,
                ref body,
            } => lower_for(var, start, end, step, body, ctx),
        }
    }
}

fn lower_unary(op: &str, operand: &Expr, ctx: &mut CompileContext) -> CompileResult<Value> {
    match op {
        "!" => {
            let value = operand.lower(ctx)?;
            let zero = const_double(ctx.llvm_context(), 0.0);
            // `!x` is "x is zero", the opposite sense of `truthy`.
            let eq_zero = ctx
                .builder()
                .build_fcmp(LLVMRealPredicate::LLVMRealOEQ, &value, &zero, "nottmp");
            Ok(widen(ctx, &eq_zero))
        }
        "-" => {
            let value = operand.lower(ctx)?;
            let zero = const_double(ctx.llvm_context(), 0.0);
            Ok(ctx.builder().build_fsub(&zero, &value, "negtmp"))
        }
        _ => {
            let arg = operand.lower(ctx)?;
            let func = get_function(&format!("unary{}", op), ctx)?;
            Ok(ctx.builder().build_call(&func, &[arg], "unop"))
        }
    }
}

fn lower_binary(op: &str, lhs: &Expr, rhs: &Expr, ctx: &mut CompileContext) -> CompileResult<Value> {
    if op == "=" {
        return lower_assignment(lhs, rhs, ctx);
    }

    match op {
        "+" | "-" | "*" | "/" => {
            let l = lhs.lower(ctx)?;
            let r = rhs.lower(ctx)?;
            Ok(match op {
                "+" => ctx.builder().build_fadd(&l, &r, "addtmp"),
                "-" => ctx.builder().build_fsub(&l, &r, "subtmp"),
                "*" => ctx.builder().build_fmul(&l, &r, "multmp"),
                _ => ctx.builder().build_fdiv(&l, &r, "divtmp"),
            })
        }
        "==" | "!=" | "<" | ">" | "<=" | ">=" => {
            let l = lhs.lower(ctx)?;
            let r = rhs.lower(ctx)?;
            let predicate = match op {
                "==" => LLVMRealPredicate::LLVMRealOEQ,
                "!=" => LLVMRealPredicate::LLVMRealONE,
                "<" => LLVMRealPredicate::LLVMRealOLT,
                ">" => LLVMRealPredicate::LLVMRealOGT,
                "<=" => LLVMRealPredicate::LLVMRealOLE,
                _ => LLVMRealPredicate::LLVMRealOGE,
            };
            let bit = ctx.builder().build_fcmp(predicate, &l, &r, "cmptmp");
            Ok(widen(ctx, &bit))
        }
        "&&" | "||" => {
            let l = lhs.lower(ctx)?;
            let r = rhs.lower(ctx)?;
            let l_bit = truthy(ctx, &l);
            let r_bit = truthy(ctx, &r);
            let bit = if op == "&&" {
                ctx.builder().build_and(&l_bit, &r_bit, "andtmp")
            } else {
                ctx.builder().build_or(&l_bit, &r_bit, "ortmp")
            };
            Ok(widen(ctx, &bit))
        }
        _ => {
            let l = lhs.lower(ctx)?;
            let r = rhs.lower(ctx)?;
            let func = get_function(&format!("binary{}", op), ctx)?;
            Ok(ctx.builder().build_call(&func, &[l, r], "binop"))
        }
    }
}

fn lower_assignment(lhs: &Expr, rhs: &Expr, ctx: &mut CompileContext) -> CompileResult<Value> {
    let (name, is_global) = match *lhs {
        Expr::Variable {
            ref name,
            is_global,
        } => (name.clone(), is_global),
        _ => return Err(CompileError::BadAssignment),
    };

    let slot = match ctx.lookup_variable(&name).cloned() {
        Some(slot) => slot,
        None if is_global => {
            let global = ctx.module().add_common_global(&name);
            ctx.bind_global(name.clone(), global.clone());
            global
        }
        None => {
            let func = current_function(ctx);
            let alloca = create_entry_block_alloca(ctx, &func, &name);
            ctx.bind_local(name.clone(), alloca.clone());
            alloca
        }
    };

    // The slot must exist before the RHS lowers, so a self-referencing
    // first assignment like `s = s + i` reads the freshly-zeroed slot
    // instead of failing to resolve `s`.
    let rhs_value = rhs.lower(ctx)?;
    ctx.builder().build_store(&rhs_value, &slot);
    Ok(ctx.builder().build_load(&slot, &name))
}

fn lower_if(
    cond: &Expr,
    then_body: &[Expr],
    else_body: &[Expr],
    ctx: &mut CompileContext,
) -> CompileResult<Value> {
    let cond_value = cond.lower(ctx)?;
    let cond_bit = truthy(ctx, &cond_value);

    let func = current_function(ctx);
    let then_bb = ctx.llvm_context().append_basic_block(&func, "then");
    let else_bb = ctx.llvm_context().create_basic_block("else");
    let merge_bb = ctx.llvm_context().create_basic_block("ifcont");

    ctx.builder().build_cond_br(&cond_bit, &then_bb, &else_bb);

    ctx.builder().position_at_end(&then_bb);
    let then_value = lower_body(then_body, ctx)?;
    ctx.builder().build_br(&merge_bb);
    let then_end_bb = ctx.builder().insert_block();

    func.append_basic_block(&else_bb);
    ctx.builder().position_at_end(&else_bb);
    let else_value = lower_body(else_body, ctx)?;
    ctx.builder().build_br(&merge_bb);
    let else_end_bb = ctx.builder().insert_block();

    func.append_basic_block(&merge_bb);
    ctx.builder().position_at_end(&merge_bb);
    let phi = ctx.builder().build_phi(&ctx.llvm_context().double_type(), "iftmp");
    phi.add_incoming(&then_value, &then_end_bb);
    phi.add_incoming(&else_value, &else_end_bb);
    Ok(phi)
}

fn lower_for(
    var: &str,
    start: &Expr,
    end: &Expr,
    step: &Expr,
    body: &[Expr],
    ctx: &mut CompileContext,
) -> CompileResult<Value> {
    let func = current_function(ctx);
    let alloca = create_entry_block_alloca(ctx, &func, var);

    let start_value = start.lower(ctx)?;
    ctx.builder().build_store(&start_value, &alloca);

    ctx.bind_local(var.to_string(), alloca.clone());

    let entry_end_value = end.lower(ctx)?;
    let entry_cond = truthy(ctx, &entry_end_value);

    let loop_bb = ctx.llvm_context().append_basic_block(&func, "forloop");
    let after_bb = ctx.llvm_context().create_basic_block("afterloop");

    ctx.builder().build_cond_br(&entry_cond, &loop_bb, &after_bb);

    ctx.builder().position_at_end(&loop_bb);
    lower_body(body, ctx)?;

    let step_value = step.lower(ctx)?;
    let current = ctx.builder().build_load(&alloca, var);
    let next = ctx.builder().build_fadd(&current, &step_value, "nextvar");
    ctx.builder().build_store(&next, &alloca);

    let end_value = end.lower(ctx)?;
    let loop_cond = truthy(ctx, &end_value);

    func.append_basic_block(&after_bb);
    ctx.builder().build_cond_br(&loop_cond, &loop_bb, &after_bb);

    ctx.builder().position_at_end(&after_bb);
    ctx.remove_local(var);

    Ok(const_double(ctx.llvm_context(), 0.0))
}
