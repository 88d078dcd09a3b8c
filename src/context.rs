//! The single process-wide compilation context: everything lowering reads
//! and writes lives here, bundled into one value threaded through the
//! pipeline (§9 of the design notes — "exactly one live compilation
//! context at a time").

use std::collections::HashMap;

use llvm_sys::target_machine::LLVMTargetMachineRef;

use ast::Prototype;
use error::{CompileError, CompileResult};
use llvm::{Builder, Context, FunctionPassManager, Jit, Module, TargetMachine, Value};
use parse::builtin_precedence;

pub struct CompileContext<'ctx> {
    context: &'ctx Context,
    builder: Builder<'ctx>,
    module: Module,
    pass_manager: FunctionPassManager,
    jit: Jit,
    machine_ptr: LLVMTargetMachineRef,
    module_count: u64,

    /// Function name -> most-recently-parsed signature. Lets a freshly
    /// minted module re-declare anything it calls that was defined in an
    /// earlier, now-retired module.
    prototypes: HashMap<String, Prototype>,
    /// Operator string -> precedence. Grows when a `binary` prototype is lowered.
    precedence: HashMap<String, i32>,
    /// Valid only while lowering the current function's body.
    locals: HashMap<String, Value>,
    /// Persists for the process lifetime.
    globals: HashMap<String, Value>,

    quiet: bool,
}

impl<'ctx> CompileContext<'ctx> {
    pub fn new(context: &'ctx Context, quiet: bool) -> CompileResult<CompileContext<'ctx>> {
        let target_machine =
            TargetMachine::native_for_jit().map_err(CompileError::VerifierFailure)?;
        let machine_ptr = target_machine.ptr();
        let jit = Jit::new(target_machine);

        let module = Module::with_name("scalarc_module_0");
        module.set_data_layout_from_ptr(machine_ptr);
        let pass_manager = FunctionPassManager::for_module(&module);

        Ok(CompileContext {
            context,
            builder: Builder::new(context),
            module,
            pass_manager,
            jit,
            machine_ptr,
            module_count: 1,
            prototypes: HashMap::new(),
            precedence: builtin_precedence(),
            locals: HashMap::new(),
            globals: HashMap::new(),
            quiet,
        })
    }

    pub fn llvm_context(&self) -> &'ctx Context {
        self.context
    }

    pub fn builder(&self) -> &Builder<'ctx> {
        &self.builder
    }

    pub fn module(&self) -> &Module {
        &self.module
    }

    pub fn pass_manager(&self) -> &FunctionPassManager {
        &self.pass_manager
    }

    pub fn jit(&self) -> &Jit {
        &self.jit
    }

    pub fn quiet(&self) -> bool {
        self.quiet
    }

    pub fn precedence(&self) -> &HashMap<String, i32> {
        &self.precedence
    }

    pub fn declare_operator(&mut self, op: String, precedence: i32) {
        self.precedence.insert(op, precedence);
    }

    pub fn prototype(&self, name: &str) -> Option<&Prototype> {
        self.prototypes.get(name)
    }

    pub fn register_prototype(&mut self, proto: Prototype) {
        self.prototypes.insert(proto.name.clone(), proto);
    }

    pub fn clear_locals(&mut self) {
        self.locals.clear();
    }

    pub fn bind_local(&mut self, name: String, slot: Value) {
        self.locals.insert(name, slot);
    }

    pub fn remove_local(&mut self, name: &str) {
        self.locals.remove(name);
    }

    pub fn bind_global(&mut self, name: String, slot: Value) {
        self.globals.insert(name, slot);
    }

    /// Local scope first, then global scope — per §3's lookup order.
    pub fn lookup_variable(&self, name: &str) -> Option<&Value> {
        self.locals.get(name).or_else(|| self.globals.get(name))
    }

    /// Swaps in a fresh module and pass manager, returning the one that was
    /// current so the caller can transfer it to the JIT. The prototype
    /// registry, precedence table, and global scope all survive the swap.
    pub fn retire_module(&mut self) -> Module {
        self.module_count += 1;
        let name = format!("scalarc_module_{}", self.module_count);
        let next_module = Module::with_name(&name);
        next_module.set_data_layout_from_ptr(self.machine_ptr);
        let next_pass_manager = FunctionPassManager::for_module(&next_module);

        let old_module = ::std::mem::replace(&mut self.module, next_module);
        self.pass_manager = next_pass_manager;
        old_module
    }
}
