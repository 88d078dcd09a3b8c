//! The per-function optimization pipeline: instruction combining,
//! reassociation, global-value numbering, CFG simplification, and
//! promotion of entry-block allocas to registers (mem2reg).

use llvm_sys::core::{LLVMCreateFunctionPassManagerForModule, LLVMDisposePassManager,
                      LLVMFinalizeFunctionPassManager, LLVMInitializeFunctionPassManager,
                      LLVMRunFunctionPassManager};
use llvm_sys::prelude::*;
use llvm_sys::transforms::scalar::{LLVMAddCFGSimplificationPass, LLVMAddGVNPass,
                                    LLVMAddInstructionCombiningPass, LLVMAddReassociatePass};
use llvm_sys::transforms::util::LLVMAddPromoteMemoryToRegisterPass;

use llvm::{Module, Value};

llvm_wrapped! {
    pub struct FunctionPassManager(LLVMPassManagerRef);
    dispose = LLVMDisposePassManager;
}

impl FunctionPassManager {
    /// Builds a fresh pass manager wired with the pipeline every compiled
    /// function runs through after its body is lowered.
    pub fn for_module(module: &Module) -> FunctionPassManager {
        unsafe {
            let ptr = LLVMCreateFunctionPassManagerForModule(module.ptr());
            LLVMAddPromoteMemoryToRegisterPass(ptr);
            LLVMAddInstructionCombiningPass(ptr);
            LLVMAddReassociatePass(ptr);
            LLVMAddGVNPass(ptr);
            LLVMAddCFGSimplificationPass(ptr);
            LLVMInitializeFunctionPassManager(ptr);
            FunctionPassManager::from_ref(ptr)
        }
    }

    pub fn run(&self, f: &Value) -> bool {
        unsafe { LLVMRunFunctionPassManager(self.ptr(), f.ptr()) != 0 }
    }

    pub fn finalize(&self) {
        unsafe {
            LLVMFinalizeFunctionPassManager(self.ptr());
        }
    }
}
