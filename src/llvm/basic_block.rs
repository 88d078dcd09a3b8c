//! Bindings to LLVM basic block objects.

use llvm_sys::core::*;
use llvm_sys::prelude::*;

use llvm::Value;

llvm_wrapped! {
    pub struct BasicBlock(LLVMBasicBlockRef);
    // Owned by the function it's appended to.
}

impl BasicBlock {
    pub fn as_value(&self) -> Value {
        unsafe { Value::from_ref(LLVMBasicBlockAsValue(self.ptr())) }
    }

    pub fn get_parent(&self) -> Value {
        unsafe { Value::from_ref(LLVMGetBasicBlockParent(self.ptr())) }
    }

    /// `None` for a block with no instructions yet, e.g. a freshly opened entry block.
    pub fn first_instruction(&self) -> Option<Value> {
        let instr = unsafe { LLVMGetFirstInstruction(self.ptr()) };
        if instr.is_null() {
            None
        } else {
            Some(unsafe { Value::from_ref(instr) })
        }
    }
}
