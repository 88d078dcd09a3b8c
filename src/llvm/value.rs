//! Bindings to LLVM value objects.

use llvm_sys::analysis::{LLVMVerifierFailureAction, LLVMVerifyFunction};
use llvm_sys::core::{LLVMAppendExistingBasicBlock, LLVMGetEntryBasicBlock};
use llvm_sys::prelude::*;

use llvm::BasicBlock;

llvm_wrapped! {
    pub struct Value(LLVMValueRef);
    // Owned by the Context the defining instruction/function lives in.
}

impl Value {
    pub fn set_name(&self, name: &str) {
        use llvm_sys::core::LLVMSetValueName2;
        use std::ffi::CString;
        let c_name = CString::new(name).unwrap();
        unsafe {
            LLVMSetValueName2(self.ptr(), c_name.as_ptr(), name.len());
        }
    }

    pub fn get_param(&self, index: u32) -> Value {
        unsafe { Value::from_ref(llvm_sys::core::LLVMGetParam(self.ptr(), index)) }
    }

    /// The first block of this function. Valid only when called on a function value.
    pub fn entry_block(&self) -> BasicBlock {
        unsafe { BasicBlock::from_ref(LLVMGetEntryBasicBlock(self.ptr())) }
    }

    /// Attaches a block created via `Context::create_basic_block` to this
    /// function, in whatever position it was created relative to others.
    pub fn append_basic_block(&self, block: &BasicBlock) {
        unsafe {
            LLVMAppendExistingBasicBlock(self.ptr(), block.ptr());
        }
    }

    /// Runs LLVM's per-function verifier. `true` means the function is well-formed.
    pub fn verify_function(&self, action: LLVMVerifierFailureAction) -> bool {
        unsafe { LLVMVerifyFunction(self.ptr(), action) == 0 }
    }

    pub fn add_incoming(&self, value: &Value, block: &super::BasicBlock) {
        let mut values = [value.ptr()];
        let mut blocks = [block.ptr()];
        unsafe {
            llvm_sys::core::LLVMAddIncoming(
                self.ptr(),
                values.as_mut_ptr(),
                blocks.as_mut_ptr(),
                1,
            );
        }
    }
}
