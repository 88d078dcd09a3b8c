//! Bindings to LLVM context objects.

use std::ffi::CString;
use libc::c_char;

use llvm_sys::core::*;
use llvm_sys::prelude::*;

use llvm::{BasicBlock, Value};

llvm_wrapped! {
    pub struct Context(LLVMContextRef);
    dispose = LLVMContextDispose;
}

impl Context {
    pub fn new() -> Context {
        unsafe { Context::from_ref(LLVMContextCreate()) }
    }

    pub fn append_basic_block(&self, func: &Value, name: &str) -> BasicBlock {
        let name = CString::new(name).unwrap();
        unsafe {
            BasicBlock::from_ref(LLVMAppendBasicBlockInContext(
                self.ptr(),
                func.ptr(),
                name.as_ptr() as *const c_char,
            ))
        }
    }

    pub fn double_type(&self) -> super::Type {
        unsafe { super::Type::from_ref(LLVMDoubleTypeInContext(self.ptr())) }
    }

    /// Creates a block not yet attached to any function. Used for `else`/
    /// `ifcont`/`afterloop` blocks, which are built before the instructions
    /// that branch to them but only spliced into the function once the
    /// blocks ahead of them in the CFG have been populated.
    pub fn create_basic_block(&self, name: &str) -> BasicBlock {
        let name = CString::new(name).unwrap();
        unsafe {
            BasicBlock::from_ref(LLVMCreateBasicBlockInContext(
                self.ptr(),
                name.as_ptr() as *const c_char,
            ))
        }
    }
}
