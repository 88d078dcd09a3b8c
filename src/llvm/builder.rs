//! The LLVM instruction builder.
//!
//! Every lowering step in `ir::emitter` drives exactly one of these
//! methods against the builder's current insertion block.

use std::ffi::CString;

use libc::{c_char, c_uint};

use llvm_sys::core::*;
use llvm_sys::prelude::*;
use llvm_sys::{LLVMIntPredicate, LLVMRealPredicate};

use llvm::{BasicBlock, Context, Type, Value};

pub struct Builder<'ctx> {
    ptr: LLVMBuilderRef,
    _lt: ::std::marker::PhantomData<&'ctx ()>,
}

impl<'ctx> Drop for Builder<'ctx> {
    fn drop(&mut self) {
        unsafe {
            LLVMDisposeBuilder(self.ptr());
        }
    }
}

impl<'ctx> Builder<'ctx> {
    pub unsafe fn from_ref(ptr: LLVMBuilderRef) -> Builder<'ctx> {
        Builder {
            ptr,
            _lt: ::std::marker::PhantomData,
        }
    }

    pub fn ptr(&self) -> LLVMBuilderRef {
        self.ptr
    }

    pub fn new(ctx: &'ctx Context) -> Builder<'ctx> {
        unsafe { Builder::from_ref(LLVMCreateBuilderInContext(ctx.ptr())) }
    }

    llvm_passthrough! {
        pub fn position_at_end(block: &BasicBlock) => LLVMPositionBuilderAtEnd;
        pub fn insert_block() -> BasicBlock => LLVMGetInsertBlock;
        pub fn build_ret_void() -> Value => LLVMBuildRetVoid;
        pub fn build_ret(value: &Value) -> Value => LLVMBuildRet;
        pub fn build_br(dest: &BasicBlock) -> Value => LLVMBuildBr;
    }

    /// Repositions the builder to just before `instr`, used to splice an
    /// entry-block alloca in ahead of whatever's already there.
    pub fn position_before(&self, instr: &Value) {
        unsafe {
            LLVMPositionBuilderBefore(self.ptr(), instr.ptr());
        }
    }

    pub fn build_cond_br(&self, cond: &Value, then_block: &BasicBlock, else_block: &BasicBlock) -> Value {
        unsafe {
            Value::from_ref(LLVMBuildCondBr(
                self.ptr(),
                cond.ptr(),
                then_block.ptr(),
                else_block.ptr(),
            ))
        }
    }

    pub fn build_fadd(&self, lhs: &Value, rhs: &Value, name: &str) -> Value {
        self.build_fp_binop(LLVMBuildFAdd, lhs, rhs, name)
    }

    pub fn build_fsub(&self, lhs: &Value, rhs: &Value, name: &str) -> Value {
        self.build_fp_binop(LLVMBuildFSub, lhs, rhs, name)
    }

    pub fn build_fmul(&self, lhs: &Value, rhs: &Value, name: &str) -> Value {
        self.build_fp_binop(LLVMBuildFMul, lhs, rhs, name)
    }

    pub fn build_fdiv(&self, lhs: &Value, rhs: &Value, name: &str) -> Value {
        self.build_fp_binop(LLVMBuildFDiv, lhs, rhs, name)
    }

    fn build_fp_binop(
        &self,
        f: unsafe extern "C" fn(LLVMBuilderRef, LLVMValueRef, LLVMValueRef, *const c_char) -> LLVMValueRef,
        lhs: &Value,
        rhs: &Value,
        name: &str,
    ) -> Value {
        let name = CString::new(name).unwrap();
        unsafe {
            Value::from_ref(f(self.ptr(), lhs.ptr(), rhs.ptr(), name.as_ptr() as *const c_char))
        }
    }

    pub fn build_and(&self, lhs: &Value, rhs: &Value, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildAnd(self.ptr(), lhs.ptr(), rhs.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_or(&self, lhs: &Value, rhs: &Value, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildOr(self.ptr(), lhs.ptr(), rhs.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_alloca(&self, ty: &Type, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildAlloca(self.ptr(), ty.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_load(&self, pointer: &Value, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildLoad(self.ptr(), pointer.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_store(&self, val: &Value, pointer: &Value) -> Value {
        unsafe { Value::from_ref(LLVMBuildStore(self.ptr(), val.ptr(), pointer.ptr())) }
    }

    pub fn build_icmp(&self, op: LLVMIntPredicate, lhs: &Value, rhs: &Value, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildICmp(self.ptr(), op, lhs.ptr(), rhs.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_fcmp(&self, op: LLVMRealPredicate, lhs: &Value, rhs: &Value, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildFCmp(self.ptr(), op, lhs.ptr(), rhs.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_ui_to_fp(&self, val: &Value, ty: &Type, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildUIToFP(self.ptr(), val.ptr(), ty.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_phi(&self, ty: &Type, name: &str) -> Value {
        let name = CString::new(name).unwrap();
        unsafe { Value::from_ref(LLVMBuildPhi(self.ptr(), ty.ptr(), name.as_ptr() as *const c_char)) }
    }

    pub fn build_call(&self, func: &Value, args: &[Value], name: &str) -> Value {
        let name = CString::new(name).unwrap();
        let mut args_ptrs: Vec<LLVMValueRef> = args.iter().map(Value::ptr).collect();
        unsafe {
            Value::from_ref(LLVMBuildCall(
                self.ptr(),
                func.ptr(),
                args_ptrs.as_mut_ptr(),
                args_ptrs.len() as c_uint,
                name.as_ptr() as *const c_char,
            ))
        }
    }
}
