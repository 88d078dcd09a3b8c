//! LLVM type objects.

use llvm_sys::prelude::*;

llvm_wrapped! {
    pub struct Type(LLVMTypeRef);
    // Owned by the surrounding context.
}

/// Builds the `(double, double, ...) -> double` function type every
/// user-defined function and extern declaration in the language shares.
pub fn scalar_function_type(ctx: &super::Context, arity: usize) -> Type {
    use llvm_sys::core::{LLVMDoubleTypeInContext, LLVMFunctionType};
    unsafe {
        let double_ty = LLVMDoubleTypeInContext(ctx.ptr());
        let mut params = vec![double_ty; arity];
        Type::from_ref(LLVMFunctionType(
            double_ty,
            params.as_mut_ptr(),
            params.len() as u32,
            0,
        ))
    }
}

/// A `double` constant, the only literal form the language has.
pub fn const_double(ctx: &super::Context, value: f64) -> super::Value {
    use llvm_sys::core::{LLVMConstReal, LLVMDoubleTypeInContext};
    unsafe {
        let double_ty = LLVMDoubleTypeInContext(ctx.ptr());
        super::Value::from_ref(LLVMConstReal(double_ty, value))
    }
}
