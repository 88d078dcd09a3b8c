//! Bindings to LLVM module objects.

use std::ffi::{CStr, CString};
use libc::c_char;

use llvm_sys::core::*;
use llvm_sys::prelude::*;
use llvm_sys::analysis::{LLVMVerifierFailureAction, LLVMVerifyModule};
use llvm_sys::target_machine::LLVMTargetMachineRef;
use llvm_sys::{LLVMLinkage, LLVMModule};

use llvm::{TargetMachine, Type, Value};

llvm_wrapped! {
    pub struct Module(LLVMModuleRef);
    dispose = LLVMDisposeModule;
}

impl Module {
    pub fn with_name(name: &str) -> Module {
        let c_name = CString::new(name).unwrap();
        unsafe { Module::from_ref(LLVMModuleCreateWithName(c_name.as_ptr() as *const c_char)) }
    }

    pub fn set_data_layout(&self, machine: &TargetMachine) {
        self.set_data_layout_from_ptr(machine.ptr());
    }

    /// Same as `set_data_layout`, but takes a raw target-machine handle.
    /// Used once the owning `TargetMachine` has been handed to the JIT and
    /// only its (still-valid) pointer remains available.
    pub fn set_data_layout_from_ptr(&self, machine: LLVMTargetMachineRef) {
        unsafe {
            let layout = llvm_sys::target_machine::LLVMCreateTargetDataLayout(machine);
            LLVMSetModuleDataLayout(self.ptr(), layout);
        }
    }

    pub fn get_function(&self, name: &str) -> Option<Value> {
        let c_name = CString::new(name).unwrap();
        let func = unsafe { LLVMGetNamedFunction(self.ptr(), c_name.as_ptr() as *const c_char) };
        if func.is_null() {
            None
        } else {
            Some(unsafe { Value::from_ref(func) })
        }
    }

    pub fn add_function(&self, name: &str, ty: Type) -> Value {
        let c_name = CString::new(name).unwrap();
        unsafe {
            Value::from_ref(LLVMAddFunction(
                self.ptr(),
                c_name.as_ptr() as *const c_char,
                ty.ptr(),
            ))
        }
    }

    /// Declares a module-level `double` global with common linkage and
    /// 8-byte alignment, as required for implicitly-created `global` locals.
    pub fn add_common_global(&self, name: &str) -> Value {
        let c_name = CString::new(name).unwrap();
        unsafe {
            let double_ty = LLVMDoubleTypeInContext(LLVMGetModuleContext(self.ptr()));
            let global = LLVMAddGlobal(self.ptr(), double_ty, c_name.as_ptr() as *const c_char);
            LLVMSetLinkage(global, LLVMLinkage::LLVMCommonLinkage);
            LLVMSetInitializer(global, LLVMConstReal(double_ty, 0.0));
            LLVMSetAlignment(global, 8);
            Value::from_ref(global)
        }
    }

    pub fn verify(&self, action: LLVMVerifierFailureAction) -> Result<(), String> {
        let mut error = 0 as *mut c_char;
        unsafe {
            if LLVMVerifyModule(self.ptr(), action, &mut error) > 0 {
                let message = CStr::from_ptr(error).to_string_lossy().into_owned();
                LLVMDisposeMessage(error);
                Err(message)
            } else {
                Ok(())
            }
        }
    }

    pub fn print_to_stderr(&self) {
        unsafe {
            LLVMDumpModule(self.ptr());
        }
    }
}

/// A `Module` ceases to exist once its ownership is transferred into the
/// JIT; `into_raw` surfaces that transfer explicitly instead of letting
/// `Drop` run on a module the JIT now owns.
impl Module {
    pub fn into_raw(self) -> *mut LLVMModule {
        let ptr = self.ptr();
        ::std::mem::forget(self);
        ptr
    }
}
