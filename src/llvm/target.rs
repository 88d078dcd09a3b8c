//! Bindings to LLVM target-machine setup, used once at startup to give the
//! JIT a concrete data layout and code-gen configuration for the host.

use std::ffi::{CStr, CString};
use libc::c_char;

use llvm_sys::core::LLVMDisposeMessage;
use llvm_sys::target::*;
use llvm_sys::target_machine::*;

pub fn initialize_native_target() -> Result<(), String> {
    unsafe {
        if LLVM_InitializeNativeTarget() == 1 {
            return Err("failed to initialize native target".into());
        }
        LLVM_InitializeNativeAsmPrinter();
    }
    Ok(())
}

fn native_target_triple() -> String {
    unsafe {
        let buf = LLVMGetDefaultTargetTriple();
        let result = CStr::from_ptr(buf).to_string_lossy().into_owned();
        LLVMDisposeMessage(buf);
        result
    }
}

fn native_cpu_name() -> String {
    unsafe {
        let buf = LLVMGetHostCPUName();
        let result = CStr::from_ptr(buf).to_string_lossy().into_owned();
        LLVMDisposeMessage(buf);
        result
    }
}

fn native_cpu_features() -> String {
    unsafe {
        let buf = LLVMGetHostCPUFeatures();
        let result = CStr::from_ptr(buf).to_string_lossy().into_owned();
        LLVMDisposeMessage(buf);
        result
    }
}

fn native_target() -> Result<LLVMTargetRef, String> {
    let triple = CString::new(native_target_triple()).unwrap();
    let mut target: LLVMTargetRef = ::std::ptr::null_mut();
    let mut error = 0 as *mut c_char;
    unsafe {
        if LLVMGetTargetFromTriple(triple.as_ptr(), &mut target, &mut error) != 0 {
            let message = CStr::from_ptr(error).to_string_lossy().into_owned();
            LLVMDisposeMessage(error);
            return Err(message);
        }
    }
    Ok(target)
}

llvm_wrapped! {
    pub struct TargetMachine(LLVMTargetMachineRef);
    dispose = LLVMDisposeTargetMachine;
}

impl TargetMachine {
    /// The target machine for the host, configured for JIT code generation.
    pub fn native_for_jit() -> Result<TargetMachine, String> {
        let target = native_target()?;
        let triple = CString::new(native_target_triple()).unwrap();
        let cpu = CString::new(native_cpu_name()).unwrap();
        let features = CString::new(native_cpu_features()).unwrap();
        unsafe {
            Ok(TargetMachine::from_ref(LLVMCreateTargetMachine(
                target,
                triple.as_ptr(),
                cpu.as_ptr(),
                features.as_ptr(),
                LLVMCodeGenOptLevel::LLVMCodeGenLevelDefault,
                LLVMRelocMode::LLVMRelocDefault,
                LLVMCodeModel::LLVMCodeModelJITDefault,
            )))
        }
    }
}
