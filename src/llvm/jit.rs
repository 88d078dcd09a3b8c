//! A module-oriented JIT on top of LLVM's ORC v1 stack: modules are handed
//! over by value, a symbol resolves to a callable address by name, and a
//! module can be retired by the key returned when it was added.

use std::ffi::{CStr, CString};
use std::fmt;
use std::ptr;

use libc::{c_char, c_void};

use llvm_sys::execution_engine::LLVMLinkInMCJIT;
use llvm_sys::orc::*;
use llvm_sys::support::LLVMSearchForAddressOfSymbol;

use llvm::{Module, TargetMachine};

#[derive(Debug, Clone, PartialEq)]
pub enum JitError {
    AddModuleFailed(String),
    SymbolNotFound(String),
    RemoveModuleFailed(String),
}

impl fmt::Display for JitError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            JitError::AddModuleFailed(ref msg) => write!(f, "failed to add module to JIT: {}", msg),
            JitError::SymbolNotFound(ref name) => write!(f, "undefined symbol: {}", name),
            JitError::RemoveModuleFailed(ref msg) => write!(f, "failed to remove module from JIT: {}", msg),
        }
    }
}

pub type ModuleKey = LLVMOrcModuleHandle;

/// Resolves a symbol a module references but does not define, by asking
/// the host process's own symbol table -- this is how externs like
/// `printd` or libm's `sin`, already linked into the running binary,
/// become callable from JIT-compiled code.
extern "C" fn process_symbol_resolver(name: *const c_char, _ctx: *mut c_void) -> u64 {
    unsafe { LLVMSearchForAddressOfSymbol(name) as u64 }
}

pub struct Jit {
    ptr: LLVMOrcJITStackRef,
}

impl Drop for Jit {
    fn drop(&mut self) {
        unsafe {
            LLVMOrcDisposeInstance(self.ptr);
        }
    }
}

impl Jit {
    pub fn new(target_machine: TargetMachine) -> Jit {
        unsafe {
            LLVMLinkInMCJIT();
        }
        let ptr = unsafe { LLVMOrcCreateInstance(target_machine.ptr()) };
        // The JIT stack now owns the target machine.
        ::std::mem::forget(target_machine);
        Jit { ptr }
    }

    /// Transfers ownership of `module` into the JIT and returns the key
    /// later used to look up its symbols or remove it.
    pub fn add_module(&self, module: Module) -> Result<ModuleKey, JitError> {
        let mut handle: LLVMOrcModuleHandle = 0;
        let module_ref = module.into_raw();
        let result = unsafe {
            LLVMOrcAddEagerlyCompiledIR(
                self.ptr,
                &mut handle,
                module_ref,
                Some(process_symbol_resolver),
                ptr::null_mut(),
            )
        };
        if result == LLVMOrcErrorCode::LLVMOrcErrSuccess {
            Ok(handle)
        } else {
            Err(JitError::AddModuleFailed(self.last_error()))
        }
    }

    pub fn find_symbol(&self, name: &str) -> Result<u64, JitError> {
        let c_name = CString::new(name).unwrap();
        let mut addr: u64 = 0;
        let result = unsafe { LLVMOrcGetSymbolAddress(self.ptr, &mut addr, c_name.as_ptr()) };
        if result != LLVMOrcErrorCode::LLVMOrcErrSuccess {
            return Err(JitError::SymbolNotFound(name.to_string()));
        }
        if addr == 0 {
            return Err(JitError::SymbolNotFound(name.to_string()));
        }
        Ok(addr)
    }

    /// # Safety
    /// The caller must know the symbol's true signature matches `F`.
    pub unsafe fn find_symbol_as<F>(&self, name: &str) -> Result<F, JitError>
    where
        F: Copy,
    {
        assert_eq!(::std::mem::size_of::<F>(), ::std::mem::size_of::<u64>());
        let addr = self.find_symbol(name)?;
        Ok(::std::mem::transmute_copy(&addr))
    }

    pub fn remove_module(&self, key: ModuleKey) -> Result<(), JitError> {
        let result = unsafe { LLVMOrcRemoveModule(self.ptr, key) };
        if result == LLVMOrcErrorCode::LLVMOrcErrSuccess {
            Ok(())
        } else {
            Err(JitError::RemoveModuleFailed(self.last_error()))
        }
    }

    fn last_error(&self) -> String {
        unsafe {
            let msg = LLVMOrcGetErrorMsg(self.ptr);
            if msg.is_null() {
                String::from("unknown JIT error")
            } else {
                CStr::from_ptr(msg).to_string_lossy().into_owned()
            }
        }
    }
}
