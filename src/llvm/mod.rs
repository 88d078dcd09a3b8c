//! Thin, hand-rolled safe(r) wrappers around the `llvm-sys` FFI bindings.
//!
//! This layer only wraps the slice of the C API the rest of the crate
//! actually drives: context/module/block/value/type handles, the
//! instruction builder, the per-function pass pipeline, target-machine
//! setup, and the ORC JIT stack. It is not a general-purpose LLVM binding.

/// Implements `from_ref`/`ptr()`/`Pointer` formatting and (optionally) `Drop`
/// for a newtype wrapping a raw `llvm-sys` reference.
macro_rules! llvm_wrapped {
    (pub struct $name:ident($raw:ty);) => {
        // No owning `Drop` impl, so the handle is freely `Copy`: callers may
        // hold as many of these as they like without aliasing concerns.
        #[derive(Clone, Copy)]
        pub struct $name {
            ptr: $raw,
        }

        llvm_wrapped!(@common $name($raw));
    };
    (pub struct $name:ident($raw:ty); dispose = $dispose:path;) => {
        pub struct $name {
            ptr: $raw,
        }

        llvm_wrapped!(@common $name($raw));

        impl Drop for $name {
            fn drop(&mut self) {
                unsafe {
                    $dispose(self.ptr);
                }
            }
        }
    };
    (@common $name:ident($raw:ty)) => {
        impl $name {
            /// # Safety
            /// `ptr` must be a live, correctly-typed LLVM reference.
            pub unsafe fn from_ref(ptr: $raw) -> $name {
                $name { ptr }
            }

            pub fn ptr(&self) -> $raw {
                self.ptr
            }
        }

        impl ::std::fmt::Pointer for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                write!(f, "{:p}", self.ptr)
            }
        }
    };
}

/// Generates passthrough methods onto a raw `llvm-sys` function of matching shape.
macro_rules! llvm_passthrough {
    ($(#[$attr:meta])* pub fn $fn_name:ident( $($arg_name:ident : $arg_ty:ty),* ) => $wrapped_name:ident; $($rest:tt)*) => {
        $(#[$attr])*
        pub fn $fn_name(&self $(, $arg_name: $arg_ty)*) {
            unsafe {
                $wrapped_name(self.ptr() $(, $arg_name.ptr())*);
            }
        }
        llvm_passthrough!($($rest)*);
    };
    ($(#[$attr:meta])* pub fn $fn_name:ident( $($arg_name:ident : $arg_ty:ty),* ) -> $ret_ty:ident => $wrapped_name:ident; $($rest:tt)*) => {
        $(#[$attr])*
        pub fn $fn_name(&self $(, $arg_name: $arg_ty)*) -> $ret_ty {
            unsafe {
                $ret_ty::from_ref($wrapped_name(self.ptr() $(, $arg_name.ptr())*))
            }
        }
        llvm_passthrough!($($rest)*);
    };
    () => {};
}

pub mod context;
pub mod module;
pub mod basic_block;
pub mod value;
pub mod types;
pub mod builder;
pub mod target;
pub mod pass_manager;
pub mod jit;

pub use self::basic_block::BasicBlock;
pub use self::builder::Builder;
pub use self::context::Context;
pub use self::jit::{Jit, JitError};
pub use self::module::Module;
pub use self::pass_manager::FunctionPassManager;
pub use self::target::TargetMachine;
pub use self::types::Type;
pub use self::value::Value;
