//! Lightweight type-erased pointer wrappers.
//!
//! Reflected types are sometimes constructed directly inside caller-provided
//! memory (for example one arena holding a whole collection of instances).
//! The type-erased construction and destruction routines stored in a type's
//! info only see raw bytes, so they are expressed with these wrappers instead
//! of bare raw pointers: each one carries a lifetime and an optional alignment
//! check.
//!
//! **Ptr** and **PtrMut**
//!
//! [`Ptr<'a>`] and [`PtrMut<'a>`] are type-erased `&T` and `&mut T` equivalents.
//!
//! **OwningPtr**
//!
//! [`OwningPtr<'a>`] owns the pointee: it can be consumed with
//! [`drop_as`](OwningPtr::drop_as) or read out with [`read`](OwningPtr::read).
//! It does **not** manage the allocation behind it.
#![expect(unsafe_code, reason = "Raw pointers are inherently unsafe.")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod type_erased;

// -----------------------------------------------------------------------------
// Top-level exports

pub use type_erased::{OwningPtr, Ptr, PtrMut};
