//! Compact, explicit-width binary encodings.
//!
//! [`BitArchive`] packs booleans, integers of any width up to 32 bits and
//! quantized floats into a bit stream. The float codecs live in
//! [`quantization`].
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod bit_archive;

pub mod quantization;

// -----------------------------------------------------------------------------
// Exports

pub use bit_archive::BitArchive;
