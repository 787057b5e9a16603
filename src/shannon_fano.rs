//! Shannon-Fano prefix codes.
//!
//! A [`Table`] is built once from symbol weights and is read-only
//! afterwards; it can be shared between threads and used for any number
//! of [`Table::encode`] and [`Table::decode`] calls. Encoded data is a
//! [`BitVector`]: 32-bit words read most significant bit first, together
//! with the number of valid bits.

pub mod builder;
pub mod code;
pub mod decoder;
mod encoder;
mod serialization;

pub use builder::{build_table, build_table_from_ranked_list, build_table_from_sequence};
pub use code::{BitVector, Code, Symbol, Table, MAX_CODE_LENGTH};
pub use decoder::{DecodeFailure, DecoderConfig};
