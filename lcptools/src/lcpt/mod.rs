//! `.lcpt` container: a sequence of serialized parses, one per input record,
//! followed by a terminator.
//!
//! ```text
//! { [ 1u8 ][ level: u32 ][ core_count: u64 ]{ [ label: u32 ][ start: u64 ][ end: u64 ] } } * [ 0u8 ]
//! ```
//!
//! All integers are little-endian.

mod common;
pub(crate) mod data;
pub mod no_seek;
pub mod reader;
#[cfg(test)]
mod tests;
mod thread_pool;
pub mod writer;
