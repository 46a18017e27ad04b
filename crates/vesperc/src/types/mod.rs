//! Primitive value types
//!
//! The language has no user-defined types: every declaration and every
//! checked expression carries one of these five tags.

mod primitive;

pub use primitive::Type;
