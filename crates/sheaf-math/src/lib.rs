//! Mathematical primitives for the sheaf solver.

pub mod characters;
pub mod linalg;
