//! Unified sheaf solver: local patch fits glued into one global
//! ridge-regularized least-squares system.

pub mod solver;

pub use solver::UnifiedSheafSolver;
