// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Constants
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────

/// Residual below this value is snapped to exactly zero and the
/// solution is reported as converged.
pub const EPSILON: f64 = 1e-12;

/// Ridge term added to the diagonal of the normal-equations matrix.
/// Keeps the Gram matrix positive definite when a patch has fewer
/// samples than weights or a gluing row is degenerate.
pub const RIDGE_LAMBDA: f64 = 1e-8;

/// Singular values below this cutoff are treated as zero in the
/// pseudoinverse-based least-squares solve.
pub const SV_CUTOFF: f64 = 1e-10;
