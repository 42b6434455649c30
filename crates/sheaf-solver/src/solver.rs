// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Unified Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! UnifiedSheafSolver — the local-to-global least-squares solver.
//!
//! Turns a `SheafProblem` into one augmented linear system: local rows
//! enforce per-patch accuracy, gluing rows enforce cross-patch
//! consistency. The ridge-regularized normal equations are solved in
//! closed form and the squared-norm residual is reported as the
//! obstruction to exact global agreement.

use std::collections::HashMap;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, info};

use sheaf_math::characters::CyclicGroupCharacters;
use sheaf_math::linalg::{adjoint, cholesky_solve};
use sheaf_types::config::{PatchConfig, SolverOptions};
use sheaf_types::error::{SheafError, SheafResult};
use sheaf_types::state::{SheafProblem, SheafSolution};

/// One registered patch: its configuration, its character table, and
/// its slice of the global column layout.
struct PatchEntry {
    name: String,
    config: PatchConfig,
    group: CyclicGroupCharacters,
    col_offset: usize,
    n_weights: usize,
}

/// Ordered patch registry built once per fit. Patch identity is
/// resolved to a numeric index up front so the assembly loops never do
/// text-keyed lookups.
struct PatchRegistry {
    entries: Vec<PatchEntry>,
    index: HashMap<String, usize>,
}

impl PatchRegistry {
    fn build(problem: &SheafProblem) -> SheafResult<Self> {
        let mut entries = Vec::with_capacity(problem.patches.len());
        let mut index = HashMap::with_capacity(problem.patches.len());
        let mut col_offset = 0;

        for patch in &problem.patches {
            patch.config.validate()?;
            if index.contains_key(&patch.name) {
                return Err(SheafError::InvalidInput(format!(
                    "duplicate patch name '{}'",
                    patch.name
                )));
            }
            if patch.v_samples.len() != patch.targets.len() {
                return Err(SheafError::InvalidInput(format!(
                    "patch '{}' has {} samples but {} targets",
                    patch.name,
                    patch.v_samples.len(),
                    patch.targets.len()
                )));
            }
            for (i, sample) in patch.v_samples.iter().enumerate() {
                validate_signal(sample, &patch.config).map_err(|e| {
                    SheafError::InvalidInput(format!(
                        "patch '{}' sample {}: {}",
                        patch.name, i, e
                    ))
                })?;
            }
            for (i, target) in patch.targets.iter().enumerate() {
                if target.is_empty() {
                    return Err(SheafError::InvalidInput(format!(
                        "patch '{}' target {} is empty",
                        patch.name, i
                    )));
                }
            }

            let group = CyclicGroupCharacters::new(patch.config.n_positions)?;
            let n_weights = patch.config.n_weights();

            index.insert(patch.name.clone(), entries.len());
            entries.push(PatchEntry {
                name: patch.name.clone(),
                config: patch.config,
                group,
                col_offset,
                n_weights,
            });
            col_offset += n_weights;
        }

        Ok(PatchRegistry { entries, index })
    }

    fn resolve(&self, name: &str) -> SheafResult<&PatchEntry> {
        self.index
            .get(name)
            .map(|&i| &self.entries[i])
            .ok_or_else(|| SheafError::UnknownPatch(name.to_string()))
    }

    fn total_weights(&self) -> usize {
        self.entries
            .last()
            .map(|e| e.col_offset + e.n_weights)
            .unwrap_or(0)
    }
}

/// Check a signal against a patch configuration.
fn validate_signal(v: &Array2<Complex64>, config: &PatchConfig) -> SheafResult<()> {
    if v.nrows() != config.n_positions || v.ncols() != config.d_model {
        return Err(SheafError::InvalidInput(format!(
            "signal shape ({}, {}) does not match config ({}, {})",
            v.nrows(),
            v.ncols(),
            config.n_positions,
            config.d_model
        )));
    }
    Ok(())
}

/// Feature row of a signal: the (position, character) entries of its
/// character decomposition, restricted to the retained characters and
/// flattened row-major over (position, character).
fn feature_row(
    v: &Array2<Complex64>,
    config: &PatchConfig,
    group: &CyclicGroupCharacters,
) -> Array1<Complex64> {
    let projs = group.decompose_into_characters(v);
    let mut row = Array1::from_elem(config.n_weights(), Complex64::new(0.0, 0.0));
    for p in 0..config.n_positions {
        for j in 0..config.n_characters {
            if j < projs.len() {
                row[p * config.n_characters + j] = projs[j][[p, 0]];
            }
        }
    }
    row
}

/// State of a successful fit: the registry (for prediction) and the
/// solution handed back to the caller.
struct FittedModel {
    registry: PatchRegistry,
    solution: SheafSolution,
}

/// The unified solver. Unfitted until a `fit` succeeds; a failed fit
/// leaves no partial state behind.
pub struct UnifiedSheafSolver {
    options: SolverOptions,
    fitted: Option<FittedModel>,
}

impl Default for UnifiedSheafSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl UnifiedSheafSolver {
    pub fn new() -> Self {
        Self::with_options(SolverOptions::default())
    }

    pub fn with_options(options: SolverOptions) -> Self {
        UnifiedSheafSolver {
            options,
            fitted: None,
        }
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn is_fitted(&self) -> bool {
        self.fitted.is_some()
    }

    /// The solution of the most recent successful fit.
    pub fn solution(&self) -> Option<&SheafSolution> {
        self.fitted.as_ref().map(|m| &m.solution)
    }

    /// Assemble and solve the global system for `problem`.
    ///
    /// Builds one character table per patch, stacks all local accuracy
    /// rows above all gluing consistency rows in a shared global column
    /// layout, solves `(AᴴA + λI)·w = Aᴴb`, and unpacks per-patch
    /// weight matrices. The residual `‖A·w − b‖²` is snapped to exactly
    /// zero below the tolerance, in which case the solution is
    /// converged.
    ///
    /// Any previous solution is discarded up front, so a failed fit
    /// leaves the solver unfitted even when an earlier fit succeeded.
    pub fn fit(&mut self, problem: &SheafProblem) -> SheafResult<SheafSolution> {
        self.fitted = None;

        let registry = PatchRegistry::build(problem)?;
        info!(
            patches = problem.n_patches(),
            gluings = problem.n_gluings(),
            "fitting unified sheaf problem"
        );

        let total_cols = registry.total_weights();
        let local_rows: usize = problem.patches.iter().map(|p| p.n_samples()).sum();
        let gluing_rows = problem.gluings.len();
        let total_rows = local_rows + gluing_rows;

        let mut a = Array2::from_elem((total_rows, total_cols), Complex64::new(0.0, 0.0));
        let mut b = Array1::from_elem(total_rows, Complex64::new(0.0, 0.0));

        // Local accuracy rows: feature_row · weights ≈ target
        let mut row = 0;
        for (patch, entry) in problem.patches.iter().zip(registry.entries.iter()) {
            for (sample, target) in patch.v_samples.iter().zip(patch.targets.iter()) {
                let f = feature_row(sample, &entry.config, &entry.group);
                for (i, &val) in f.iter().enumerate() {
                    a[[row, entry.col_offset + i]] = val;
                }
                b[row] = target[[0, 0]];
                row += 1;
            }
            debug!(
                patch = %entry.name,
                samples = patch.n_samples(),
                weights = entry.n_weights,
                "built local system"
            );
        }

        // Gluing consistency rows: prediction_1 − prediction_2 = 0.
        // Accumulated, so a constraint gluing a patch to itself nets
        // the difference of its two feature rows.
        for (g, gluing) in problem.gluings.iter().enumerate() {
            let entry_1 = registry.resolve(&gluing.patch_1)?;
            let entry_2 = registry.resolve(&gluing.patch_2)?;
            validate_signal(&gluing.constraint_data_1, &entry_1.config)?;
            validate_signal(&gluing.constraint_data_2, &entry_2.config)?;

            let f1 = feature_row(&gluing.constraint_data_1, &entry_1.config, &entry_1.group);
            let f2 = feature_row(&gluing.constraint_data_2, &entry_2.config, &entry_2.group);

            for (i, &val) in f1.iter().enumerate() {
                a[[row, entry_1.col_offset + i]] += val;
            }
            for (i, &val) in f2.iter().enumerate() {
                a[[row, entry_2.col_offset + i]] -= val;
            }
            // b[row] stays zero: the two predictions must agree
            debug!(
                gluing = g + 1,
                patch_1 = %entry_1.name,
                patch_2 = %entry_2.name,
                "built gluing constraint"
            );
            row += 1;
        }

        info!(
            rows = total_rows,
            cols = total_cols,
            local_rows,
            gluing_rows,
            "assembled global system"
        );

        // Ridge-regularized normal equations: (AᴴA + λI)·w = Aᴴb
        let a_h = adjoint(&a);
        let mut gram = a_h.dot(&a);
        let ridge = Complex64::new(self.options.ridge_lambda, 0.0);
        for i in 0..total_cols {
            gram[[i, i]] += ridge;
        }
        let rhs = a_h.dot(&b);
        let w = cholesky_solve(&gram, &rhs)?;

        // Residual: squared norm of A·w − b
        let fitted_vals = a.dot(&w);
        let mut residual = 0.0;
        for r in 0..total_rows {
            residual += (fitted_vals[r] - b[r]).norm_sqr();
        }
        let converged = residual < self.options.tolerance;
        if converged {
            residual = 0.0;
        }

        info!(
            weights = w.len(),
            residual, converged, "global system solved"
        );

        let solution = unpack_solution(&registry, &w, residual, converged);
        self.fitted = Some(FittedModel {
            registry,
            solution: solution.clone(),
        });
        Ok(solution)
    }

    /// Predict the scalar output of a fitted patch for a new signal.
    ///
    /// The feature row is recomputed against the patch's stored
    /// configuration and combined with the flattened weights through
    /// the plain (unconjugated) product, matching the rows of the
    /// assembled system.
    pub fn predict(&self, patch_name: &str, v: &Array2<Complex64>) -> SheafResult<Complex64> {
        let model = self.fitted.as_ref().ok_or(SheafError::NotFitted)?;
        let entry = model.registry.resolve(patch_name)?;
        validate_signal(v, &entry.config)?;

        let f = feature_row(v, &entry.config, &entry.group);
        let weights = model
            .solution
            .weights
            .get(&entry.name)
            .ok_or_else(|| SheafError::UnknownPatch(entry.name.clone()))?;

        let n_characters = entry.config.n_characters;
        let mut prediction = Complex64::new(0.0, 0.0);
        for p in 0..entry.config.n_positions {
            for j in 0..n_characters {
                prediction += f[p * n_characters + j] * weights[[p, j]];
            }
        }
        Ok(prediction)
    }
}

/// Slice the flat weight vector back into per-patch
/// `[n_positions, n_characters]` matrices.
fn unpack_solution(
    registry: &PatchRegistry,
    w: &Array1<Complex64>,
    residual_error: f64,
    converged: bool,
) -> SheafSolution {
    let mut weights = HashMap::with_capacity(registry.entries.len());
    for entry in &registry.entries {
        let n_characters = entry.config.n_characters;
        let mat = Array2::from_shape_fn(
            (entry.config.n_positions, n_characters),
            |(p, j)| w[entry.col_offset + p * n_characters + j],
        );
        weights.insert(entry.name.clone(), mat);
    }
    SheafSolution {
        weights,
        residual_error,
        converged,
    }
}
