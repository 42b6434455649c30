// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use std::collections::HashMap;

use ndarray::Array2;
use num_complex::Complex64;

use crate::config::PatchConfig;

/// A local fitting problem: input signals and matching targets over a
/// fixed-length sequence.
///
/// Every sample is an `[n_positions, d_model]` complex matrix; targets
/// pair with samples one-to-one.
#[derive(Debug, Clone)]
pub struct Patch {
    pub name: String,
    pub v_samples: Vec<Array2<Complex64>>,
    pub targets: Vec<Array2<Complex64>>,
    pub config: PatchConfig,
}

impl Patch {
    pub fn new(name: impl Into<String>, config: PatchConfig) -> Self {
        Patch {
            name: name.into(),
            v_samples: Vec::new(),
            targets: Vec::new(),
            config,
        }
    }

    /// Append a (sample, target) pair.
    pub fn push_sample(&mut self, sample: Array2<Complex64>, target: Array2<Complex64>) {
        self.v_samples.push(sample);
        self.targets.push(target);
    }

    pub fn n_samples(&self) -> usize {
        self.v_samples.len()
    }
}

/// An equality requirement between two patches: the paired data points
/// must yield the same prediction.
#[derive(Debug, Clone)]
pub struct GluingConstraint {
    pub patch_1: String,
    pub patch_2: String,
    pub constraint_data_1: Array2<Complex64>,
    pub constraint_data_2: Array2<Complex64>,
}

impl GluingConstraint {
    pub fn new(
        patch_1: impl Into<String>,
        patch_2: impl Into<String>,
        constraint_data_1: Array2<Complex64>,
        constraint_data_2: Array2<Complex64>,
    ) -> Self {
        GluingConstraint {
            patch_1: patch_1.into(),
            patch_2: patch_2.into(),
            constraint_data_1,
            constraint_data_2,
        }
    }
}

/// A full local-to-global problem: patches plus gluing constraints.
#[derive(Debug, Clone, Default)]
pub struct SheafProblem {
    pub patches: Vec<Patch>,
    pub gluings: Vec<GluingConstraint>,
}

impl SheafProblem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_patch(&mut self, patch: Patch) -> &mut Self {
        self.patches.push(patch);
        self
    }

    pub fn add_gluing(&mut self, gluing: GluingConstraint) -> &mut Self {
        self.gluings.push(gluing);
        self
    }

    pub fn n_patches(&self) -> usize {
        self.patches.len()
    }

    pub fn n_gluings(&self) -> usize {
        self.gluings.len()
    }
}

/// Output of a successful fit.
///
/// Per-patch weight matrices are `[n_positions, n_characters]`,
/// row-major over (position, character). `residual_error` is the
/// squared-norm obstruction of the global least-squares solve; exactly
/// zero means all local and gluing constraints are satisfiable.
#[derive(Debug, Clone)]
pub struct SheafSolution {
    pub weights: HashMap<String, Array2<Complex64>>,
    pub residual_error: f64,
    pub converged: bool,
}
