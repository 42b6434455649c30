// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::constants::{EPSILON, RIDGE_LAMBDA};
use crate::error::{SheafError, SheafResult};

/// Per-patch fitting configuration.
///
/// `n_positions` is the sequence length (and the cyclic group order),
/// `n_characters` the number of character projections retained as
/// features. `d_model == 1` is the supported contract; wider embeddings
/// are rejected at fit time rather than silently scalarized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchConfig {
    pub n_positions: usize,
    pub n_characters: usize,
    #[serde(default = "default_d_model")]
    pub d_model: usize,
}

fn default_d_model() -> usize {
    1
}

impl PatchConfig {
    pub fn new(n_positions: usize, n_characters: usize) -> Self {
        PatchConfig {
            n_positions,
            n_characters,
            d_model: default_d_model(),
        }
    }

    /// Number of weights this patch contributes to the global system.
    pub fn n_weights(&self) -> usize {
        self.n_positions * self.n_characters
    }

    /// Check the structural invariants: `n_characters <= n_positions`
    /// and `d_model == 1`. A zero `n_positions` surfaces later as
    /// `InvalidOrder` when the character table is built.
    pub fn validate(&self) -> SheafResult<()> {
        if self.n_characters > self.n_positions {
            return Err(SheafError::InvalidInput(format!(
                "n_characters ({}) exceeds n_positions ({})",
                self.n_characters, self.n_positions
            )));
        }
        if self.d_model != 1 {
            return Err(SheafError::InvalidInput(format!(
                "d_model must be 1, got {}",
                self.d_model
            )));
        }
        Ok(())
    }
}

/// Numerical parameters of the global solve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Diagonal ridge term for the normal equations.
    #[serde(default = "default_ridge_lambda")]
    pub ridge_lambda: f64,
    /// Residual snap tolerance; below it the fit reports convergence.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

fn default_ridge_lambda() -> f64 {
    RIDGE_LAMBDA
}

fn default_tolerance() -> f64 {
    EPSILON
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            ridge_lambda: default_ridge_lambda(),
            tolerance: default_tolerance(),
        }
    }
}

impl SolverOptions {
    /// Load options from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &str) -> SheafResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&contents)?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_config_weight_count() {
        let cfg = PatchConfig::new(3, 2);
        assert_eq!(cfg.n_weights(), 6);
        assert_eq!(cfg.d_model, 1);
    }

    #[test]
    fn test_patch_config_validate_ok() {
        assert!(PatchConfig::new(4, 4).validate().is_ok());
        assert!(PatchConfig::new(4, 0).validate().is_ok());
    }

    #[test]
    fn test_patch_config_too_many_characters() {
        let cfg = PatchConfig::new(2, 3);
        assert!(matches!(
            cfg.validate(),
            Err(SheafError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_patch_config_wide_embedding_rejected() {
        let cfg = PatchConfig {
            n_positions: 4,
            n_characters: 2,
            d_model: 3,
        };
        assert!(matches!(
            cfg.validate(),
            Err(SheafError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_solver_options_defaults() {
        let opts = SolverOptions::default();
        assert!((opts.ridge_lambda - 1e-8).abs() < 1e-20);
        assert!((opts.tolerance - 1e-12).abs() < 1e-24);
    }

    #[test]
    fn test_solver_options_partial_json() {
        let opts: SolverOptions = serde_json::from_str(r#"{"ridge_lambda": 1e-6}"#).unwrap();
        assert!((opts.ridge_lambda - 1e-6).abs() < 1e-18);
        assert!((opts.tolerance - 1e-12).abs() < 1e-24);
    }

    #[test]
    fn test_patch_config_roundtrip_serialization() {
        let cfg = PatchConfig::new(5, 3);
        let json = serde_json::to_string(&cfg).unwrap();
        let cfg2: PatchConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, cfg2);
    }
}
