// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Cyclic Group Characters
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Character theory of the finite cyclic group Z/nZ.
//!
//! The n one-dimensional irreducible characters χ_j(k) = ω^(j·k) with
//! ω = exp(2πi/n) form a discrete-Fourier-style basis. Projection onto
//! a character extracts one basis component of a signal; decomposition
//! and reconstruction are lossless together by orthogonality:
//!   (1/n) Σ_k χ_j(k)·conj(χ_j'(k)) = δ_jj'

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use sheaf_types::constants::SV_CUTOFF;
use sheaf_types::error::{SheafError, SheafResult};

use crate::linalg::lstsq_svd;

/// Character table of the cyclic group of order n.
///
/// Immutable once constructed; the n×n table is computed eagerly.
#[derive(Debug, Clone)]
pub struct CyclicGroupCharacters {
    n: usize,
    omega: Complex64,
    table: Array2<Complex64>,
}

impl CyclicGroupCharacters {
    /// Build the character table for group order `n`.
    pub fn new(n: usize) -> SheafResult<Self> {
        if n == 0 {
            return Err(SheafError::InvalidOrder);
        }
        let base_angle = 2.0 * std::f64::consts::PI / n as f64;
        let omega = Complex64::from_polar(1.0, base_angle);
        // table[j, k] = ω^(j·k), evaluated by angle to avoid pow drift
        let table = Array2::from_shape_fn((n, n), |(j, k)| {
            Complex64::from_polar(1.0, base_angle * (j * k) as f64)
        });
        Ok(CyclicGroupCharacters { n, omega, table })
    }

    /// Group order.
    pub fn order(&self) -> usize {
        self.n
    }

    /// Primitive n-th root of unity ω = exp(2πi/n).
    pub fn omega(&self) -> Complex64 {
        self.omega
    }

    /// Character value χ_j(k).
    pub fn character(&self, j: usize, k: usize) -> SheafResult<Complex64> {
        if j >= self.n {
            return Err(SheafError::IndexOutOfRange {
                index: j,
                order: self.n,
            });
        }
        if k >= self.n {
            return Err(SheafError::IndexOutOfRange {
                index: k,
                order: self.n,
            });
        }
        Ok(self.table[[j, k]])
    }

    /// Cyclic shift of the rows of V by k (taken mod the row count).
    /// Row i of the result is row (i − k) mod rows of V; k = 0 is the
    /// identity.
    pub fn rotate(&self, v: &Array2<Complex64>, k: usize) -> Array2<Complex64> {
        let rows = v.nrows();
        if rows == 0 {
            return v.clone();
        }
        let k = k % rows;
        if k == 0 {
            return v.clone();
        }

        let cols = v.ncols();
        let mut result = Array2::from_elem((rows, cols), Complex64::new(0.0, 0.0));
        for i in 0..rows {
            let src_row = (i + rows - k) % rows;
            for c in 0..cols {
                result[[i, c]] = v[[src_row, c]];
            }
        }
        result
    }

    /// Project a signal onto character j:
    ///   Proj = (1/m) Σ_{k<m} conj(χ_j(k))·rotate(V, k),  m = min(rows, n)
    ///
    /// Normalization is by the number of summed terms, not by n, so
    /// signals shorter than the group order still project sensibly.
    pub fn project_onto_character(
        &self,
        v: &Array2<Complex64>,
        j: usize,
    ) -> SheafResult<Array2<Complex64>> {
        if j >= self.n {
            return Err(SheafError::IndexOutOfRange {
                index: j,
                order: self.n,
            });
        }

        Ok(self.project_unchecked(v, j))
    }

    /// Projection sum for a validated character index.
    fn project_unchecked(&self, v: &Array2<Complex64>, j: usize) -> Array2<Complex64> {
        let seq_len = v.nrows();
        let d_model = v.ncols();
        let m = seq_len.min(self.n);

        let mut proj = Array2::from_elem((seq_len, d_model), Complex64::new(0.0, 0.0));
        if m == 0 {
            return proj;
        }

        for k in 0..m {
            let weight = self.table[[j, k]].conj();
            let rotated = self.rotate(v, k);
            for i in 0..seq_len {
                for c in 0..d_model {
                    proj[[i, c]] += weight * rotated[[i, c]];
                }
            }
        }

        let norm = 1.0 / m as f64;
        proj.mapv_inplace(|x| x * norm);
        proj
    }

    /// All character projections of a signal, for j = 0 .. min(rows, n).
    pub fn decompose_into_characters(&self, v: &Array2<Complex64>) -> Vec<Array2<Complex64>> {
        let m = v.nrows().min(self.n);
        (0..m).map(|j| self.project_unchecked(v, j)).collect()
    }

    /// Weighted recombination Σ_j coefficients[j]·projections[j], over
    /// the shorter of the two lengths.
    pub fn reconstruct_from_characters(
        &self,
        coefficients: &Array1<Complex64>,
        projections: &[Array2<Complex64>],
    ) -> SheafResult<Array2<Complex64>> {
        let Some(first) = projections.first() else {
            return Err(SheafError::EmptyInput(
                "reconstruction requires at least one projection".to_string(),
            ));
        };

        let mut result = Array2::from_elem(first.dim(), Complex64::new(0.0, 0.0));
        for (j, proj) in projections.iter().enumerate().take(coefficients.len()) {
            let coef = coefficients[j];
            for ((i, c), &val) in proj.indexed_iter() {
                result[[i, c]] += coef * val;
            }
        }
        Ok(result)
    }

    /// Fit one coefficient per character so that the recombined
    /// projections approximate the targets in the least-squares sense.
    ///
    /// Each sample's decomposition is flattened into a design-matrix
    /// column block (one row per scalar output element, one column per
    /// character) and the system is solved through the SVD
    /// pseudoinverse.
    pub fn learn_character_weights(
        &self,
        v_samples: &[Array2<Complex64>],
        targets: &[Array2<Complex64>],
    ) -> SheafResult<Array1<Complex64>> {
        if v_samples.is_empty() || v_samples.len() != targets.len() {
            return Err(SheafError::InvalidInput(format!(
                "samples ({}) and targets ({}) must be non-empty and paired",
                v_samples.len(),
                targets.len()
            )));
        }

        let n_samples = v_samples.len();
        let shape = v_samples[0].dim();
        let d = shape.0 * shape.1;

        for (i, (sample, target)) in v_samples.iter().zip(targets.iter()).enumerate() {
            if sample.dim() != shape {
                return Err(SheafError::InvalidInput(format!(
                    "sample {} has shape {:?}, expected {:?}",
                    i,
                    sample.dim(),
                    shape
                )));
            }
            if target.len() != d {
                return Err(SheafError::InvalidInput(format!(
                    "target {} has {} elements, expected {}",
                    i,
                    target.len(),
                    d
                )));
            }
        }

        // Build A·c = b with one column per character. Characters beyond
        // the decomposition length have no component in the data and
        // keep zero columns; the cutoff in the solve leaves their
        // coefficients at zero.
        let mut a = Array2::from_elem((n_samples * d, self.n), Complex64::new(0.0, 0.0));
        let mut b = Array1::from_elem(n_samples * d, Complex64::new(0.0, 0.0));

        for (i, (sample, target)) in v_samples.iter().zip(targets.iter()).enumerate() {
            let projs = self.decompose_into_characters(sample);
            for (j, proj) in projs.iter().enumerate() {
                for (k, &val) in proj.iter().enumerate() {
                    a[[i * d + k, j]] = val;
                }
            }
            for (k, &val) in target.iter().enumerate() {
                b[i * d + k] = val;
            }
        }

        lstsq_svd(&a, &b, SV_CUTOFF)
    }
}
