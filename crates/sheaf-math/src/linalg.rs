// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Complex Linear Algebra
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dense complex linear algebra.
//!
//! SVD via Hermitian Jacobi iteration, a minimum-norm least-squares
//! solve with singular-value cutoff, and a Hermitian Cholesky solve for
//! the ridge-regularized normal equations.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use sheaf_types::error::{SheafError, SheafResult};

/// Conjugate transpose.
pub fn adjoint(a: &Array2<Complex64>) -> Array2<Complex64> {
    let (m, n) = a.dim();
    Array2::from_shape_fn((n, m), |(i, j)| a[[j, i]].conj())
}

/// SVD for small complex matrices via Jacobi rotations on AᴴA.
///
/// Returns (U, sigma, Vh) with A ≈ U · diag(sigma) · Vh and sigma sorted
/// descending. The Gram matrix AᴴA is Hermitian, so each rotation first
/// absorbs the phase of the off-diagonal entry and then applies a real
/// Jacobi rotation. Sufficient for the patch-sized systems here
/// (a handful of positions times a handful of characters).
pub fn svd_complex(a: &Array2<Complex64>) -> (Array2<Complex64>, Array1<f64>, Array2<Complex64>) {
    let (m, n) = a.dim();
    let k = m.min(n);

    // Form AᴴA (Hermitian positive semi-definite)
    let mut ata = Array2::from_elem((n, n), Complex64::new(0.0, 0.0));
    for i in 0..n {
        for j in 0..n {
            let mut sum = Complex64::new(0.0, 0.0);
            for r in 0..m {
                sum += a[[r, i]].conj() * a[[r, j]];
            }
            ata[[i, j]] = sum;
        }
    }

    // Jacobi eigenvalue iteration on AᴴA to get V and sigma^2
    let mut v = Array2::from_shape_fn((n, n), |(i, j)| {
        if i == j {
            Complex64::new(1.0, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    });
    let max_iter = 100;

    for _ in 0..max_iter {
        let mut off_diag = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                off_diag += ata[[i, j]].norm();
            }
        }
        if off_diag < 1e-14 {
            break;
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let mag = ata[[i, j]].norm();
                if mag < 1e-15 {
                    continue;
                }
                // Phase factor making the pivot entry real
                let phase = ata[[i, j]] / mag;
                let ph_conj = phase.conj();

                let tau = (ata[[j, j]].re - ata[[i, i]].re) / (2.0 * mag);
                let t = if tau >= 0.0 {
                    1.0 / (tau + (1.0 + tau * tau).sqrt())
                } else {
                    -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                };
                let cos = 1.0 / (1.0 + t * t).sqrt();
                let sin = t * cos;

                // Column update: ATA ← ATA·G
                for r in 0..n {
                    let ri = ata[[r, i]];
                    let rj = ata[[r, j]];
                    ata[[r, i]] = cos * ri - sin * ph_conj * rj;
                    ata[[r, j]] = sin * ri + cos * ph_conj * rj;
                }
                // Row update: ATA ← Gᴴ·ATA
                for r in 0..n {
                    let ir = ata[[i, r]];
                    let jr = ata[[j, r]];
                    ata[[i, r]] = cos * ir - sin * phase * jr;
                    ata[[j, r]] = sin * ir + cos * phase * jr;
                }
                ata[[i, j]] = Complex64::new(0.0, 0.0);
                ata[[j, i]] = Complex64::new(0.0, 0.0);

                // Accumulate V ← V·G
                for r in 0..n {
                    let vi = v[[r, i]];
                    let vj = v[[r, j]];
                    v[[r, i]] = cos * vi - sin * ph_conj * vj;
                    v[[r, j]] = sin * vi + cos * ph_conj * vj;
                }
            }
        }
    }

    // Extract singular values (sqrt of eigenvalues of AᴴA)
    let mut sigma = Array1::zeros(k);
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| {
        ata[[j, j]]
            .re
            .partial_cmp(&ata[[i, i]].re)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    for (idx, &col) in order.iter().take(k).enumerate() {
        sigma[idx] = ata[[col, col]].re.max(0.0).sqrt();
    }

    // Reorder V columns into Vh rows (conjugated)
    let mut vh = Array2::from_elem((k, n), Complex64::new(0.0, 0.0));
    for (idx, &col) in order.iter().take(k).enumerate() {
        for j in 0..n {
            vh[[idx, j]] = v[[j, col]].conj();
        }
    }

    // Compute U = A · V · diag(1/sigma)
    let mut u = Array2::from_elem((m, k), Complex64::new(0.0, 0.0));
    for idx in 0..k {
        if sigma[idx] > 1e-14 {
            let inv_s = 1.0 / sigma[idx];
            for i in 0..m {
                let mut sum = Complex64::new(0.0, 0.0);
                for j in 0..n {
                    sum += a[[i, j]] * vh[[idx, j]].conj();
                }
                u[[i, idx]] = sum * inv_s;
            }
        }
    }

    (u, sigma, vh)
}

/// Minimum-norm least-squares solution of A·x ≈ b.
///
/// Singular directions below `sv_cutoff` are dropped, so rank-deficient
/// systems get the minimum-norm solution rather than blowing up.
pub fn lstsq_svd(
    a: &Array2<Complex64>,
    b: &Array1<Complex64>,
    sv_cutoff: f64,
) -> SheafResult<Array1<Complex64>> {
    let (m, n) = a.dim();
    if b.len() != m {
        return Err(SheafError::InvalidInput(format!(
            "lstsq shape mismatch: A is {}x{}, b has {} entries",
            m,
            n,
            b.len()
        )));
    }

    let (u, sigma, vh) = svd_complex(a);
    let k = sigma.len();

    let mut x = Array1::from_elem(n, Complex64::new(0.0, 0.0));
    for idx in 0..k {
        if sigma[idx] > sv_cutoff {
            // coefficient along this singular direction: (uᴴ·b) / sigma
            let mut coef = Complex64::new(0.0, 0.0);
            for r in 0..m {
                coef += u[[r, idx]].conj() * b[r];
            }
            coef /= sigma[idx];
            for i in 0..n {
                x[i] += vh[[idx, i]].conj() * coef;
            }
        }
    }

    Ok(x)
}

/// Solve H·x = b for Hermitian positive-definite H via Cholesky (L·Lᴴ).
///
/// Fails with `SingularSystem` when a pivot is non-positive, which the
/// ridge term is supposed to rule out.
pub fn cholesky_solve(
    h: &Array2<Complex64>,
    b: &Array1<Complex64>,
) -> SheafResult<Array1<Complex64>> {
    let (m, n) = h.dim();
    if m != n || b.len() != n {
        return Err(SheafError::InvalidInput(format!(
            "cholesky shape mismatch: H is {}x{}, b has {} entries",
            m,
            n,
            b.len()
        )));
    }
    if n == 0 {
        return Ok(Array1::from_elem(0, Complex64::new(0.0, 0.0)));
    }

    let mut l = Array2::from_elem((n, n), Complex64::new(0.0, 0.0));
    for j in 0..n {
        let mut d = h[[j, j]].re;
        for k in 0..j {
            d -= l[[j, k]].norm_sqr();
        }
        if !d.is_finite() || d <= 0.0 {
            return Err(SheafError::SingularSystem(format!(
                "non-positive pivot {} at column {}",
                d, j
            )));
        }
        l[[j, j]] = Complex64::new(d.sqrt(), 0.0);
        for i in (j + 1)..n {
            let mut sum = h[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]].conj();
            }
            l[[i, j]] = sum / l[[j, j]];
        }
    }

    // Forward substitution: L·y = b
    let mut y = Array1::from_elem(n, Complex64::new(0.0, 0.0));
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // Back substitution: Lᴴ·x = y
    let mut x = Array1::from_elem(n, Complex64::new(0.0, 0.0));
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]].conj() * x[k];
        }
        x[i] = sum / l[[i, i]];
    }

    Ok(x)
}
