// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Property-Based Tests (proptest) for sheaf-math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for sheaf-math using proptest.
//!
//! Covers: character orthogonality, decomposition/reconstruction
//! roundtrip, rotation periodicity, projection linearity, and an FFT
//! cross-check of the decomposition.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use proptest::prelude::*;
use sheaf_math::characters::CyclicGroupCharacters;

fn signal_from(values: &[f64]) -> Array2<Complex64> {
    Array2::from_shape_fn((values.len(), 1), |(i, _)| Complex64::new(values[i], 0.0))
}

// ── Character Table Properties ───────────────────────────────────────

proptest! {
    /// (1/n) Σ_k χ_j(k)·conj(χ_j'(k)) = δ_jj' for every character pair.
    #[test]
    fn characters_are_orthonormal(n in 1usize..16) {
        let group = CyclicGroupCharacters::new(n).unwrap();
        for j1 in 0..n {
            for j2 in 0..n {
                let mut sum = Complex64::new(0.0, 0.0);
                for k in 0..n {
                    sum += group.character(j1, k).unwrap()
                        * group.character(j2, k).unwrap().conj();
                }
                sum /= n as f64;
                let expected = if j1 == j2 { 1.0 } else { 0.0 };
                prop_assert!(
                    (sum - Complex64::new(expected, 0.0)).norm() < 1e-9,
                    "j1={}, j2={}, inner product = {}", j1, j2, sum
                );
            }
        }
    }

    /// Every character value lies on the unit circle.
    #[test]
    fn character_values_unit_modulus(n in 1usize..16) {
        let group = CyclicGroupCharacters::new(n).unwrap();
        for j in 0..n {
            for k in 0..n {
                let chi = group.character(j, k).unwrap();
                prop_assert!((chi.norm() - 1.0).abs() < 1e-12);
            }
        }
    }

    /// rotate(V, k) == rotate(V, k mod rows) for arbitrary shifts.
    #[test]
    fn rotation_is_periodic(
        values in prop::collection::vec(-10.0f64..10.0, 1..12),
        k in 0usize..100,
    ) {
        let n = values.len();
        let group = CyclicGroupCharacters::new(n).unwrap();
        let v = signal_from(&values);

        let full = group.rotate(&v, k);
        let reduced = group.rotate(&v, k % n);
        for i in 0..n {
            prop_assert!((full[[i, 0]] - reduced[[i, 0]]).norm() < 1e-12);
        }
    }

    /// Rotating by the full period is the identity.
    #[test]
    fn rotation_full_period_identity(
        values in prop::collection::vec(-10.0f64..10.0, 1..12),
    ) {
        let n = values.len();
        let group = CyclicGroupCharacters::new(n).unwrap();
        let v = signal_from(&values);
        let rotated = group.rotate(&v, n);
        for i in 0..n {
            prop_assert!((rotated[[i, 0]] - v[[i, 0]]).norm() < 1e-12);
        }
    }

    /// Decomposition followed by all-ones reconstruction reproduces the
    /// signal exactly (completeness of the character basis).
    #[test]
    fn decompose_reconstruct_roundtrip(
        values in prop::collection::vec(-10.0f64..10.0, 1..12),
    ) {
        let n = values.len();
        let group = CyclicGroupCharacters::new(n).unwrap();
        let v = signal_from(&values);

        let projs = group.decompose_into_characters(&v);
        prop_assert_eq!(projs.len(), n);

        let ones = Array1::from_elem(n, Complex64::new(1.0, 0.0));
        let rec = group.reconstruct_from_characters(&ones, &projs).unwrap();
        for i in 0..n {
            prop_assert!(
                (rec[[i, 0]] - v[[i, 0]]).norm() < 1e-9,
                "roundtrip mismatch at row {}: {} vs {}", i, rec[[i, 0]], v[[i, 0]]
            );
        }
    }

    /// Signals shorter than the group order decompose into one
    /// projection per row, and reconstruction keeps the signal shape.
    /// The truncated sums do not telescope, so exact recovery is only
    /// guaranteed at full length (see decompose_reconstruct_roundtrip).
    #[test]
    fn short_signal_shapes(
        n in 2usize..12,
        seed in -5.0f64..5.0,
    ) {
        let len = n - 1;
        let values: Vec<f64> = (0..len).map(|i| seed + i as f64).collect();
        let group = CyclicGroupCharacters::new(n).unwrap();
        let v = signal_from(&values);

        let projs = group.decompose_into_characters(&v);
        prop_assert_eq!(projs.len(), len);
        for proj in &projs {
            prop_assert_eq!(proj.dim(), (len, 1));
        }

        let ones = Array1::from_elem(len, Complex64::new(1.0, 0.0));
        let rec = group.reconstruct_from_characters(&ones, &projs).unwrap();
        prop_assert_eq!(rec.dim(), (len, 1));
    }

    /// Projection is linear: proj(a·V + b·W) = a·proj(V) + b·proj(W).
    #[test]
    fn projection_is_linear(
        values_v in prop::collection::vec(-5.0f64..5.0, 4),
        values_w in prop::collection::vec(-5.0f64..5.0, 4),
        a in -3.0f64..3.0,
        b in -3.0f64..3.0,
    ) {
        let group = CyclicGroupCharacters::new(4).unwrap();
        let v = signal_from(&values_v);
        let w = signal_from(&values_w);
        let combined = Array2::from_shape_fn((4, 1), |(i, _)| {
            a * v[[i, 0]] + b * w[[i, 0]]
        });

        for j in 0..4 {
            let pc = group.project_onto_character(&combined, j).unwrap();
            let pv = group.project_onto_character(&v, j).unwrap();
            let pw = group.project_onto_character(&w, j).unwrap();
            for i in 0..4 {
                let expected = a * pv[[i, 0]] + b * pw[[i, 0]];
                prop_assert!((pc[[i, 0]] - expected).norm() < 1e-9);
            }
        }
    }
}

// ── FFT Cross-Check ──────────────────────────────────────────────────

/// For a full-length signal, the first row of projection j equals the
/// (n−j) mod n bin of the forward FFT divided by n.
#[test]
fn decomposition_matches_fft() {
    let values = [1.0, -2.5, 3.0, 0.5, -1.0, 2.0];
    let n = values.len();
    let group = CyclicGroupCharacters::new(n).unwrap();
    let v = signal_from(&values);

    let mut planner = rustfft::FftPlanner::new();
    let fft = planner.plan_fft_forward(n);
    let mut spectrum: Vec<Complex64> = values.iter().map(|&x| Complex64::new(x, 0.0)).collect();
    fft.process(&mut spectrum);

    let projs = group.decompose_into_characters(&v);
    for (j, proj) in projs.iter().enumerate() {
        let bin = (n - j) % n;
        let expected = spectrum[bin] / n as f64;
        assert!(
            (proj[[0, 0]] - expected).norm() < 1e-10,
            "projection {j} row 0 = {}, FFT bin {bin}/n = {expected}",
            proj[[0, 0]]
        );
    }
}
