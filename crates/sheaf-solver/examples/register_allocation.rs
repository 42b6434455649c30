// ─────────────────────────────────────────────────────────────────────
// SCPN Sheaf Solver — Register Allocation Demo
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Two-patch register-allocation demo.
//!
//! Two code regions share one variable; the gluing constraint forces
//! both regions to assign it the same register preference. Run with
//! `RUST_LOG=debug` to see the assembly trace.

use ndarray::Array2;
use num_complex::Complex64;
use sheaf_solver::UnifiedSheafSolver;
use sheaf_types::config::PatchConfig;
use sheaf_types::error::SheafResult;
use sheaf_types::state::{GluingConstraint, Patch, SheafProblem};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn one_hot(len: usize, idx: usize, value: f64) -> Array2<Complex64> {
    Array2::from_shape_fn((len, 1), |(i, _)| {
        if i == idx {
            Complex64::new(value, 0.0)
        } else {
            Complex64::new(0.0, 0.0)
        }
    })
}

fn target(value: f64) -> Array2<Complex64> {
    Array2::from_elem((1, 1), Complex64::new(value, 0.0))
}

/// The canonical demo problem: block_a holds variables x, y, z with
/// register preferences 1, 2, 3; block_b holds y, w with preferences
/// 2, 1. The shared variable y must agree across blocks.
fn demo_problem() -> SheafProblem {
    let mut block_a = Patch::new("block_a", PatchConfig::new(3, 2));
    block_a.push_sample(one_hot(3, 0, 1.0), target(1.0)); // x → r1
    block_a.push_sample(one_hot(3, 1, 2.0), target(2.0)); // y → r2
    block_a.push_sample(one_hot(3, 2, 3.0), target(3.0)); // z → r3

    let mut block_b = Patch::new("block_b", PatchConfig::new(2, 2));
    block_b.push_sample(one_hot(2, 0, 2.0), target(2.0)); // y → r2
    block_b.push_sample(one_hot(2, 1, 4.0), target(1.0)); // w → r1

    let mut problem = SheafProblem::new();
    problem.add_patch(block_a);
    problem.add_patch(block_b);
    problem.add_gluing(GluingConstraint::new(
        "block_a",
        "block_b",
        one_hot(3, 1, 2.0),
        one_hot(2, 0, 2.0),
    ));
    problem
}

fn main() -> SheafResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let problem = demo_problem();
    println!("Register allocation across 2 basic blocks, 1 shared variable");
    println!(
        "  patches: {}, gluing constraints: {}",
        problem.n_patches(),
        problem.n_gluings()
    );

    let mut solver = UnifiedSheafSolver::new();
    let solution = solver.fit(&problem)?;

    println!("  obstruction: {:.3}", solution.residual_error);
    println!(
        "  converged: {}",
        if solution.converged { "yes" } else { "no" }
    );

    let shared = solver.predict("block_a", &one_hot(3, 1, 2.0))?;
    println!("  shared variable prediction: {:.3}", shared.re);

    Ok(())
}
