//! Plots the energy history of a shot-sampled VQE run.

use anyhow::Result;
use plotters::prelude::*;
use simple_vqe::{Ansatz, Backend, Observable, Optimizer, Pauli, Vqe};

fn plot_history(history: &[f64], file_name: &str) -> Result<()> {
    let root = BitMapBackend::new(file_name, (640, 480)).into_drawing_area();

    let y_min = history
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    let y_max = history
        .iter()
        .cloned()
        .fold(f64::NEG_INFINITY, f64::max);

    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0.0..history.len() as f64, y_min..y_max)?;

    chart.configure_mesh().draw()?;

    chart.draw_series(LineSeries::new(
        history.iter().enumerate().map(|(i, &e)| (i as f64, e)),
        &RED,
    ))?;

    root.present()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut observable = Observable::new(2);
    observable.add_pauli_term(0.5, &[(Pauli::Z, 0)])?;
    observable.add_pauli_term(0.5, &[(Pauli::Z, 1)])?;
    observable.add_pauli_term(0.25, &[(Pauli::X, 0), (Pauli::X, 1)])?;

    let ansatz = Ansatz::efficient_su2(2, 1)?;
    let vqe = Vqe::new(ansatz)
        .with_backend(Backend::Sampling { shots: 1024 })
        .with_optimizer(Optimizer::NelderMead {
            max_iters: 300,
            sd_tolerance: 1e-6,
        })
        .with_seed(7);

    let result = vqe.compute_minimum_eigenvalue(&observable)?;
    println!("{}", result);

    plot_history(&result.energy_history, "convergence.png")?;
    println!("Energy history saved to 'convergence.png'.");

    Ok(())
}
