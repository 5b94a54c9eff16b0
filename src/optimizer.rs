use core::f64;

use std::collections::VecDeque;

use anyhow::Result;
use nalgebra::DVector;

/// Classical black-box minimizer configuration. Both options terminate
/// within their iteration budget whether or not they converge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Optimizer {
    /// Nelder-Mead simplex search, run through the argmin executor.
    NelderMead { max_iters: u64, sd_tolerance: f64 },
    /// Powell's method with a coordinate-direction line search.
    Powell { max_iters: u64, tolerance: f64 },
}

impl Default for Optimizer {
    fn default() -> Self {
        Self::NelderMead {
            max_iters: 200,
            sd_tolerance: 1e-8,
        }
    }
}

/// Minimize `cost` from `initial` by Powell's method: line-search along each
/// direction in turn, then replace the direction of largest displacement
/// with the net step of the sweep.
pub fn powell_minimize<F>(
    cost: F,
    initial: DVector<f64>,
    max_iters: u64,
    tolerance: f64,
) -> Result<(DVector<f64>, f64, u64)>
where
    F: Fn(&DVector<f64>) -> Result<f64>,
{
    let dim = initial.len();
    if dim == 0 {
        return Err(anyhow::anyhow!("Cannot minimize over zero parameters"));
    }

    let mut search_vecs = VecDeque::with_capacity(dim);
    for i in 0..dim {
        let mut vec = DVector::zeros(dim);
        vec[i] = 1.0;
        search_vecs.push_back(vec);
    }

    let mut phi0 = initial;
    let mut phi = phi0.clone();
    let mut prev_cost = cost(&phi)?;
    let mut iterations = 0;

    for _ in 0..max_iters {
        iterations += 1;

        let mut displacements = Vec::with_capacity(search_vecs.len());
        for search_vec in &search_vecs {
            let norm = search_vec.norm();
            if norm < 1e-10 {
                displacements.push(0.0);
                continue;
            }

            // Unit direction keeps the line-search sweep bounded no matter
            // how small the stored vector has become.
            let direction = search_vec / norm;

            let delta = f64::consts::PI / 1000.0;
            let (best_alpha_pos, min_cost_pos) = find_min_alpha(&phi, &direction, delta, &cost)?;
            let (best_alpha_neg, min_cost_neg) = find_min_alpha(&phi, &direction, -delta, &cost)?;

            let best_alpha = if min_cost_pos < min_cost_neg {
                best_alpha_pos
            } else {
                best_alpha_neg
            };

            phi += best_alpha * &direction;
            displacements.push(best_alpha.abs());
        }

        let max_idx = displacements
            .iter()
            .enumerate()
            .max_by(|(_, x), (_, y)| x.total_cmp(y))
            .map(|(idx, _)| idx)
            .ok_or_else(|| anyhow::anyhow!("No search direction available"))?;
        search_vecs.remove(max_idx);
        search_vecs.push_back(&phi - &phi0);

        let sum_norm: f64 = search_vecs.iter().map(|sv| sv.norm()).sum();
        if sum_norm < 1e-10 {
            break;
        }

        phi0 = phi.clone();

        let current_cost = cost(&phi)?;
        if (prev_cost - current_cost).abs() < tolerance {
            break;
        }
        prev_cost = current_cost;
    }

    let final_cost = cost(&phi)?;
    Ok((phi, final_cost, iterations))
}

/// Scan `alpha` in steps of `delta` along the unit-length `direction`
/// until a full period has been swept, keeping the best point seen.
fn find_min_alpha<F>(
    phi: &DVector<f64>,
    direction: &DVector<f64>,
    delta: f64,
    cost: &F,
) -> Result<(f64, f64)>
where
    F: Fn(&DVector<f64>) -> Result<f64>,
{
    let mut min_cost = cost(phi)?;
    let mut best_alpha = 0.0;

    let mut curr_alpha = 0.0_f64;

    while curr_alpha.abs() < f64::consts::TAU {
        curr_alpha += delta;

        let new_phi = curr_alpha * direction + phi;
        let new_cost = cost(&new_phi)?;

        if new_cost < min_cost {
            min_cost = new_cost;
            best_alpha = curr_alpha;
        }
    }

    Ok((best_alpha, min_cost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_find_min_alpha() -> Result<()> {
        let phi = DVector::from_row_slice(&[1.0, 0.0, 0.0]);
        let search_vec = DVector::from_row_slice(&[1.0, 0.0, 0.0]);
        let delta = -0.01;

        let cost = |x: &DVector<f64>| Ok(x[0] * x[0]);
        let (best_alpha, min_cost) = find_min_alpha(&phi, &search_vec, delta, &cost)?;

        assert_approx_eq!(-1.0, best_alpha);
        assert_approx_eq!(0.0, min_cost);

        Ok(())
    }

    #[test]
    fn test_powell_minimizes_quadratic() -> Result<()> {
        // Minimum at (1, -2), inside the line-search sweep range.
        let cost = |x: &DVector<f64>| Ok((x[0] - 1.0).powi(2) + (x[1] + 2.0).powi(2));

        let initial = DVector::from_row_slice(&[0.0, 0.0]);
        let (best, value, iterations) = powell_minimize(cost, initial, 20, 1e-10)?;

        assert!(iterations <= 20);
        assert!(value < 1e-3, "final cost {} too large", value);
        assert!((best[0] - 1.0).abs() < 0.05);
        assert!((best[1] + 2.0).abs() < 0.05);

        Ok(())
    }

    #[test]
    fn test_powell_line_search_work_is_bounded() -> Result<()> {
        use std::cell::Cell;

        // Later sweeps run along net-step directions of shrinking norm;
        // each line search must still cost at most one period of steps.
        let evaluations = Cell::new(0_usize);
        let cost = |x: &DVector<f64>| {
            evaluations.set(evaluations.get() + 1);
            Ok((x[0] - 0.5).powi(2) + (x[1] + 0.25).powi(2))
        };

        let initial = DVector::from_row_slice(&[0.0, 0.0]);
        let (_, value, _) = powell_minimize(cost, initial, 4, 1e-12)?;

        assert!(value < 1e-3);
        // 4 sweeps x 2 directions x two signed scans of at most
        // TAU / (PI / 1000) steps each, plus bookkeeping evaluations.
        assert!(
            evaluations.get() < 100_000,
            "line search ran {} evaluations",
            evaluations.get()
        );

        Ok(())
    }

    #[test]
    fn test_powell_rejects_empty_parameters() {
        let cost = |_: &DVector<f64>| Ok(0.0);
        assert!(powell_minimize(cost, DVector::zeros(0), 10, 1e-8).is_err());
    }
}
