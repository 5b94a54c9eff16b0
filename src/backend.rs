use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::weighted::WeightedAliasIndex;

use crate::circuit::Circuit;
use crate::gates::{h_matrix, sdg_matrix};
use crate::observable::{Observable, Pauli, PauliTerm};
use crate::qstate::QState;

/// Execution target for expectation-value estimation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Exact expectation from the full statevector.
    Statevector,
    /// Statistical estimate from `shots` simulated measurements per
    /// Pauli term.
    Sampling { shots: u64 },
}

/// Evaluates `<psi|H|psi>` against a backend, counting evaluations.
/// A fixed seed makes the sampling backend bit-reproducible.
pub struct Estimator {
    backend: Backend,
    rng: Mutex<StdRng>,
    evaluations: AtomicUsize,
}

impl Estimator {
    pub fn new(backend: Backend, seed: u64) -> Self {
        Self {
            backend,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            evaluations: AtomicUsize::new(0),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Number of expectation evaluations performed so far.
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::Relaxed)
    }

    pub fn expectation(&self, observable: &Observable, state: &QState) -> Result<f64> {
        self.evaluations.fetch_add(1, Ordering::Relaxed);

        match self.backend {
            Backend::Statevector => observable.expectation_value(state),
            Backend::Sampling { shots } => {
                if shots == 0 {
                    return Err(anyhow::anyhow!("Sampling backend needs at least one shot"));
                }
                self.sampled_expectation(observable, state, shots)
            }
        }
    }

    fn sampled_expectation(
        &self,
        observable: &Observable,
        state: &QState,
        shots: u64,
    ) -> Result<f64> {
        if state.num_of_qbits() != observable.num_of_qbits() {
            return Err(anyhow::anyhow!(
                "State has {} qubits but the observable has {}",
                state.num_of_qbits(),
                observable.num_of_qbits()
            ));
        }

        let mut rng = self
            .rng
            .lock()
            .map_err(|_| anyhow::anyhow!("Estimator RNG lock poisoned"))?;

        let mut expectation = 0.0;
        for term in observable.terms() {
            expectation += estimate_term(term, state, shots, &mut rng)?;
        }

        Ok(expectation)
    }
}

/// Estimate one term: rotate the measured qubits into the Z basis, sample
/// bitstrings from the Born distribution and average the measured parity.
fn estimate_term(term: &PauliTerm, state: &QState, shots: u64, rng: &mut StdRng) -> Result<f64> {
    let mut mask = 0_usize;
    let mut rotation = Circuit::new(state.num_of_qbits());

    for op in &term.ops {
        match op.kind {
            Pauli::I => continue,
            Pauli::X => rotation.add_gate_at(op.qbit_index, h_matrix())?,
            Pauli::Y => {
                rotation.add_gate_at(op.qbit_index, sdg_matrix())?;
                rotation.add_gate_at(op.qbit_index, h_matrix())?;
            }
            Pauli::Z => {}
        }
        mask |= 1 << op.qbit_index;
    }

    // Identity term, nothing to measure.
    if mask == 0 {
        return Ok(term.coefficient);
    }

    let rotated = rotation.apply(state)?;
    let distribution = WeightedAliasIndex::new(rotated.probabilities())?;

    let mut parity_sum = 0_i64;
    for _ in 0..shots {
        let outcome = rng.sample(&distribution);
        if (outcome & mask).count_ones() % 2 == 0 {
            parity_sum += 1;
        } else {
            parity_sum -= 1;
        }
    }

    Ok(term.coefficient * parity_sum as f64 / shots as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq;
    use crate::Circuit;

    fn z_observable() -> Observable {
        let mut observable = Observable::new(1);
        observable.add_pauli_term(1.0, &[(Pauli::Z, 0)]).unwrap();
        observable
    }

    #[test]
    fn test_statevector_matches_exact() -> Result<()> {
        let estimator = Estimator::new(Backend::Statevector, 0);
        let q0 = QState::from_str("0").unwrap();

        assert_approx_eq!(1.0, estimator.expectation(&z_observable(), &q0)?);
        assert_eq!(estimator.evaluations(), 1);

        Ok(())
    }

    #[test]
    fn test_sampling_on_eigenstate_is_exact() -> Result<()> {
        // |1> is a Z eigenstate, so every shot reports -1 regardless of
        // the random sequence.
        let estimator = Estimator::new(Backend::Sampling { shots: 128 }, 7);
        let q1 = QState::from_str("1").unwrap();

        assert_approx_eq!(-1.0, estimator.expectation(&z_observable(), &q1)?);

        Ok(())
    }

    #[test]
    fn test_sampling_x_basis_rotation() -> Result<()> {
        // H|0> is an X eigenstate with eigenvalue +1.
        let mut observable = Observable::new(1);
        observable.add_pauli_term(1.0, &[(Pauli::X, 0)])?;

        let plus = Circuit::new(1).H(0)?.apply(&QState::from_str("0")?)?;
        let estimator = Estimator::new(Backend::Sampling { shots: 64 }, 3);

        assert_approx_eq!(1.0, estimator.expectation(&observable, &plus)?);

        Ok(())
    }

    #[test]
    fn test_sampling_is_reproducible() -> Result<()> {
        let mut observable = Observable::new(1);
        observable.add_pauli_term(1.0, &[(Pauli::Z, 0)])?;

        let superposition = Circuit::new(1).H(0)?.apply(&QState::from_str("0")?)?;

        let first = Estimator::new(Backend::Sampling { shots: 200 }, 42)
            .expectation(&observable, &superposition)?;
        let second = Estimator::new(Backend::Sampling { shots: 200 }, 42)
            .expectation(&observable, &superposition)?;

        assert_eq!(first, second);

        Ok(())
    }

    #[test]
    fn test_sampling_rejects_zero_shots() {
        let estimator = Estimator::new(Backend::Sampling { shots: 0 }, 0);
        let q0 = QState::from_str("0").unwrap();

        assert!(estimator.expectation(&z_observable(), &q0).is_err());
    }

    #[test]
    fn test_identity_term_needs_no_shots() -> Result<()> {
        let mut observable = Observable::new(1);
        observable.add_pauli_term(-2.5, &[])?;

        let estimator = Estimator::new(Backend::Sampling { shots: 8 }, 0);
        let q0 = QState::from_str("0").unwrap();

        assert_approx_eq!(-2.5, estimator.expectation(&observable, &q0)?);

        Ok(())
    }
}
