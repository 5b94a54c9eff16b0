use std::fmt::Display;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use argmin::core::{CostFunction, Executor, State};
use argmin::solver::neldermead::NelderMead;
use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ansatz::Ansatz;
use crate::backend::{Backend, Estimator};
use crate::observable::Observable;
use crate::optimizer::{powell_minimize, Optimizer};
use crate::qstate::QState;

/// Minimum-eigenvalue search: couples a parameterized ansatz, an
/// expectation estimator and a classical optimizer. The backend must be
/// configured before calling [`Vqe::compute_minimum_eigenvalue`].
///
/// The seed drives both the initial parameter draw and the sampling
/// backend, so runs with identical configuration produce identical
/// results.
pub struct Vqe {
    ansatz: Ansatz,
    optimizer: Optimizer,
    backend: Option<Backend>,
    seed: u64,
}

impl Vqe {
    pub fn new(ansatz: Ansatz) -> Self {
        Self {
            ansatz,
            optimizer: Optimizer::default(),
            backend: None,
            seed: 0,
        }
    }

    pub fn with_optimizer(mut self, optimizer: Optimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn compute_minimum_eigenvalue(&self, observable: &Observable) -> Result<VqeResult> {
        let backend = self.backend.ok_or_else(|| {
            anyhow::anyhow!("No expectation backend configured; call with_backend first")
        })?;

        if observable.num_of_qbits() != self.ansatz.num_of_qbits() {
            return Err(anyhow::anyhow!(
                "Observable acts on {} qubits but the ansatz prepares {}",
                observable.num_of_qbits(),
                self.ansatz.num_of_qbits()
            ));
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let estimator = Arc::new(Estimator::new(backend, self.seed.wrapping_add(1)));
        let history = Arc::new(Mutex::new(Vec::new()));

        let landscape = EnergyLandscape {
            ansatz: self.ansatz.clone(),
            observable: observable.clone(),
            estimator: Arc::clone(&estimator),
            history: Arc::clone(&history),
        };

        let num_params = self.ansatz.num_of_parameters();
        let (optimal_parameters, optimal_value, iterations) = match self.optimizer {
            Optimizer::NelderMead {
                max_iters,
                sd_tolerance,
            } => {
                let simplex = (0..num_params + 1)
                    .map(|_| {
                        (0..num_params)
                            .map(|_| rng.random_range(0.0..std::f64::consts::TAU))
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>();
                let solver: NelderMead<Vec<f64>, f64> =
                    NelderMead::new(simplex).with_sd_tolerance(sd_tolerance)?;

                let res = Executor::new(landscape, solver)
                    .configure(|state| state.max_iters(max_iters))
                    .run()?;

                let best = res
                    .state
                    .get_best_param()
                    .ok_or_else(|| anyhow::anyhow!("Optimizer returned no best parameter"))?
                    .clone();
                let value = res.state.get_best_cost();
                let iterations = res.state.get_iter();

                (best, value, iterations)
            }
            Optimizer::Powell {
                max_iters,
                tolerance,
            } => {
                let initial = DVector::from_iterator(
                    num_params,
                    (0..num_params).map(|_| rng.random_range(0.0..std::f64::consts::TAU)),
                );

                let (best, value, iterations) = powell_minimize(
                    |phi| landscape.evaluate(phi.as_slice()),
                    initial,
                    max_iters,
                    tolerance,
                )?;

                (best.as_slice().to_vec(), value, iterations)
            }
        };

        let eigenstate = self.ansatz.prepare(&optimal_parameters)?;
        let evaluations = estimator.evaluations();
        let energy_history = history
            .lock()
            .map_err(|_| anyhow::anyhow!("Energy history lock poisoned"))?
            .clone();

        Ok(VqeResult {
            optimal_parameters,
            optimal_value,
            eigenstate,
            iterations,
            evaluations,
            energy_history,
        })
    }
}

/// The objective the optimizer sees: parameters in, estimated energy out.
struct EnergyLandscape {
    ansatz: Ansatz,
    observable: Observable,
    estimator: Arc<Estimator>,
    history: Arc<Mutex<Vec<f64>>>,
}

impl EnergyLandscape {
    fn evaluate(&self, parameters: &[f64]) -> Result<f64> {
        let state = self.ansatz.prepare(parameters)?;
        let energy = self.estimator.expectation(&self.observable, &state)?;

        self.history
            .lock()
            .map_err(|_| anyhow::anyhow!("Energy history lock poisoned"))?
            .push(energy);

        Ok(energy)
    }
}

impl CostFunction for EnergyLandscape {
    type Param = Vec<f64>;
    type Output = f64;

    fn cost(&self, parameters: &Self::Param) -> Result<Self::Output> {
        self.evaluate(parameters)
    }
}

/// Immutable snapshot of one optimization run.
pub struct VqeResult {
    pub optimal_parameters: Vec<f64>,
    pub optimal_value: f64,
    pub eigenstate: QState,
    pub iterations: u64,
    pub evaluations: usize,
    pub energy_history: Vec<f64>,
}

impl Display for VqeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Minimum eigenvalue: {}", self.optimal_value)?;
        writeln!(f, "Optimal parameters: {:?}", self.optimal_parameters)?;
        writeln!(
            f,
            "Iterations: {}, evaluations: {}",
            self.iterations, self.evaluations
        )
    }
}
