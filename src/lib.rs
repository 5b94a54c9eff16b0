pub mod ansatz;
pub mod backend;
pub mod circuit;
pub mod gates;
pub mod observable;
pub mod optimizer;
pub mod qstate;
pub mod vqe;

mod test_util;

use num_complex::Complex;

pub type Qbit = Complex<f64>;

pub use ansatz::{Ansatz, Entanglement, Rotation};
pub use backend::{Backend, Estimator};
pub use circuit::Circuit;
pub use observable::{Observable, Pauli};
pub use optimizer::Optimizer;
pub use qstate::QState;
pub use vqe::{Vqe, VqeResult};
