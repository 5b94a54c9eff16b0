use anyhow::Result;
use nalgebra_sparse::CsrMatrix;

use crate::circuit::kronecker_product;
use crate::gates::{x_matrix, y_matrix, z_matrix};
use crate::qstate::QState;
use crate::Qbit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

#[derive(Clone, Debug)]
pub struct PauliOp {
    pub qbit_index: usize,
    pub kind: Pauli,
}

#[derive(Clone, Debug)]
pub struct PauliTerm {
    pub coefficient: f64,
    pub ops: Vec<PauliOp>,
}

/// Weighted sum of Pauli tensor-product terms over a fixed qubit count.
/// An empty op list is the identity term: it contributes its coefficient
/// to every expectation value.
#[derive(Clone, Debug)]
pub struct Observable {
    num_of_qbits: usize,
    terms: Vec<PauliTerm>,
}

impl Observable {
    pub fn new(num_of_qbits: usize) -> Self {
        Self {
            num_of_qbits,
            terms: Vec::new(),
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        self.num_of_qbits
    }

    pub fn terms(&self) -> &[PauliTerm] {
        &self.terms
    }

    pub fn add_pauli_term(&mut self, coefficient: f64, ops: &[(Pauli, usize)]) -> Result<()> {
        let mut seen = vec![false; self.num_of_qbits];
        for &(_, index) in ops {
            if index >= self.num_of_qbits {
                return Err(anyhow::anyhow!(
                    "Pauli term acts on qubit {} but the observable has {} qubits",
                    index,
                    self.num_of_qbits
                ));
            }
            if seen[index] {
                return Err(anyhow::anyhow!(
                    "Pauli term acts on qubit {} more than once",
                    index
                ));
            }
            seen[index] = true;
        }

        self.terms.push(PauliTerm {
            coefficient,
            ops: ops
                .iter()
                .map(|&(kind, qbit_index)| PauliOp { qbit_index, kind })
                .collect(),
        });

        Ok(())
    }

    /// Exact `<psi|H|psi>`. The imaginary part vanishes because every
    /// Pauli term is Hermitian and coefficients are real.
    pub fn expectation_value(&self, qstate: &QState) -> Result<f64> {
        if qstate.num_of_qbits() != self.num_of_qbits {
            return Err(anyhow::anyhow!(
                "State has {} qubits but the observable has {}",
                qstate.num_of_qbits(),
                self.num_of_qbits
            ));
        }

        let mut expectation = 0.0;
        for term in &self.terms {
            let op = self.term_matrix(term);
            let transformed = &op * qstate.state.clone();
            expectation += term.coefficient * qstate.state.dotc(&transformed).re;
        }

        Ok(expectation)
    }

    fn term_matrix(&self, term: &PauliTerm) -> CsrMatrix<Qbit> {
        let mut kinds = vec![Pauli::I; self.num_of_qbits];
        for op in &term.ops {
            kinds[op.qbit_index] = op.kind;
        }

        // Qubit 0 is the least-significant bit, so it is the last Kronecker
        // factor.
        let mut op = CsrMatrix::identity(1);
        for kind in kinds.iter().rev() {
            match kind {
                Pauli::I => {
                    op = kronecker_product(&op, &CsrMatrix::identity(2));
                }
                Pauli::X => {
                    op = kronecker_product(&op, &x_matrix());
                }
                Pauli::Y => {
                    op = kronecker_product(&op, &y_matrix());
                }
                Pauli::Z => {
                    op = kronecker_product(&op, &z_matrix());
                }
            }
        }

        op
    }
}
