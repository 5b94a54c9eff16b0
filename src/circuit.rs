use anyhow::Result;
use nalgebra_sparse::{coo::CooMatrix, csr::CsrMatrix};
use num_complex::Complex;

use crate::gates::{h_matrix, rx_matrix, ry_matrix, rz_matrix, x_matrix};
use crate::qstate::QState;
use crate::Qbit;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterizedGate {
    RX,
    RY,
    RZ,
}

struct Parameter {
    gate_index: usize,
    qbit_index: usize,
    gate: ParameterizedGate,
    value: f64,
}

/// Gate sequence over a fixed number of qubits. Gates are stored as
/// materialized sparse matrices; parameterized gates additionally keep
/// enough bookkeeping to be rebuilt when their angle is rebound.
pub struct Circuit {
    gates: Vec<CsrMatrix<Qbit>>,
    num_of_qbits: usize,

    parameters: Vec<Parameter>,
}

impl Circuit {
    pub fn new(num_of_qbits: usize) -> Self {
        Self {
            gates: Vec::new(),
            num_of_qbits,
            parameters: Vec::new(),
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        self.num_of_qbits
    }

    fn check_and_reverse_index(&self, index: usize) -> Result<usize> {
        if index >= self.num_of_qbits {
            return Err(anyhow::anyhow!(
                "Index out of bounds for the number of qubits {}",
                self.num_of_qbits
            ));
        }
        Ok(self.num_of_qbits - 1 - index)
    }

    fn expand_gate_for_index(&self, index: usize, gate: &CsrMatrix<Qbit>) -> Result<CsrMatrix<Qbit>> {
        let index = self.check_and_reverse_index(index)?;

        let mut matrix = CsrMatrix::identity(1);
        for i in 0..self.num_of_qbits {
            if i == index {
                matrix = kronecker_product(&matrix, gate);
            } else {
                matrix = kronecker_product(&matrix, &CsrMatrix::identity(2));
            }
        }

        Ok(matrix)
    }

    pub fn gate_at(mut self, index: usize, gate: CsrMatrix<Qbit>) -> Result<Self> {
        self.add_gate_at(index, gate)?;
        Ok(self)
    }

    pub fn add_gate_at(&mut self, index: usize, gate: CsrMatrix<Qbit>) -> Result<()> {
        let gate = self.expand_gate_for_index(index, &gate)?;
        self.gates.push(gate);
        Ok(())
    }

    pub fn add_parametric_gate_at(
        &mut self,
        index: usize,
        gate: ParameterizedGate,
        value: f64,
    ) -> Result<()> {
        let matrix = self.expand_gate_for_index(index, &rotation_matrix(gate, value))?;

        self.parameters.push(Parameter {
            gate_index: self.gates.len(),
            qbit_index: index,
            gate,
            value,
        });
        self.gates.push(matrix);

        Ok(())
    }

    pub fn num_of_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn get_parameters(&self) -> Vec<f64> {
        self.parameters.iter().map(|param| param.value).collect()
    }

    pub fn set_parameter(&mut self, param_index: usize, value: f64) -> Result<()> {
        if let Some(param) = self.parameters.get_mut(param_index) {
            param.value = value;
        } else {
            return Err(anyhow::anyhow!("Parameter index out of bounds"));
        };

        // No index check is needed
        let param = &self.parameters[param_index];

        let matrix =
            self.expand_gate_for_index(param.qbit_index, &rotation_matrix(param.gate, value))?;
        self.gates[param.gate_index] = matrix;

        Ok(())
    }

    pub fn set_parameters(&mut self, values: &[f64]) -> Result<()> {
        if values.len() != self.parameters.len() {
            return Err(anyhow::anyhow!(
                "Number of values does not match number of parameters"
            ));
        }

        for (i, &value) in values.iter().enumerate() {
            self.set_parameter(i, value)?;
        }

        Ok(())
    }

    #[allow(non_snake_case)]
    pub fn H(self, index: usize) -> Result<Self> {
        self.gate_at(index, h_matrix())
    }

    pub fn control(mut self, control: usize, target: usize, gate: &CsrMatrix<Qbit>) -> Result<Self> {
        let matrix = self.build_control_matrix(control, target, gate)?;
        self.gates.push(matrix);
        Ok(self)
    }

    fn build_control_matrix(
        &self,
        control: usize,
        target: usize,
        gate: &CsrMatrix<Qbit>,
    ) -> Result<CsrMatrix<Qbit>> {
        let control = self.check_and_reverse_index(control)?;
        let target = self.check_and_reverse_index(target)?;

        if control == target {
            return Err(anyhow::anyhow!(
                "Control and target qubits cannot be the same"
            ));
        }

        // |0><0|
        let mut zero_zero = CooMatrix::new(2, 2);
        zero_zero.push(0, 0, Complex::new(1.0, 0.0));
        let zero_zero = CsrMatrix::from(&zero_zero);

        // |1><1|
        let mut one_one = CooMatrix::new(2, 2);
        one_one.push(1, 1, Complex::new(1.0, 0.0));
        let one_one = CsrMatrix::from(&one_one);

        let id = CsrMatrix::identity(2);

        let mut zero_matrix = CsrMatrix::identity(1);
        let mut one_matrix = CsrMatrix::identity(1);
        for i in 0..self.num_of_qbits {
            if i == control {
                zero_matrix = kronecker_product(&zero_matrix, &zero_zero);
                one_matrix = kronecker_product(&one_matrix, &one_one);
            } else if i == target {
                zero_matrix = kronecker_product(&zero_matrix, &id);
                one_matrix = kronecker_product(&one_matrix, gate);
            } else {
                zero_matrix = kronecker_product(&zero_matrix, &id);
                one_matrix = kronecker_product(&one_matrix, &id);
            }
        }

        Ok(zero_matrix + one_matrix)
    }

    pub fn cnot(self, control: usize, target: usize) -> Result<Self> {
        self.control(control, target, &x_matrix())
    }

    pub fn add_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        let matrix = self.build_control_matrix(control, target, &x_matrix())?;
        self.gates.push(matrix);
        Ok(())
    }

    pub fn swap(self, index1: usize, index2: usize) -> Result<Self> {
        if index1 == index2 {
            return Err(anyhow::anyhow!("Cannot swap a qubit with itself"));
        }

        // cnot reverses the indices itself; bounds are checked there too.
        self.cnot(index1, index2)?
            .cnot(index2, index1)?
            .cnot(index1, index2)
    }

    pub fn apply(&self, state: &QState) -> Result<QState> {
        if state.num_of_qbits() != self.num_of_qbits {
            return Err(anyhow::anyhow!(
                "State has {} qubits but circuit expects {}",
                state.num_of_qbits(),
                self.num_of_qbits
            ));
        }

        let mut result = state.state.clone();
        for gate in &self.gates {
            result = gate * result;
        }
        Ok(QState { state: result })
    }
}

fn rotation_matrix(gate: ParameterizedGate, angle: f64) -> CsrMatrix<Qbit> {
    match gate {
        ParameterizedGate::RX => rx_matrix(angle),
        ParameterizedGate::RY => ry_matrix(angle),
        ParameterizedGate::RZ => rz_matrix(angle),
    }
}

pub fn kronecker_product(x: &CsrMatrix<Qbit>, y: &CsrMatrix<Qbit>) -> CsrMatrix<Qbit> {
    let mut result = CooMatrix::new(x.nrows() * y.nrows(), x.ncols() * y.ncols());

    for (rx, cx, value_x) in x.triplet_iter() {
        for (ry, cy, value_y) in y.triplet_iter() {
            let new_row = rx * y.nrows() + ry;
            let new_col = cx * y.ncols() + cy;
            let new_value = value_x * value_y;
            result.push(new_row, new_col, new_value);
        }
    }

    CsrMatrix::from(&result)
}
