use anyhow::Result;

use crate::circuit::{Circuit, ParameterizedGate};
use crate::qstate::QState;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rotation {
    RX,
    RY,
    RZ,
}

impl From<Rotation> for ParameterizedGate {
    fn from(rotation: Rotation) -> Self {
        match rotation {
            Rotation::RX => ParameterizedGate::RX,
            Rotation::RY => ParameterizedGate::RY,
            Rotation::RZ => ParameterizedGate::RZ,
        }
    }
}

/// CNOT placement between rotation layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entanglement {
    /// CNOT(i, i+1) for each neighbouring pair.
    Linear,
    /// Linear plus a closing CNOT(n-1, 0).
    Circular,
    /// CNOT(i, j) for every pair i < j.
    Full,
}

/// Hardware-efficient two-local ansatz: `reps` blocks of per-qubit rotation
/// gates followed by an entanglement block, closed by a final rotation
/// block. The parameter vector feeds the rotation angles in circuit order.
#[derive(Clone, Debug)]
pub struct Ansatz {
    num_of_qbits: usize,
    rotations: Vec<Rotation>,
    entanglement: Entanglement,
    reps: usize,
}

impl Ansatz {
    pub fn two_local(
        num_of_qbits: usize,
        rotations: &[Rotation],
        entanglement: Entanglement,
        reps: usize,
    ) -> Result<Self> {
        if num_of_qbits == 0 {
            return Err(anyhow::anyhow!("Ansatz needs at least one qubit"));
        }
        if rotations.is_empty() {
            return Err(anyhow::anyhow!("Ansatz needs at least one rotation gate"));
        }

        Ok(Self {
            num_of_qbits,
            rotations: rotations.to_vec(),
            entanglement,
            reps,
        })
    }

    /// RY+RZ rotation blocks, the scheme the Qiskit textbook calls
    /// EfficientSU2.
    pub fn efficient_su2(num_of_qbits: usize, reps: usize) -> Result<Self> {
        Self::two_local(
            num_of_qbits,
            &[Rotation::RY, Rotation::RZ],
            Entanglement::Linear,
            reps,
        )
    }

    pub fn num_of_qbits(&self) -> usize {
        self.num_of_qbits
    }

    pub fn num_of_parameters(&self) -> usize {
        (self.reps + 1) * self.num_of_qbits * self.rotations.len()
    }

    /// Materialize the circuit at a concrete parameter vector.
    pub fn circuit(&self, parameters: &[f64]) -> Result<Circuit> {
        if parameters.len() != self.num_of_parameters() {
            return Err(anyhow::anyhow!(
                "Ansatz expects {} parameters but got {}",
                self.num_of_parameters(),
                parameters.len()
            ));
        }

        let mut circuit = Circuit::new(self.num_of_qbits);
        let mut values = parameters.iter();

        for rep in 0..=self.reps {
            for qbit in 0..self.num_of_qbits {
                for &rotation in &self.rotations {
                    let &value = values.next().ok_or_else(|| {
                        anyhow::anyhow!("Parameter iterator exhausted unexpectedly")
                    })?;
                    circuit.add_parametric_gate_at(qbit, rotation.into(), value)?;
                }
            }

            if rep < self.reps {
                self.add_entanglers(&mut circuit)?;
            }
        }

        Ok(circuit)
    }

    /// Prepare the state `U(theta)|0...0>`.
    pub fn prepare(&self, parameters: &[f64]) -> Result<QState> {
        let circuit = self.circuit(parameters)?;
        circuit.apply(&QState::zero_state(self.num_of_qbits))
    }

    fn add_entanglers(&self, circuit: &mut Circuit) -> Result<()> {
        if self.num_of_qbits < 2 {
            return Ok(());
        }

        match self.entanglement {
            Entanglement::Linear => {
                for i in 0..self.num_of_qbits - 1 {
                    circuit.add_cnot(i, i + 1)?;
                }
            }
            Entanglement::Circular => {
                for i in 0..self.num_of_qbits - 1 {
                    circuit.add_cnot(i, i + 1)?;
                }
                circuit.add_cnot(self.num_of_qbits - 1, 0)?;
            }
            Entanglement::Full => {
                for i in 0..self.num_of_qbits {
                    for j in i + 1..self.num_of_qbits {
                        circuit.add_cnot(i, j)?;
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::assert_approx_complex_eq;

    #[test]
    fn test_parameter_count() -> Result<()> {
        let ansatz = Ansatz::efficient_su2(2, 1)?;
        // (reps + 1) layers * 2 qubits * 2 rotations
        assert_eq!(ansatz.num_of_parameters(), 8);

        let ansatz = Ansatz::two_local(3, &[Rotation::RY], Entanglement::Full, 2)?;
        assert_eq!(ansatz.num_of_parameters(), 9);

        Ok(())
    }

    #[test]
    fn test_parameter_length_mismatch() -> Result<()> {
        let ansatz = Ansatz::efficient_su2(2, 1)?;
        assert!(ansatz.circuit(&[0.0; 3]).is_err());
        Ok(())
    }

    #[test]
    fn test_zero_parameters_prepare_zero_state() -> Result<()> {
        let ansatz = Ansatz::efficient_su2(2, 2)?;
        let state = ansatz.prepare(&vec![0.0; ansatz.num_of_parameters()])?;

        // All rotations at angle zero are identities up to global phase,
        // and CNOT fixes |00>.
        assert_approx_complex_eq!(1.0, 0.0, state.amplitudes()[0]);
        assert_approx_complex_eq!(0.0, 0.0, state.amplitudes()[1]);
        assert_approx_complex_eq!(0.0, 0.0, state.amplitudes()[2]);
        assert_approx_complex_eq!(0.0, 0.0, state.amplitudes()[3]);

        Ok(())
    }

    #[test]
    fn test_single_ry_rotates_qubit() -> Result<()> {
        let ansatz = Ansatz::two_local(1, &[Rotation::RY], Entanglement::Linear, 0)?;
        assert_eq!(ansatz.num_of_parameters(), 1);

        let state = ansatz.prepare(&[PI])?;

        // RY(pi)|0> = |1>
        assert_approx_complex_eq!(0.0, 0.0, state.amplitudes()[0]);
        assert_approx_complex_eq!(1.0, 0.0, state.amplitudes()[1]);

        Ok(())
    }

    #[test]
    fn test_rejects_empty_configuration() {
        assert!(Ansatz::efficient_su2(0, 1).is_err());
        assert!(Ansatz::two_local(2, &[], Entanglement::Linear, 1).is_err());
    }
}
