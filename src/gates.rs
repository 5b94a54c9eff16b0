use nalgebra_sparse::{coo::CooMatrix, csr::CsrMatrix};
use num_complex::Complex;

use crate::Qbit;

pub fn h_matrix() -> CsrMatrix<Qbit> {
    let v = Complex::new(1.0 / 2.0_f64.sqrt(), 0.0);
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, v);
    coo.push(0, 1, v);
    coo.push(1, 0, v);
    coo.push(1, 1, -v);
    CsrMatrix::from(&coo)
}

pub fn x_matrix() -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 1, Complex::new(1.0, 0.0));
    coo.push(1, 0, Complex::new(1.0, 0.0));
    CsrMatrix::from(&coo)
}

pub fn y_matrix() -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 1, Complex::new(0.0, -1.0));
    coo.push(1, 0, Complex::new(0.0, 1.0));
    CsrMatrix::from(&coo)
}

pub fn z_matrix() -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, Complex::new(1.0, 0.0));
    coo.push(1, 1, Complex::new(-1.0, 0.0));
    CsrMatrix::from(&coo)
}

pub fn s_matrix() -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, Complex::new(1.0, 0.0));
    coo.push(1, 1, Complex::new(0.0, 1.0));
    CsrMatrix::from(&coo)
}

pub fn sdg_matrix() -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, Complex::new(1.0, 0.0));
    coo.push(1, 1, Complex::new(0.0, -1.0));
    CsrMatrix::from(&coo)
}

pub fn t_matrix() -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, Complex::new(1.0, 0.0));
    coo.push(1, 1, Complex::from_polar(1.0, std::f64::consts::FRAC_PI_4));
    CsrMatrix::from(&coo)
}

pub fn rx_matrix(theta: f64) -> CsrMatrix<Qbit> {
    let cos = Complex::new((theta / 2.0).cos(), 0.0);
    let isin = Complex::new(0.0, -(theta / 2.0).sin());
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, cos);
    coo.push(0, 1, isin);
    coo.push(1, 0, isin);
    coo.push(1, 1, cos);
    CsrMatrix::from(&coo)
}

pub fn ry_matrix(theta: f64) -> CsrMatrix<Qbit> {
    let cos = Complex::new((theta / 2.0).cos(), 0.0);
    let sin = Complex::new((theta / 2.0).sin(), 0.0);
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, cos);
    coo.push(0, 1, -sin);
    coo.push(1, 0, sin);
    coo.push(1, 1, cos);
    CsrMatrix::from(&coo)
}

pub fn rz_matrix(theta: f64) -> CsrMatrix<Qbit> {
    let mut coo = CooMatrix::new(2, 2);
    coo.push(0, 0, Complex::from_polar(1.0, -theta / 2.0));
    coo.push(1, 1, Complex::from_polar(1.0, theta / 2.0));
    CsrMatrix::from(&coo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_complex_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_rotation_gates_at_zero_are_identity() {
        for gate in [rx_matrix(0.0), ry_matrix(0.0), rz_matrix(0.0)] {
            assert_approx_complex_eq!(1.0, 0.0, gate.get_entry(0, 0).unwrap().into_value());
            assert_approx_complex_eq!(1.0, 0.0, gate.get_entry(1, 1).unwrap().into_value());
        }
    }

    #[test]
    fn test_sdg_is_inverse_of_s() {
        let product = s_matrix() * sdg_matrix();
        assert_approx_complex_eq!(1.0, 0.0, product.get_entry(0, 0).unwrap().into_value());
        assert_approx_complex_eq!(1.0, 0.0, product.get_entry(1, 1).unwrap().into_value());
    }

    #[test]
    fn test_rx_pi_flips_bit() {
        let gate = rx_matrix(PI);
        assert_approx_complex_eq!(0.0, -1.0, gate.get_entry(0, 1).unwrap().into_value());
        assert_approx_complex_eq!(0.0, -1.0, gate.get_entry(1, 0).unwrap().into_value());
    }
}
