#[macro_export]
macro_rules! assert_approx_eq {
    ($expected:expr, $actual:expr) => {{
        let expected: f64 = $expected;
        let actual: f64 = $actual;
        assert!(
            (expected - actual).abs() < 1e-10,
            "Expected {}, but got {}",
            expected,
            actual
        );
    }};
}

#[macro_export]
macro_rules! assert_approx_complex_eq {
    ($expected_re:expr, $expected_im:expr, $actual:expr) => {{
        let actual: num_complex::Complex<f64> = $actual;
        assert!(
            ($expected_re - actual.re).abs() < 1e-10 && ($expected_im - actual.im).abs() < 1e-10,
            "Expected {}+{}i, but got {}",
            $expected_re,
            $expected_im,
            actual
        );
    }};
}
