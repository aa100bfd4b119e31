use lapis::linalg::{
    decompose_ll, decompose_lup, decompose_qr, lup_factors, solve_gauss, solve_ll,
    solve_lower_triangular, solve_lup, solve_qr, solve_reduced_lower_triangular,
    solve_reduced_upper_triangular, solve_transpose_lower_triangular,
    solve_transpose_upper_triangular, solve_upper_triangular, LinalgError,
};
use lapis::{Matrix, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOL: f64 = 1e-9;

fn random_vec(rng: &mut StdRng, n: usize) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Random matrix with a boosted diagonal, comfortably nonsingular.
fn random_system(rng: &mut StdRng, n: usize) -> (Matrix<f64>, Vector<f64>) {
    let mut a = Matrix::from_vec(n, n, random_vec(rng, n * n));
    for i in 0..n {
        a[(i, i)] += n as f64;
    }
    let b = Vector::from_vec(random_vec(rng, n));
    (a, b)
}

fn residual(a: &Matrix<f64>, x: &Vector<f64>, b: &Vector<f64>) -> f64 {
    (&a.mul_vector(x) - b).norm()
}

#[test]
fn worked_example() {
    let a = Matrix::from_rows(2, 2, &[4.0_f64, 1.0, 1.0, 3.0]);
    let b = Vector::from_slice(&[1.0, 2.0]);
    for x in [
        a.solve(&b).unwrap(),
        a.solve_gauss(&b).unwrap(),
        a.solve_qr(&b).unwrap(),
        a.solve_cholesky(&b).unwrap(),
    ] {
        assert!((x[0] - 0.0909090909).abs() < 1e-9);
        assert!((x[1] - 0.6363636363).abs() < 1e-9);
    }
}

#[test]
fn every_family_round_trips() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in 2..50 {
        let (a, b) = random_system(&mut rng, n);

        let x = solve_gauss(&a, &b).unwrap();
        assert!(residual(&a, &x, &b) < TOL, "gauss n = {}", n);

        let (mut l, mut u, mut p) = lup_factors(&a).unwrap();
        decompose_lup(&a, &mut l, &mut u, &mut p).unwrap();
        let x = solve_lup(&l, &u, &p, &b).unwrap();
        assert!(residual(&a, &x, &b) < TOL, "lup n = {}", n);

        let (q, r) = decompose_qr(&a).unwrap();
        let x = solve_qr(&q, &r, &b).unwrap();
        assert!(residual(&a, &x, &b) < TOL, "qr n = {}", n);

        let spd = &(&a * &a.transpose()) + &Matrix::eye(n);
        let spd = (&spd + &spd.transpose()) * 0.5;
        let l = decompose_ll(&spd).unwrap();
        let x = solve_ll(&l, &b).unwrap();
        assert!(residual(&spd, &x, &b) < TOL, "cholesky n = {}", n);
    }
}

#[test]
fn inverse_and_det() {
    let mut rng = StdRng::seed_from_u64(9);
    for n in 2..20 {
        let (a, _) = random_system(&mut rng, n);
        let inv = a.inverse().unwrap();
        assert!((&(&a * &inv) - &Matrix::eye(n)).max_abs() < TOL);

        let det = a.det().unwrap();
        let qr_det = a.qr().unwrap().det().unwrap();
        assert!((det - qr_det).abs() < 1e-8 * det.abs(), "n = {}", n);
    }
}

#[test]
fn triangular_family() {
    let mut rng = StdRng::seed_from_u64(31);
    let n = 12;
    let (a, b) = random_system(&mut rng, n);
    let lower = Matrix::from_fn(n, n, |i, j| if j <= i { a[(i, j)] } else { 0.0 });
    let upper = lower.transpose();

    let x = solve_lower_triangular(&lower, &b).unwrap();
    assert!(residual(&lower, &x, &b) < TOL);
    let x = solve_upper_triangular(&upper, &b).unwrap();
    assert!(residual(&upper, &x, &b) < TOL);

    // Lᵗ x = b is the same system as U x = b with U = Lᵗ.
    let x = solve_transpose_lower_triangular(&lower, &b).unwrap();
    assert!(residual(&upper, &x, &b) < TOL);
    let x = solve_transpose_upper_triangular(&upper, &b).unwrap();
    assert!(residual(&lower, &x, &b) < TOL);

    let unit_lower = Matrix::from_fn(n, n, |i, j| {
        if i == j {
            1.0
        } else {
            lower[(i, j)] / n as f64
        }
    });
    let x = solve_reduced_lower_triangular(&unit_lower, &b).unwrap();
    assert!(residual(&unit_lower, &x, &b) < TOL);
    let unit_upper = unit_lower.transpose();
    let x = solve_reduced_upper_triangular(&unit_upper, &b).unwrap();
    assert!(residual(&unit_upper, &x, &b) < TOL);
}

#[test]
fn least_squares_normal_equations() {
    let mut rng = StdRng::seed_from_u64(77);
    let (rows, cols) = (30, 4);
    let a = Matrix::from_vec(rows, cols, random_vec(&mut rng, rows * cols));
    let b = Vector::from_vec(random_vec(&mut rng, rows));
    let x = a.solve_qr(&b).unwrap();
    // The residual is orthogonal to the column space: Aᵗ (A x - b) = 0.
    let r = &a.mul_vector(&x) - &b;
    assert!(a.transpose_mul_vector(&r).norm() < TOL);
}

#[test]
fn singular_systems_fail_fast() {
    let a = Matrix::from_rows(3, 3, &[1.0_f64, 2.0, 3.0, 0.0, 0.0, 0.0, 4.0, 5.0, 6.0]);
    let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
    assert!(matches!(a.solve(&b), Err(LinalgError::Singular { .. })));
    assert!(matches!(a.solve_gauss(&b), Err(LinalgError::Singular { .. })));
    assert!(matches!(a.inverse(), Err(LinalgError::Singular { .. })));
    assert_eq!(a.det().unwrap(), 0.0);
}

#[test]
fn shape_errors() {
    let a = Matrix::<f64>::zeros(2, 3);
    let b = Vector::from_slice(&[1.0, 2.0]);
    assert_eq!(
        a.solve(&b).unwrap_err(),
        LinalgError::NotSquare { rows: 2, cols: 3 }
    );
    let sq = Matrix::<f64>::eye(3);
    let err = sq.solve_gauss(&b).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(
        err,
        LinalgError::DimensionMismatch {
            expected: (3, 1),
            got: (2, 1)
        }
    );
}
