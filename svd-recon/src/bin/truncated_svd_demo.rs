//! Two-component TruncatedSvd of a random 10x5 matrix

use nalgebra::DMatrix;
use svd_recon::harness::preview;
use svd_recon::validation::{compare_matrices, ERROR_EPS};
use svd_recon::{generate_random_matrix, rng_from_env, SvdError, TruncatedSvd};

fn main() -> Result<(), SvdError> {
    env_logger::init();

    let mut rng = rng_from_env();
    let x = generate_random_matrix(10, 5, 0.0, 1.0, &mut rng)?;

    let (svd, x_reduced) = TruncatedSvd::new(2).fit_transform(&x, &mut rng)?;

    // U = X_reduced * Sigma^-1, so that U * S * V^T is the rank-2 approximation
    let s = DMatrix::from_diagonal(svd.singular_values());
    let u = DMatrix::from_fn(x_reduced.nrows(), x_reduced.ncols(), |i, j| {
        let sigma = svd.singular_values()[j];
        if sigma > 0.0 {
            x_reduced[(i, j)] / sigma
        } else {
            0.0
        }
    });
    let v = svd.components();

    println!("Original matrix shape: {:?}", x.shape());
    println!("Transformed matrix (X_reduced) shape: {:?}", x_reduced.shape());
    println!();
    println!("U matrix shape: {:?}", u.shape());
    println!("S matrix (diagonal singular values): {:?}", s.shape());
    println!("V matrix (right singular vectors): {:?}", v.shape());
    println!("Explained variance ratio: {:?}", svd.explained_variance_ratio().as_slice());

    let rebuilt = &u * &s * v;
    print!("{}", preview(&x, x.nrows()));
    print!("{}", preview(&rebuilt, rebuilt.nrows()));

    let report = compare_matrices(&x, &rebuilt, ERROR_EPS)?;
    println!("{} {}", report.passing, report.total);

    Ok(())
}
