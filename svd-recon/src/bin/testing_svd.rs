//! Rank `min(m, n) - 1` reconstruction of a random 400x100 matrix

use svd_recon::harness::{self, preview, HarnessConfig};
use svd_recon::SvdError;

fn main() -> Result<(), SvdError> {
    env_logger::init();

    let config = HarnessConfig::new(400, 100, Some(-1))
        .with_range(0.0, 10.0)
        .with_seed_from_env();
    let outcome = harness::run(&config)?;

    let [u, d, vt] = outcome.factors.shapes();
    println!("{u:?} {d:?} {vt:?}");
    println!("{:?} {:?}", outcome.matrix.shape(), outcome.reconstructed.shape());
    print!("{}", preview(&outcome.matrix, 4));
    print!("{}", preview(&outcome.reconstructed, 4));
    println!("{}", outcome.passed());

    Ok(())
}
