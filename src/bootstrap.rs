//! Bootstrap / out-of-bag row sampling.

use rand::Rng;

/// Draw `k` row indices uniformly with replacement from `[0, n)`, returning
/// the drawn multiset alongside the sorted complement (rows never drawn).
pub fn bootstrap(rng: &mut impl Rng, k: usize, n: usize) -> (Vec<usize>, Vec<usize>) {
    debug_assert!(n > 0, "bootstrap called on an empty training set");

    let mut drawn = Vec::with_capacity(k);
    let mut seen = vec![false; n];
    for _ in 0..k {
        let row = rng.gen_range(0..n);
        drawn.push(row);
        seen[row] = true;
    }

    let oob: Vec<usize> = (0..n).filter(|&i| !seen[i]).collect();
    log::debug!("drew {k} of {n} rows, {} left out-of-bag", oob.len());
    (drawn, oob)
}
