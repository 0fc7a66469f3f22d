use std::collections::HashSet;

use crate::cover::{
    error::{CoverError, CoverResult},
    random::RandomSource,
};

pub type Point = [f64; 3];

const MAX_ITERATIONS: usize = 300;

/// Result of a clustering run.
#[derive(Debug, Clone, PartialEq)]
pub struct Clustering {
    pub codebook: Vec<Point>,
    /// Mean Euclidean distance between each point and its nearest centroid.
    pub distortion: f64,
}

/// Clusters `points` into at most `k` centroids.
///
/// Every restart seeds the codebook with `k` distinct observations and
/// refines it until the mean distortion drops by no more than `threshold`.
/// Centroids that end up without members are dropped, so inputs with fewer
/// than `k` distinct colors yield a shorter codebook. The codebook with the
/// lowest distortion across all restarts wins.
pub fn kmeans(
    points: &[Point],
    k: usize,
    restarts: usize,
    threshold: f64,
    rng: &mut dyn RandomSource,
) -> CoverResult<Clustering> {
    if points.is_empty() {
        return Err(CoverError::clustering("no observations to cluster"));
    }
    if k == 0 {
        return Err(CoverError::clustering("cluster count must be positive"));
    }
    if k > points.len() {
        return Err(CoverError::clustering(format!(
            "cannot pick {} seeds from {} observations",
            k,
            points.len()
        )));
    }
    if restarts == 0 {
        return Err(CoverError::clustering("at least one restart is required"));
    }
    if points.iter().flatten().any(|v| !v.is_finite()) {
        return Err(CoverError::clustering("observations must be finite"));
    }

    let mut best: Option<Clustering> = None;
    for _ in 0..restarts {
        let guess = seed(points, k, rng);
        let run = refine(points, guess, threshold);
        if best.as_ref().is_none_or(|b| run.distortion < b.distortion) {
            best = Some(run);
        }
    }

    best.ok_or_else(|| CoverError::clustering("clustering produced no codebook"))
}

/// Index of the nearest centroid for every point, first minimum wins.
pub fn assign(points: &[Point], codebook: &[Point]) -> Vec<usize> {
    points
        .iter()
        .map(|p| nearest(p, codebook).0)
        .collect()
}

/// Member count per centroid index.
pub fn populations(assignments: &[usize], k: usize) -> Vec<usize> {
    let mut counts = vec![0; k];
    for &code in assignments {
        if let Some(count) = counts.get_mut(code) {
            *count += 1;
        }
    }
    counts
}

fn seed(points: &[Point], k: usize, rng: &mut dyn RandomSource) -> Vec<Point> {
    let mut picked = HashSet::with_capacity(k);
    let mut guess = Vec::with_capacity(k);
    while guess.len() < k {
        let index = rng.index(points.len());
        if picked.insert(index) {
            guess.push(points[index]);
        }
    }
    guess
}

fn refine(points: &[Point], mut codebook: Vec<Point>, threshold: f64) -> Clustering {
    let mut previous = f64::INFINITY;
    let mut distortion = f64::INFINITY;

    for _ in 0..MAX_ITERATIONS {
        let mut sums = vec![[0.0; 3]; codebook.len()];
        let mut counts = vec![0usize; codebook.len()];
        let mut total = 0.0;

        for p in points {
            let (code, dist) = nearest(p, &codebook);
            total += dist;
            counts[code] += 1;
            for c in 0..3 {
                sums[code][c] += p[c];
            }
        }

        distortion = total / points.len() as f64;
        codebook = sums
            .iter()
            .zip(&counts)
            .filter(|(_, n)| **n > 0)
            .map(|(sum, &n)| {
                let n = n as f64;
                [sum[0] / n, sum[1] / n, sum[2] / n]
            })
            .collect();

        let diff = previous - distortion;
        previous = distortion;
        if diff <= threshold {
            break;
        }
    }

    Clustering {
        codebook,
        distortion,
    }
}

fn nearest(p: &Point, codebook: &[Point]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (i, c) in codebook.iter().enumerate() {
        let d = ((p[0] - c[0]).powi(2) + (p[1] - c[1]).powi(2) + (p[2] - c[2]).powi(2)).sqrt();
        if d < best.1 {
            best = (i, d);
        }
    }
    best
}
