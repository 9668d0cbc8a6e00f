//! Seeded k-means clustering.
//!
//! Partitions points into `k` clusters minimizing the within-cluster sum of
//! squared Euclidean distances (the *inertia*).
//!
//! # Algorithm
//!
//! 1. **Seeding (k-means++)** - The first centroid is a uniformly random point;
//!    each further centroid is drawn with probability proportional to its squared
//!    distance from the nearest centroid already chosen
//! 2. **Lloyd iterations** - Assign every point to its nearest centroid, then move
//!    each centroid to the mean of its members, until the total squared centroid
//!    shift drops below the tolerance or the iteration cap is reached
//! 3. **Restarts** - Steps 1-2 are repeated [`KMeansParams::restarts`] times from
//!    one seeded generator and the run with the lowest inertia is kept
//!
//! The tolerance is relative: it is multiplied by the mean per-column variance of
//! the input so that it behaves the same for scaled and unscaled data.
//!
//! A cluster that loses all its members keeps its previous centroid. Ties in
//! the nearest-centroid search go to the lowest centroid index, so results are
//! fully determined by the seed and the input order.

use rand::{Rng, SeedableRng as _};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use tierlift_stats::descriptive::DescriptiveStats;

/// Clustering parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansParams {
    /// Number of clusters (`k`)
    pub clusters: usize,
    /// Number of independently seeded runs; the best one is kept
    pub restarts: usize,
    /// Upper bound on Lloyd iterations per run
    pub max_iterations: usize,
    /// Convergence tolerance, relative to the mean column variance
    pub tolerance: f64,
    /// Seed of the random generator shared by all restarts
    pub seed: u64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            clusters: 3,
            restarts: 10,
            max_iterations: 300,
            tolerance: 1e-4,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum KMeansError {
    #[display("number of clusters must be positive")]
    NoClusters,
    #[display("cannot form {clusters} clusters from {points} points")]
    TooFewPoints { points: usize, clusters: usize },
}

/// Result of a k-means fit.
#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    centroids: Vec<Vec<f64>>,
    labels: Vec<usize>,
    inertia: f64,
    iterations: usize,
}

impl KMeans {
    /// Clusters `points` according to `params`.
    ///
    /// # Panics
    ///
    /// Panics if the points do not all have the same dimension.
    pub fn fit<P>(points: &[P], params: &KMeansParams) -> Result<Self, KMeansError>
    where
        P: AsRef<[f64]>,
    {
        let k = params.clusters;
        if k == 0 {
            return Err(KMeansError::NoClusters);
        }
        if points.len() < k {
            return Err(KMeansError::TooFewPoints {
                points: points.len(),
                clusters: k,
            });
        }
        let points = points.iter().map(AsRef::as_ref).collect::<Vec<_>>();
        let dim = points[0].len();
        assert!(
            points.iter().all(|p| p.len() == dim),
            "all points must have the same dimension"
        );

        let tolerance = params.tolerance * mean_column_variance(&points, dim);
        let mut rng = Pcg64::seed_from_u64(params.seed);

        let mut best: Option<Self> = None;
        for restart in 0..params.restarts.max(1) {
            let initial = init_plus_plus(&points, k, &mut rng);
            let run = lloyd(&points, initial, params.max_iterations, tolerance);
            log::debug!(
                "k-means restart {restart}: inertia {:.6} after {} iterations",
                run.inertia,
                run.iterations
            );
            if best.as_ref().is_none_or(|b| run.inertia < b.inertia) {
                best = Some(run);
            }
        }

        Ok(best.expect("at least one restart is always run"))
    }

    /// Cluster centers, in the same space as the input points.
    #[must_use]
    pub fn centroids(&self) -> &[Vec<f64>] {
        &self.centroids
    }

    /// Cluster index of every input point, in input order.
    #[must_use]
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Sum of squared distances from each point to its assigned centroid.
    #[must_use]
    pub fn inertia(&self) -> f64 {
        self.inertia
    }

    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Index of and squared distance to the nearest centroid (lowest index on ties).
fn nearest(point: &[f64], centroids: &[Vec<f64>]) -> (usize, f64) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, squared_distance(point, c)))
        .fold((0, f64::INFINITY), |best, cur| {
            if cur.1 < best.1 { cur } else { best }
        })
}

fn mean_column_variance(points: &[&[f64]], dim: usize) -> f64 {
    if dim == 0 {
        return 0.0;
    }
    #[expect(clippy::cast_precision_loss)]
    let dim_f = dim as f64;
    (0..dim)
        .filter_map(|col| DescriptiveStats::new(points.iter().map(|p| p[col])))
        .map(|s| s.variance)
        .sum::<f64>()
        / dim_f
}

fn init_plus_plus<R>(points: &[&[f64]], k: usize, rng: &mut R) -> Vec<Vec<f64>>
where
    R: Rng + ?Sized,
{
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..points.len())].to_vec());

    let mut closest = points
        .iter()
        .map(|p| squared_distance(p, &centroids[0]))
        .collect::<Vec<_>>();

    while centroids.len() < k {
        let total = closest.iter().sum::<f64>();
        let chosen = if total > 0.0 {
            let mut target = rng.random::<f64>() * total;
            closest
                .iter()
                .position(|&d| {
                    target -= d;
                    target < 0.0
                })
                .unwrap_or_else(|| {
                    // rounding left a remainder; take the last point with weight
                    closest.iter().rposition(|&d| d > 0.0).unwrap_or(0)
                })
        } else {
            rng.random_range(0..points.len())
        };

        let centroid = points[chosen].to_vec();
        for (d, p) in closest.iter_mut().zip(points) {
            *d = d.min(squared_distance(p, &centroid));
        }
        centroids.push(centroid);
    }
    centroids
}

fn lloyd(
    points: &[&[f64]],
    mut centroids: Vec<Vec<f64>>,
    max_iterations: usize,
    tolerance: f64,
) -> KMeans {
    let dim = points[0].len();
    let mut iterations = 0;

    while iterations < max_iterations {
        iterations += 1;

        let mut sums = vec![vec![0.0; dim]; centroids.len()];
        let mut counts = vec![0_usize; centroids.len()];
        for p in points {
            let (label, _) = nearest(p, &centroids);
            counts[label] += 1;
            for (s, x) in sums[label].iter_mut().zip(*p) {
                *s += x;
            }
        }

        let mut shift = 0.0;
        for ((centroid, sum), count) in centroids.iter_mut().zip(sums).zip(counts) {
            if count == 0 {
                continue;
            }
            #[expect(clippy::cast_precision_loss)]
            let n = count as f64;
            let updated = sum.into_iter().map(|s| s / n).collect::<Vec<_>>();
            shift += squared_distance(centroid, &updated);
            *centroid = updated;
        }

        if shift <= tolerance {
            break;
        }
    }

    let (labels, distances): (Vec<_>, Vec<_>) =
        points.iter().map(|p| nearest(p, &centroids)).unzip();

    KMeans {
        centroids,
        labels,
        inertia: distances.into_iter().sum(),
        iterations,
    }
}
