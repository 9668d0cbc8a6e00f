//! Column-wise feature standardization.
//!
//! [`StandardScaler`] learns the mean and population standard deviation of
//! every column of a row-major matrix and maps values to `(x - mean) / scale`.
//! A column with zero variance keeps a scale of `1.0`, so constant columns
//! map to zero instead of producing `NaN`.

use crate::descriptive::DescriptiveStats;

/// Fitted per-column standardization parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fits the scaler to the given rows.
    ///
    /// Returns `None` when `rows` is empty.
    ///
    /// # Panics
    ///
    /// Panics if the rows do not all have the same length.
    #[must_use]
    pub fn fit<R>(rows: &[R]) -> Option<Self>
    where
        R: AsRef<[f64]>,
    {
        let width = rows.first()?.as_ref().len();
        assert!(
            rows.iter().all(|r| r.as_ref().len() == width),
            "all rows must have the same number of columns"
        );

        let (means, scales) = (0..width)
            .map(|col| {
                let stats = DescriptiveStats::new(rows.iter().map(|r| r.as_ref()[col]))?;
                let scale = if stats.std_dev > 0.0 {
                    stats.std_dev
                } else {
                    1.0
                };
                Some((stats.mean, scale))
            })
            .collect::<Option<(Vec<_>, Vec<_>)>>()?;

        Some(Self { means, scales })
    }

    /// Number of columns the scaler was fitted on.
    #[must_use]
    pub fn width(&self) -> usize {
        self.means.len()
    }

    #[must_use]
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    #[must_use]
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Standardizes a single row.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have [`Self::width`] columns.
    #[must_use]
    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        assert_eq!(row.len(), self.width());
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect()
    }

    /// Standardizes every row.
    #[must_use]
    pub fn transform_all<R>(&self, rows: &[R]) -> Vec<Vec<f64>>
    where
        R: AsRef<[f64]>,
    {
        rows.iter().map(|r| self.transform(r.as_ref())).collect()
    }

    /// Maps a standardized row back to original units.
    ///
    /// # Panics
    ///
    /// Panics if `row` does not have [`Self::width`] columns.
    #[must_use]
    pub fn inverse_transform(&self, row: &[f64]) -> Vec<f64> {
        assert_eq!(row.len(), self.width());
        row.iter()
            .zip(self.means.iter().zip(&self.scales))
            .map(|(z, (mean, scale))| z * scale + mean)
            .collect()
    }
}
