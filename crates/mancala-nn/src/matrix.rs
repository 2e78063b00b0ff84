use ndarray::{Array1, Array2, Axis};
use rand::Rng;
use rand_distr::Normal;

/// Dense row-major matrix of connection weights between two layers.
///
/// A matrix joining a layer of `cols` neurons to a layer of `rows` neurons has
/// shape `(rows, cols)`: entry `(i, j)` is the weight from neuron `j` of the
/// previous layer to neuron `i` of the next one. The shape is fixed when the
/// matrix is built; every mutating operation keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    values: Array2<f64>,
}

impl WeightMatrix {
    /// Creates a matrix by evaluating `f(row, col)` for every entry.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        Self {
            values: Array2::from_shape_fn((rows, cols), |(r, c)| f(r, c)),
        }
    }

    /// Creates a matrix with every entry set to `value`.
    #[must_use]
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            values: Array2::from_elem((rows, cols), value),
        }
    }

    /// Creates a matrix from entries listed row by row.
    ///
    /// Returns `None` if `values.len() != rows * cols`.
    #[must_use]
    pub fn from_row_major(rows: usize, cols: usize, values: Vec<f64>) -> Option<Self> {
        Array2::from_shape_vec((rows, cols), values)
            .ok()
            .map(|values| Self { values })
    }

    /// Samples every entry from `N(0, 1/sqrt(cols))`.
    ///
    /// Scaling the deviation by the fan-in keeps the pre-activation sums of a
    /// fresh network in the responsive range of the logistic function.
    pub fn random_normal<R>(rows: usize, cols: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        #[expect(clippy::cast_precision_loss)]
        let std_dev = (cols.max(1) as f64).powf(-0.5);
        let normal = Normal::new(0.0, std_dev).expect("fan-in deviation is finite and positive");
        Self::from_fn(rows, cols, |_, _| rng.sample(normal))
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.values.nrows()
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.values.ncols()
    }

    /// Returns `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get((row, col)).copied()
    }

    /// Iterates over the entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    /// Iterates mutably over the entries in row-major order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.values.iter_mut()
    }

    /// Computes `self · v`.
    pub(crate) fn mul_vec(&self, v: &Array1<f64>) -> Array1<f64> {
        self.values.dot(v)
    }

    /// Computes `selfᵗ · v`.
    pub(crate) fn transpose_mul_vec(&self, v: &Array1<f64>) -> Array1<f64> {
        self.values.t().dot(v)
    }

    /// Adds `scale · (column ⊗ row)` in place.
    pub(crate) fn add_scaled_outer(&mut self, scale: f64, column: &Array1<f64>, row: &Array1<f64>) {
        debug_assert_eq!((column.len(), row.len()), self.shape());
        let outer = column
            .view()
            .insert_axis(Axis(1))
            .dot(&row.view().insert_axis(Axis(0)));
        self.values.scaled_add(scale, &outer);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_from_row_major_checks_length() {
        assert!(WeightMatrix::from_row_major(2, 3, vec![0.0; 5]).is_none());
        let m = WeightMatrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.get(1, 0), Some(4.0));
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_products() {
        let m = WeightMatrix::from_row_major(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = Array1::from(vec![1.0, 0.0, -1.0]);
        assert_eq!(m.mul_vec(&v).to_vec(), vec![-2.0, -2.0]);
        let w = Array1::from(vec![1.0, 1.0]);
        assert_eq!(m.transpose_mul_vec(&w).to_vec(), vec![5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_add_scaled_outer_keeps_shape() {
        let mut m = WeightMatrix::filled(2, 3, 1.0);
        let column = Array1::from(vec![1.0, 2.0]);
        let row = Array1::from(vec![1.0, 0.0, 3.0]);
        m.add_scaled_outer(0.5, &column, &row);
        assert_eq!(m.shape(), (2, 3));
        assert_eq!(m.iter().collect::<Vec<_>>(), vec![1.5, 1.0, 2.5, 2.0, 1.0, 4.0]);
    }

    #[test]
    fn test_random_normal_is_fan_in_scaled() {
        let mut rng = Pcg32::seed_from_u64(42);
        let m = WeightMatrix::random_normal(100, 400, &mut rng);
        #[expect(clippy::cast_precision_loss)]
        let n = (m.rows() * m.cols()) as f64;
        let mean = m.iter().sum::<f64>() / n;
        let variance = m.iter().map(|w| (w - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.005, "mean {mean}");
        // 1/sqrt(400) = 0.05
        assert!((variance.sqrt() - 0.05).abs() < 0.002, "std dev {}", variance.sqrt());
    }
}
