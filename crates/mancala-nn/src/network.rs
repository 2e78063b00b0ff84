use ndarray::Array1;
use rand::Rng;

use crate::{NetworkError, VectorKind, WeightMatrix};

/// Learning rate used when the caller does not pick one.
pub const DEFAULT_LEARNING_RATE: f64 = 0.5;

/// The logistic function `1 / (1 + e^-x)`.
#[must_use]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A layered feed-forward network with logistic neurons.
///
/// The number of weight matrices is always `layer_sizes.len() - 1` and matrix
/// `k` always has shape `(layer_sizes[k + 1], layer_sizes[k])`. Both
/// constructors reject anything else, and no method can reshape a matrix
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layer_sizes: Vec<usize>,
    learning_rate: f64,
    weights: Vec<WeightMatrix>,
}

impl Network {
    /// Creates a network with fan-in scaled normal weights.
    ///
    /// Each entry of matrix `k` is drawn from `N(0, 1/sqrt(layer_sizes[k]))`.
    pub fn random<R>(layer_sizes: &[usize], learning_rate: f64, rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        validate_architecture(layer_sizes)?;
        validate_learning_rate(learning_rate)?;
        let weights = layer_sizes
            .windows(2)
            .map(|pair| WeightMatrix::random_normal(pair[1], pair[0], rng))
            .collect();
        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            learning_rate,
            weights,
        })
    }

    /// Like [`Self::random`], with [`DEFAULT_LEARNING_RATE`].
    pub fn with_default_learning_rate<R>(layer_sizes: &[usize], rng: &mut R) -> Result<Self, NetworkError>
    where
        R: Rng + ?Sized,
    {
        Self::random(layer_sizes, DEFAULT_LEARNING_RATE, rng)
    }

    /// Creates a network from explicit weight matrices.
    ///
    /// Fails unless there is exactly one matrix per consecutive layer pair,
    /// each with the shape that pair implies.
    pub fn from_weights(
        layer_sizes: &[usize],
        learning_rate: f64,
        weights: Vec<WeightMatrix>,
    ) -> Result<Self, NetworkError> {
        validate_architecture(layer_sizes)?;
        validate_learning_rate(learning_rate)?;
        if weights.len() != layer_sizes.len() - 1 {
            return Err(NetworkError::WeightCountMismatch {
                expected: layer_sizes.len() - 1,
                actual: weights.len(),
            });
        }
        for (index, (pair, matrix)) in layer_sizes.windows(2).zip(&weights).enumerate() {
            let expected = (pair[1], pair[0]);
            if matrix.shape() != expected {
                return Err(NetworkError::WeightShapeMismatch {
                    index,
                    expected,
                    actual: matrix.shape(),
                });
            }
        }
        Ok(Self {
            layer_sizes: layer_sizes.to_vec(),
            learning_rate,
            weights,
        })
    }

    #[must_use]
    pub fn layer_sizes(&self) -> &[usize] {
        &self.layer_sizes
    }

    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    #[must_use]
    pub fn weights(&self) -> &[WeightMatrix] {
        &self.weights
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.layer_sizes[0]
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.layer_sizes[self.layer_sizes.len() - 1]
    }

    /// Total number of scalar weights across all matrices.
    #[must_use]
    pub fn weight_count(&self) -> usize {
        self.weights.iter().map(|m| m.rows() * m.cols()).sum()
    }

    /// Iterates mutably over every scalar weight, matrix by matrix in row-major order.
    pub fn weights_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.weights.iter_mut().flat_map(WeightMatrix::iter_mut)
    }

    /// Runs a forward pass and returns the output layer.
    ///
    /// The result depends only on the current weights and `input`.
    pub fn infer(&self, input: &[f64]) -> Result<Vec<f64>, NetworkError> {
        self.check_len(VectorKind::Input, input.len())?;
        let output = self
            .weights
            .iter()
            .fold(Array1::from(input.to_vec()), |prev, matrix| {
                matrix.mul_vec(&prev).mapv_into(logistic)
            });
        Ok(output.to_vec())
    }

    /// Moves the weights one gradient step towards producing `target` for `input`.
    ///
    /// The output error `target - output` is propagated back through the
    /// transposed weight matrices, all from the weights as they were before
    /// this call. Each matrix `k` then receives
    /// `learning_rate · (errorₖ ⊙ outₖ ⊙ (1 − outₖ)) · inₖᵗ`.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<(), NetworkError> {
        self.check_len(VectorKind::Input, input.len())?;
        self.check_len(VectorKind::Target, target.len())?;

        let activations = self.forward(input);
        let output = &activations[self.weights.len()];
        let target = Array1::from(target.to_vec());

        // errors[k] is the error at the output side of weights[k]
        let mut error = &target - output;
        let mut errors = Vec::with_capacity(self.weights.len());
        for matrix in self.weights.iter().skip(1).rev() {
            let propagated = matrix.transpose_mul_vec(&error);
            errors.push(error);
            error = propagated;
        }
        errors.push(error);
        errors.reverse();

        let learning_rate = self.learning_rate;
        for (k, (matrix, error)) in self.weights.iter_mut().zip(&errors).enumerate() {
            let out = &activations[k + 1];
            let delta = error * out * &out.mapv(|y| 1.0 - y);
            matrix.add_scaled_outer(learning_rate, &delta, &activations[k]);
        }
        Ok(())
    }

    /// Returns `Σ (target - output)²` for the current weights.
    pub fn squared_error(&self, input: &[f64], target: &[f64]) -> Result<f64, NetworkError> {
        self.check_len(VectorKind::Target, target.len())?;
        let output = self.infer(input)?;
        Ok(output
            .iter()
            .zip(target)
            .map(|(o, t)| (t - o).powi(2))
            .sum())
    }

    /// Returns `true` if `other` has the same layer sizes.
    #[must_use]
    pub fn has_same_architecture(&self, other: &Self) -> bool {
        self.layer_sizes == other.layer_sizes
    }

    /// Activations of every layer, the input layer included.
    fn forward(&self, input: &[f64]) -> Vec<Array1<f64>> {
        let mut activations = Vec::with_capacity(self.layer_sizes.len());
        activations.push(Array1::from(input.to_vec()));
        for matrix in &self.weights {
            let next = matrix.mul_vec(&activations[activations.len() - 1]).mapv_into(logistic);
            activations.push(next);
        }
        activations
    }

    fn check_len(&self, kind: VectorKind, actual: usize) -> Result<(), NetworkError> {
        let expected = match kind {
            VectorKind::Input => self.input_len(),
            VectorKind::Target => self.output_len(),
        };
        if actual == expected {
            Ok(())
        } else {
            Err(NetworkError::DimensionMismatch {
                kind,
                expected,
                actual,
            })
        }
    }
}

fn validate_architecture(layer_sizes: &[usize]) -> Result<(), NetworkError> {
    if layer_sizes.len() < 2 || layer_sizes.contains(&0) {
        return Err(NetworkError::InvalidArchitecture {
            layer_sizes: layer_sizes.to_vec(),
        });
    }
    Ok(())
}

fn validate_learning_rate(rate: f64) -> Result<(), NetworkError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(NetworkError::InvalidLearningRate { rate })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_weight_shapes_follow_layer_sizes() {
        let mut rng = rng();
        for sizes in [vec![15, 6], vec![15, 50, 6], vec![3, 4, 5, 2], vec![1, 1, 1, 1, 1]] {
            let network = Network::random(&sizes, 0.3, &mut rng).unwrap();
            assert_eq!(network.weights().len(), sizes.len() - 1);
            for (k, matrix) in network.weights().iter().enumerate() {
                assert_eq!(matrix.shape(), (sizes[k + 1], sizes[k]));
            }
            assert_eq!(network.input_len(), sizes[0]);
            assert_eq!(network.output_len(), sizes[sizes.len() - 1]);
        }
    }

    #[test]
    fn test_invalid_architecture() {
        let mut rng = rng();
        for sizes in [vec![], vec![15], vec![15, 0, 6], vec![0, 6]] {
            let err = Network::random(&sizes, 0.5, &mut rng).unwrap_err();
            assert_eq!(err, NetworkError::InvalidArchitecture { layer_sizes: sizes });
        }
    }

    #[test]
    fn test_invalid_learning_rate() {
        let mut rng = rng();
        for rate in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let err = Network::random(&[2, 2], rate, &mut rng).unwrap_err();
            assert!(matches!(err, NetworkError::InvalidLearningRate { .. }), "{err}");
        }
    }

    #[test]
    fn test_default_learning_rate() {
        let network = Network::with_default_learning_rate(&[2, 2], &mut rng()).unwrap();
        assert!((network.learning_rate() - DEFAULT_LEARNING_RATE).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_weights_rejects_inconsistent_shapes() {
        let err = Network::from_weights(&[3, 2], 0.5, vec![]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::WeightCountMismatch {
                expected: 1,
                actual: 0
            }
        );

        let err = Network::from_weights(
            &[3, 4, 2],
            0.5,
            vec![WeightMatrix::filled(4, 3, 0.0), WeightMatrix::filled(4, 2, 0.0)],
        )
        .unwrap_err();
        assert_eq!(
            err,
            NetworkError::WeightShapeMismatch {
                index: 1,
                expected: (2, 4),
                actual: (4, 2)
            }
        );
    }

    #[test]
    fn test_infer_is_deterministic() {
        let network = Network::random(&[15, 20, 6], 0.5, &mut rng()).unwrap();
        let input: Vec<f64> = (0..15).map(f64::from).collect();
        let first = network.infer(&input).unwrap();
        let second = network.infer(&input).unwrap();
        assert_eq!(first.len(), 6);
        assert!(first.iter().zip(&second).all(|(a, b)| a.to_bits() == b.to_bits()));
        assert!(first.iter().all(|&y| 0.0 < y && y < 1.0));
    }

    #[test]
    fn test_zero_weights_give_half() {
        let network = Network::from_weights(
            &[2, 3, 1],
            0.5,
            vec![WeightMatrix::filled(3, 2, 0.0), WeightMatrix::filled(1, 3, 0.0)],
        )
        .unwrap();
        assert_eq!(network.infer(&[4.0, -2.0]).unwrap(), vec![0.5]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut network = Network::random(&[15, 50, 6], 0.5, &mut rng()).unwrap();
        let err = network.infer(&[0.0; 14]).unwrap_err();
        assert_eq!(
            err,
            NetworkError::DimensionMismatch {
                kind: VectorKind::Input,
                expected: 15,
                actual: 14
            }
        );

        let before = network.clone();
        assert!(matches!(
            network.train(&[0.0; 14], &[0.0; 6]),
            Err(NetworkError::DimensionMismatch {
                kind: VectorKind::Input,
                ..
            })
        ));
        assert!(matches!(
            network.train(&[0.0; 15], &[0.0; 5]),
            Err(NetworkError::DimensionMismatch {
                kind: VectorKind::Target,
                ..
            })
        ));
        assert_eq!(network, before, "failed calls must not touch the weights");
    }

    #[test]
    fn test_single_weight_delta_rule() {
        let mut network =
            Network::from_weights(&[1, 1], 0.5, vec![WeightMatrix::filled(1, 1, 0.0)]).unwrap();
        network.train(&[1.0], &[1.0]).unwrap();
        // output 0.5, error 0.5, slope 0.25: w += 0.5 * 0.5 * 0.25 * 1.0
        let w = network.weights()[0].get(0, 0).unwrap();
        assert!((w - 0.0625).abs() < 1e-12, "{w}");
    }

    /// Loop-based backpropagation written independently of the matrix code.
    fn reference_train(layer_sizes: &[usize], weights: &mut [Vec<Vec<f64>>], lr: f64, input: &[f64], target: &[f64]) {
        let mut activations = vec![input.to_vec()];
        for w in weights.iter() {
            let prev = &activations[activations.len() - 1];
            let next = w
                .iter()
                .map(|row| logistic(row.iter().zip(prev).map(|(a, b)| a * b).sum()))
                .collect();
            activations.push(next);
        }
        let layers = weights.len();
        let mut errors = vec![Vec::new(); layers];
        errors[layers - 1] = target
            .iter()
            .zip(&activations[layers])
            .map(|(t, o)| t - o)
            .collect();
        for k in (0..layers - 1).rev() {
            errors[k] = (0..layer_sizes[k + 1])
                .map(|j| {
                    (0..layer_sizes[k + 2])
                        .map(|i| weights[k + 1][i][j] * errors[k + 1][i])
                        .sum()
                })
                .collect();
        }
        for k in 0..layers {
            for i in 0..layer_sizes[k + 1] {
                let y = activations[k + 1][i];
                let delta = errors[k][i] * y * (1.0 - y);
                for j in 0..layer_sizes[k] {
                    weights[k][i][j] += lr * delta * activations[k][j];
                }
            }
        }
    }

    #[test]
    fn test_train_matches_reference_backpropagation() {
        let sizes = [2, 3, 3, 2];
        let mut network = Network::random(&sizes, 0.4, &mut rng()).unwrap();
        let mut reference: Vec<Vec<Vec<f64>>> = network
            .weights()
            .iter()
            .map(|m| {
                (0..m.rows())
                    .map(|r| (0..m.cols()).map(|c| m.get(r, c).unwrap()).collect())
                    .collect()
            })
            .collect();

        let samples = [([0.3, -0.8], [0.9, 0.1]), ([1.0, 0.5], [0.2, 0.6])];
        for (input, target) in samples.iter().cycle().take(6) {
            network.train(input, target).unwrap();
            reference_train(&sizes, &mut reference, 0.4, input, target);
        }

        for (matrix, expected) in network.weights().iter().zip(&reference) {
            for (r, row) in expected.iter().enumerate() {
                for (c, w) in row.iter().enumerate() {
                    let actual = matrix.get(r, c).unwrap();
                    assert!((actual - w).abs() < 1e-12, "({r}, {c}): {actual} != {w}");
                }
            }
        }
    }

    #[test]
    fn test_repeated_training_reduces_error() {
        let mut network = Network::random(&[3, 4, 2], 0.5, &mut rng()).unwrap();
        let input = [0.5, -0.3, 0.9];
        let target = [0.7, 0.2];
        let initial = network.squared_error(&input, &target).unwrap();
        assert!(initial > 0.0);
        for _ in 0..200 {
            network.train(&input, &target).unwrap();
        }
        let trained = network.squared_error(&input, &target).unwrap();
        assert!(trained <= initial * 0.1, "initial {initial}, trained {trained}");
    }

    #[test]
    fn test_weights_mut_visits_every_weight() {
        let mut network = Network::random(&[4, 3, 2], 0.5, &mut rng()).unwrap();
        assert_eq!(network.weight_count(), 4 * 3 + 3 * 2);
        for w in network.weights_mut() {
            *w = 1.0;
        }
        assert!(network.weights().iter().all(|m| m.iter().all(|w| w == 1.0)));
        assert_eq!(network.weights()[1].shape(), (2, 3));
    }
}
