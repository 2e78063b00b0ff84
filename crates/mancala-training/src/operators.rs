//! Genetic operators on network weights.
//!
//! These operators treat a [`Network`] as a flat vector of weights in layer
//! order, then row-major within each layer. They are used by
//! [`genetic::recombine`](crate::genetic::recombine) to build the child pool.
//!
//! # Operations
//!
//! - **Recombination**: [`whole_arithmetic_recombination`] blends two parents
//! - **Mutation**: [`uniform_reset_mutation`] replaces individual weights
//!
//! # Design Decisions
//!
//! ## Whole Arithmetic Recombination
//!
//! Every child weight is the same affine blend `α·a + (1-α)·b` of the parents'
//! weights at that position. It is deterministic: randomness in the child pool
//! comes only from parent selection and mutation. With `α = 0.7` the child
//! stays close to its first parent.
//!
//! ## Uniform-Reset Mutation
//!
//! A mutated weight is replaced by a fresh draw from `U[0, 1)`, not perturbed.
//! Initial weights are normally distributed around zero, so mutation only ever
//! introduces non-negative weights. This asymmetry is kept on purpose; the
//! search is tuned around it.

use mancala_nn::{Network, WeightMatrix};
use rand::Rng;

use crate::{ConfigurationError, params::check_probability};

/// Weight of the first parent in [`whole_arithmetic_recombination`] unless configured otherwise.
pub const WHOLE_ARITHMETIC_ALPHA: f64 = 0.7;

/// Blends two parents weight by weight: `child = alpha·a + (1-alpha)·b`.
///
/// The child takes the learning rate of `a`.
///
/// # Examples
///
/// ```
/// use mancala_nn::{Network, WeightMatrix};
/// use mancala_training::operators::whole_arithmetic_recombination;
///
/// let a = Network::from_weights(&[2, 1], 0.5, vec![WeightMatrix::filled(1, 2, 1.0)]).unwrap();
/// let b = Network::from_weights(&[2, 1], 0.5, vec![WeightMatrix::filled(1, 2, 0.0)]).unwrap();
/// let child = whole_arithmetic_recombination(&a, &b, 0.7).unwrap();
/// assert!(child.weights()[0].iter().all(|w| (w - 0.7).abs() < 1e-12));
/// ```
pub fn whole_arithmetic_recombination(
    a: &Network,
    b: &Network,
    alpha: f64,
) -> Result<Network, ConfigurationError> {
    if !a.has_same_architecture(b) {
        return Err(ConfigurationError::ArchitectureMismatch {
            left: a.layer_sizes().to_vec(),
            right: b.layer_sizes().to_vec(),
        });
    }
    let mut child = a.clone();
    let others = b.weights().iter().flat_map(WeightMatrix::iter);
    for (weight, other) in child.weights_mut().zip(others) {
        *weight = alpha * *weight + (1.0 - alpha) * other;
    }
    Ok(child)
}

/// Replaces each weight, independently with `probability`, by a draw from `U[0, 1)`.
///
/// Returns the number of weights replaced.
pub fn uniform_reset_mutation<R>(
    network: &mut Network,
    probability: f64,
    rng: &mut R,
) -> Result<usize, ConfigurationError>
where
    R: Rng + ?Sized,
{
    check_probability("mutation probability", "[0, 1]", probability, |p| {
        (0.0..=1.0).contains(&p)
    })?;
    let mut replaced = 0;
    for weight in network.weights_mut() {
        if rng.random_bool(probability) {
            *weight = rng.random::<f64>();
            replaced += 1;
        }
    }
    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    const LAYERS: [usize; 3] = [15, 8, 6];

    fn constant_network(value: f64) -> Network {
        let weights = LAYERS
            .windows(2)
            .map(|w| WeightMatrix::filled(w[1], w[0], value))
            .collect();
        Network::from_weights(&LAYERS, 0.5, weights).unwrap()
    }

    mod recombination {
        use super::*;

        #[test]
        fn test_blends_constant_parents() {
            let (a, b) = (2.0, -1.0);
            let child = whole_arithmetic_recombination(&constant_network(a), &constant_network(b), 0.7).unwrap();
            let expected = 0.7 * a + (1.0 - 0.7) * b;
            assert_eq!(child.layer_sizes(), &LAYERS);
            for matrix in child.weights() {
                assert!(matrix.iter().all(|w| (w - expected).abs() < 1e-12));
            }
        }

        #[test]
        fn test_is_positionwise() {
            let mut rng = Pcg32::seed_from_u64(3);
            let a = Network::random(&LAYERS, 0.3, &mut rng).unwrap();
            let b = Network::random(&LAYERS, 0.5, &mut rng).unwrap();
            let child = whole_arithmetic_recombination(&a, &b, 0.25).unwrap();

            let flat = |n: &Network| n.weights().iter().flat_map(WeightMatrix::iter).collect::<Vec<_>>();
            for ((c, x), y) in flat(&child).into_iter().zip(flat(&a)).zip(flat(&b)) {
                assert!((c - (0.25 * x + 0.75 * y)).abs() < 1e-12);
            }
            assert!((child.learning_rate() - 0.3).abs() < f64::EPSILON);
        }

        #[test]
        fn test_rejects_mismatched_parents() {
            let mut rng = Pcg32::seed_from_u64(4);
            let a = Network::random(&[15, 8, 6], 0.5, &mut rng).unwrap();
            let b = Network::random(&[15, 9, 6], 0.5, &mut rng).unwrap();
            assert_eq!(
                whole_arithmetic_recombination(&a, &b, 0.7).unwrap_err(),
                ConfigurationError::ArchitectureMismatch {
                    left: vec![15, 8, 6],
                    right: vec![15, 9, 6]
                }
            );
        }
    }

    mod mutation {
        use super::*;

        #[test]
        fn test_certain_mutation_resets_every_weight() {
            let mut network = constant_network(-3.0);
            let replaced = uniform_reset_mutation(&mut network, 1.0, &mut Pcg32::seed_from_u64(5)).unwrap();
            assert_eq!(replaced, network.weight_count());
            for matrix in network.weights() {
                assert!(matrix.iter().all(|w| (0.0..1.0).contains(&w)));
            }
        }

        #[test]
        fn test_zero_probability_changes_nothing() {
            let original = Network::random(&LAYERS, 0.5, &mut Pcg32::seed_from_u64(6)).unwrap();
            let mut network = original.clone();
            assert_eq!(uniform_reset_mutation(&mut network, 0.0, &mut Pcg32::seed_from_u64(7)), Ok(0));
            assert_eq!(network, original);
        }

        #[test]
        fn test_probability_outside_unit_interval_is_rejected() {
            let original = constant_network(0.5);
            for probability in [1.5, -0.1, f64::NAN] {
                let mut network = original.clone();
                let err = uniform_reset_mutation(&mut network, probability, &mut Pcg32::seed_from_u64(2)).unwrap_err();
                assert!(matches!(
                    err,
                    ConfigurationError::ProbabilityOutOfRange {
                        name: "mutation probability",
                        ..
                    }
                ));
                assert_eq!(network, original);
            }
        }

        #[test]
        fn test_partial_mutation_rate() {
            let mut network = constant_network(-1.0);
            let replaced = uniform_reset_mutation(&mut network, 0.5, &mut Pcg32::seed_from_u64(8)).unwrap();
            let total = network.weight_count();
            // 168 weights at p = 0.5
            assert!(replaced > total / 4 && replaced < total * 3 / 4, "{replaced} of {total}");
            let reset = network
                .weights()
                .iter()
                .flat_map(WeightMatrix::iter)
                .filter(|&w| w >= 0.0)
                .count();
            assert_eq!(reset, replaced);
        }
    }
}
