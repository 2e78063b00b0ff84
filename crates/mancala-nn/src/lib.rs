//! Fully connected feed-forward network trained by backpropagation.
//!
//! A [`Network`] is described by its layer sizes: the first entry is the input
//! width, the last the output width, and every consecutive pair is joined by a
//! [`WeightMatrix`] of shape `(next, previous)`. All neurons use the logistic
//! activation and there are no bias terms.
//!
//! The network is used two ways:
//!
//! - **Online training** - repeated [`Network::train`] calls with
//!   `(input, target)` pairs nudge the weights along the error gradient.
//! - **Evolution** - the genetic operators in `mancala-training` read and
//!   rewrite the raw weights through [`Network::weights_mut`], which cannot
//!   change any matrix shape.
//!
//! # Example
//!
//! ```
//! use mancala_nn::Network;
//! use rand::SeedableRng as _;
//!
//! let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
//! let mut network = Network::random(&[3, 4, 2], 0.5, &mut rng).unwrap();
//!
//! let input = [0.5, -0.3, 0.9];
//! let target = [0.7, 0.2];
//! let before = network.squared_error(&input, &target).unwrap();
//! for _ in 0..50 {
//!     network.train(&input, &target).unwrap();
//! }
//! assert!(network.squared_error(&input, &target).unwrap() < before);
//! ```

pub use self::{matrix::*, network::*};

mod matrix;
mod network;

/// Which vector a [`NetworkError::DimensionMismatch`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum VectorKind {
    #[display("input")]
    Input,
    #[display("target")]
    Target,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum NetworkError {
    #[display("invalid architecture {layer_sizes:?}: need at least 2 layers, each of positive size")]
    InvalidArchitecture { layer_sizes: Vec<usize> },
    #[display("learning rate must be finite and positive, got {rate}")]
    InvalidLearningRate { rate: f64 },
    #[display("{kind} has {actual} values, but the network expects {expected}")]
    DimensionMismatch {
        kind: VectorKind,
        expected: usize,
        actual: usize,
    },
    #[display("expected {expected} weight matrices, got {actual}")]
    WeightCountMismatch { expected: usize, actual: usize },
    #[display("weight matrix {index} has shape {actual:?}, expected {expected:?}")]
    WeightShapeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
}
