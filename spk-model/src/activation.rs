//! # Activation Functions
//!
//! Selectable non-linearities for the residual blocks. The block configs
//! store the choice; the heavy lifting is delegated to candle ops.

use candle_core::Tensor;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Activation function applied inside and after a residual block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    /// Rectified Linear Unit: max(0, x)
    #[default]
    Relu,
    /// Leaky ReLU with slope 0.01 on the negative side
    LeakyRelu,
    /// SiLU / Swish: x * sigmoid(x)
    Silu,
    /// Gaussian Error Linear Unit
    Gelu,
}

impl Activation {
    /// Apply the activation element-wise.
    pub fn forward(&self, xs: &Tensor) -> Result<Tensor> {
        let out = match self {
            Self::Relu => xs.relu(),
            Self::LeakyRelu => candle_nn::ops::leaky_relu(xs, 0.01),
            Self::Silu => candle_nn::ops::silu(xs),
            Self::Gelu => xs.gelu(),
        };
        Ok(out?)
    }
}
