//! # Normalization Layers
//!
//! Selectable per-channel normalization for the residual blocks. Batch norm
//! is the default, matching the reference speaker model; group norm is the
//! usual alternative when batch statistics are unreliable (small batches).

use candle_core::Tensor;
use candle_nn::{BatchNorm, GroupNorm, Module, ModuleT, VarBuilder, batch_norm, group_norm};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Epsilon added to the variance for numerical stability.
pub const NORM_EPS: f64 = 1e-5;

/// Which normalization family a block should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormKind {
    /// Batch normalization over (N, H, W) per channel
    #[default]
    Batch,
    /// Group normalization with the given number of channel groups
    Group { groups: usize },
}

/// A constructed normalization layer.
///
/// Batch norm behaves differently in training (batch statistics) and
/// inference (running statistics), so forwarding takes a `train` flag.
#[derive(Debug, Clone)]
pub enum Norm {
    Batch(BatchNorm),
    Group(GroupNorm),
}

impl Norm {
    /// Build a normalization layer over `num_features` channels.
    pub fn new(kind: NormKind, num_features: usize, vb: VarBuilder) -> Result<Self> {
        match kind {
            NormKind::Batch => Ok(Self::Batch(batch_norm(num_features, NORM_EPS, vb)?)),
            NormKind::Group { groups } => {
                if groups == 0 || num_features % groups != 0 {
                    return Err(ModelError::InvalidConfig(format!(
                        "group norm needs groups > 0 dividing {num_features}, got {groups}"
                    )));
                }
                Ok(Self::Group(group_norm(groups, num_features, NORM_EPS, vb)?))
            }
        }
    }

    /// Normalize `xs`, shaped (N, C, H, W).
    pub fn forward(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        match self {
            Self::Batch(bn) => Ok(bn.forward_t(xs, train)?),
            Self::Group(gn) => Ok(gn.forward(xs)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::{DType, Device, Tensor};
    use candle_nn::VarMap;

    fn vb(varmap: &VarMap) -> VarBuilder<'_> {
        VarBuilder::from_varmap(varmap, DType::F32, &Device::Cpu)
    }

    #[test]
    fn test_batch_norm_preserves_shape() {
        let varmap = VarMap::new();
        let norm = Norm::new(NormKind::Batch, 8, vb(&varmap)).unwrap();
        let xs = Tensor::randn(0f32, 1f32, (2, 8, 4, 4), &Device::Cpu).unwrap();

        let out = norm.forward(&xs, false).unwrap();
        assert_eq!(out.dims(), &[2, 8, 4, 4]);
        let out = norm.forward(&xs, true).unwrap();
        assert_eq!(out.dims(), &[2, 8, 4, 4]);
    }

    #[test]
    fn test_group_norm_preserves_shape() {
        let varmap = VarMap::new();
        let norm = Norm::new(NormKind::Group { groups: 4 }, 8, vb(&varmap)).unwrap();
        let xs = Tensor::randn(0f32, 1f32, (2, 8, 4, 4), &Device::Cpu).unwrap();

        let out = norm.forward(&xs, false).unwrap();
        assert_eq!(out.dims(), &[2, 8, 4, 4]);
    }

    #[test]
    fn test_group_norm_rejects_bad_groups() {
        let varmap = VarMap::new();
        assert!(Norm::new(NormKind::Group { groups: 0 }, 8, vb(&varmap)).is_err());
        assert!(Norm::new(NormKind::Group { groups: 3 }, 8, vb(&varmap)).is_err());
    }

    #[test]
    fn test_norm_kind_serde() {
        let json = serde_json::to_string(&NormKind::Group { groups: 4 }).unwrap();
        let back: NormKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NormKind::Group { groups: 4 });
    }
}
