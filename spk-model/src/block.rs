//! # Residual Blocks
//!
//! The two residual block variants the speaker embedding model is assembled
//! from, following the standard construction:
//!
//! - `BasicBlock`: 3×3 conv → norm → act → 3×3 conv → norm, plus skip
//! - `Bottleneck`: 1×1 reduce → 3×3 → 1×1 restore, norm after each conv,
//!   plus skip
//!
//! Both add the (possibly projected) input to the main path and apply the
//! activation once more after the addition. The projection shortcut is built
//! automatically when the main path changes the tensor shape, i.e. when
//! `stride != 1` or the input channel count differs from
//! `planes * EXPANSION`.
//!
//! Variable names under the builder (`conv1`, `bn1`, ..., `downsample.0`,
//! `downsample.1`) match the reference checkpoints so pretrained weights
//! load without remapping.

use candle_core::Tensor;
use candle_nn::{Conv2d, Module, VarBuilder};
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::conv::{conv1x1, conv3x3};
use crate::error::{ModelError, Result};
use crate::norm::{Norm, NormKind};

/// Construction parameters for [`BasicBlock`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicBlockConfig {
    /// Input channel count
    pub inplanes: usize,
    /// Base channel count of the block
    pub planes: usize,
    /// Stride of the first convolution
    pub stride: usize,
    /// Accepted for interface parity; the basic block only supports 1
    pub dilation: usize,
    /// Normalization family
    pub norm: NormKind,
    /// Activation function
    pub activation: Activation,
}

impl Default for BasicBlockConfig {
    fn default() -> Self {
        Self {
            inplanes: 64,
            planes: 64,
            stride: 1,
            dilation: 1,
            norm: NormKind::default(),
            activation: Activation::default(),
        }
    }
}

impl BasicBlockConfig {
    /// Config with the given channel counts and reference defaults for the
    /// rest.
    pub fn new(inplanes: usize, planes: usize) -> Self {
        Self {
            inplanes,
            planes,
            ..Default::default()
        }
    }
}

/// Construction parameters for [`Bottleneck`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleneckConfig {
    /// Input channel count
    pub inplanes: usize,
    /// Base channel count; the block outputs `planes * 4`
    pub planes: usize,
    /// Stride of the central 3×3 convolution
    pub stride: usize,
    /// Channel groups of the central 3×3 convolution
    pub groups: usize,
    /// Width multiplier reference; inner width is
    /// `planes * base_width / 64 * groups`
    pub base_width: usize,
    /// Dilation of the central 3×3 convolution
    pub dilation: usize,
    /// Normalization family
    pub norm: NormKind,
    /// Activation function
    pub activation: Activation,
}

impl Default for BottleneckConfig {
    fn default() -> Self {
        Self {
            inplanes: 64,
            planes: 64,
            stride: 1,
            groups: 1,
            base_width: 64,
            dilation: 1,
            norm: NormKind::default(),
            activation: Activation::default(),
        }
    }
}

impl BottleneckConfig {
    /// Config with the given channel counts and reference defaults for the
    /// rest.
    pub fn new(inplanes: usize, planes: usize) -> Self {
        Self {
            inplanes,
            planes,
            ..Default::default()
        }
    }

    /// Inner width of the bottleneck.
    pub fn width(&self) -> usize {
        self.planes * self.base_width / 64 * self.groups
    }
}

/// Projection shortcut: strided 1×1 convolution followed by normalization.
///
/// Applied to the identity path when the main path changes the tensor shape.
#[derive(Debug, Clone)]
pub struct Downsample {
    conv: Conv2d,
    norm: Norm,
}

impl Downsample {
    /// Build a projection from `inplanes` to `out_planes` channels.
    pub fn new(
        inplanes: usize,
        out_planes: usize,
        stride: usize,
        norm: NormKind,
        vb: VarBuilder,
    ) -> Result<Self> {
        Ok(Self {
            conv: conv1x1(inplanes, out_planes, stride, vb.pp("0"))?,
            norm: Norm::new(norm, out_planes, vb.pp("1"))?,
        })
    }

    pub fn forward(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let out = self.conv.forward(xs)?;
        self.norm.forward(&out, train)
    }
}

fn needs_projection(inplanes: usize, out_planes: usize, stride: usize) -> bool {
    stride != 1 || inplanes != out_planes
}

fn check_planes(inplanes: usize, planes: usize) -> Result<()> {
    if inplanes == 0 || planes == 0 {
        return Err(ModelError::InvalidConfig(format!(
            "channel counts must be non-zero, got inplanes={inplanes} planes={planes}"
        )));
    }
    Ok(())
}

/// Standard residual block with two 3×3 convolutions.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    conv1: Conv2d,
    bn1: Norm,
    conv2: Conv2d,
    bn2: Norm,
    act: Activation,
    downsample: Option<Downsample>,
    planes: usize,
}

impl BasicBlock {
    /// Channel expansion factor of the block.
    pub const EXPANSION: usize = 1;

    /// Build a basic block under the given variable builder.
    pub fn new(cfg: &BasicBlockConfig, vb: VarBuilder) -> Result<Self> {
        check_planes(cfg.inplanes, cfg.planes)?;
        if cfg.dilation != 1 {
            return Err(ModelError::InvalidConfig(format!(
                "basic block only supports dilation 1, got {}",
                cfg.dilation
            )));
        }

        let out_planes = cfg.planes * Self::EXPANSION;
        // conv1 and the shortcut both downsample when stride != 1
        let downsample = if needs_projection(cfg.inplanes, out_planes, cfg.stride) {
            Some(Downsample::new(
                cfg.inplanes,
                out_planes,
                cfg.stride,
                cfg.norm,
                vb.pp("downsample"),
            )?)
        } else {
            None
        };

        tracing::debug!(
            inplanes = cfg.inplanes,
            planes = cfg.planes,
            stride = cfg.stride,
            projected = downsample.is_some(),
            "building basic block"
        );

        Ok(Self {
            conv1: conv3x3(cfg.inplanes, cfg.planes, cfg.stride, 1, 1, vb.pp("conv1"))?,
            bn1: Norm::new(cfg.norm, cfg.planes, vb.pp("bn1"))?,
            conv2: conv3x3(cfg.planes, cfg.planes, 1, 1, 1, vb.pp("conv2"))?,
            bn2: Norm::new(cfg.norm, cfg.planes, vb.pp("bn2"))?,
            act: cfg.activation,
            downsample,
            planes: cfg.planes,
        })
    }

    /// Output channel count: `planes * EXPANSION`.
    pub fn out_planes(&self) -> usize {
        self.planes * Self::EXPANSION
    }

    /// Whether the identity path carries a projection shortcut.
    pub fn has_projection(&self) -> bool {
        self.downsample.is_some()
    }

    /// Forward pass over an (N, C, H, W) tensor.
    pub fn forward(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let out = self.conv1.forward(xs)?;
        let out = self.bn1.forward(&out, train)?;
        let out = self.act.forward(&out)?;

        let out = self.conv2.forward(&out)?;
        let out = self.bn2.forward(&out, train)?;

        let identity = match &self.downsample {
            Some(ds) => ds.forward(xs, train)?,
            None => xs.clone(),
        };

        let out = (out + identity)?;
        self.act.forward(&out)
    }
}

/// Bottleneck residual block: 1×1 reduce, 3×3 transform, 1×1 restore.
#[derive(Debug, Clone)]
pub struct Bottleneck {
    conv1: Conv2d,
    bn1: Norm,
    conv2: Conv2d,
    bn2: Norm,
    conv3: Conv2d,
    bn3: Norm,
    act: Activation,
    downsample: Option<Downsample>,
    planes: usize,
}

impl Bottleneck {
    /// Channel expansion factor of the block.
    pub const EXPANSION: usize = 4;

    /// Build a bottleneck block under the given variable builder.
    pub fn new(cfg: &BottleneckConfig, vb: VarBuilder) -> Result<Self> {
        check_planes(cfg.inplanes, cfg.planes)?;
        let width = cfg.width();
        if cfg.groups == 0 || width == 0 {
            return Err(ModelError::InvalidConfig(format!(
                "bottleneck width must be non-zero, got groups={} base_width={}",
                cfg.groups, cfg.base_width
            )));
        }

        let out_planes = cfg.planes * Self::EXPANSION;
        // conv2 and the shortcut both downsample when stride != 1
        let downsample = if needs_projection(cfg.inplanes, out_planes, cfg.stride) {
            Some(Downsample::new(
                cfg.inplanes,
                out_planes,
                cfg.stride,
                cfg.norm,
                vb.pp("downsample"),
            )?)
        } else {
            None
        };

        tracing::debug!(
            inplanes = cfg.inplanes,
            planes = cfg.planes,
            width,
            stride = cfg.stride,
            projected = downsample.is_some(),
            "building bottleneck block"
        );

        Ok(Self {
            conv1: conv1x1(cfg.inplanes, width, 1, vb.pp("conv1"))?,
            bn1: Norm::new(cfg.norm, width, vb.pp("bn1"))?,
            conv2: conv3x3(
                width,
                width,
                cfg.stride,
                cfg.groups,
                cfg.dilation,
                vb.pp("conv2"),
            )?,
            bn2: Norm::new(cfg.norm, width, vb.pp("bn2"))?,
            conv3: conv1x1(width, out_planes, 1, vb.pp("conv3"))?,
            bn3: Norm::new(cfg.norm, out_planes, vb.pp("bn3"))?,
            act: cfg.activation,
            downsample,
            planes: cfg.planes,
        })
    }

    /// Output channel count: `planes * EXPANSION`.
    pub fn out_planes(&self) -> usize {
        self.planes * Self::EXPANSION
    }

    /// Whether the identity path carries a projection shortcut.
    pub fn has_projection(&self) -> bool {
        self.downsample.is_some()
    }

    /// Forward pass over an (N, C, H, W) tensor.
    pub fn forward(&self, xs: &Tensor, train: bool) -> Result<Tensor> {
        let out = self.conv1.forward(xs)?;
        let out = self.bn1.forward(&out, train)?;
        let out = self.act.forward(&out)?;

        let out = self.conv2.forward(&out)?;
        let out = self.bn2.forward(&out, train)?;
        let out = self.act.forward(&out)?;

        let out = self.conv3.forward(&out)?;
        let out = self.bn3.forward(&out, train)?;

        let identity = match &self.downsample {
            Some(ds) => ds.forward(xs, train)?,
            None => xs.clone(),
        };

        let out = (out + identity)?;
        self.act.forward(&out)
    }
}
