//! # Convolution Constructors
//!
//! The two convolution shapes a residual network is built from. Both are
//! bias-free, since a normalization layer with its own shift always follows.

use candle_nn::{Conv2d, Conv2dConfig, VarBuilder, conv2d_no_bias};

use crate::error::Result;

/// 3×3 convolution with padding.
///
/// Padding equals the dilation so the spatial size is preserved at stride 1.
pub fn conv3x3(
    in_planes: usize,
    out_planes: usize,
    stride: usize,
    groups: usize,
    dilation: usize,
    vb: VarBuilder,
) -> Result<Conv2d> {
    let cfg = Conv2dConfig {
        padding: dilation,
        stride,
        dilation,
        groups,
        ..Default::default()
    };
    Ok(conv2d_no_bias(in_planes, out_planes, 3, cfg, vb)?)
}

/// 1×1 convolution.
pub fn conv1x1(
    in_planes: usize,
    out_planes: usize,
    stride: usize,
    vb: VarBuilder,
) -> Result<Conv2d> {
    let cfg = Conv2dConfig {
        stride,
        ..Default::default()
    };
    Ok(conv2d_no_bias(in_planes, out_planes, 1, cfg, vb)?)
}
