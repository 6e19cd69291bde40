//! # spk-model - Residual Network Blocks for the Speaker Embedding Model
//!
//! Reusable building blocks for assembling deep residual speaker-recognition
//! models on top of the candle tensor stack.
//!
//! ## Modules
//!
//! - **conv**: 3×3 and 1×1 convolution constructors (no bias)
//! - **norm**: selectable normalization layer (batch norm, group norm)
//! - **activation**: selectable activation functions
//! - **block**: `BasicBlock` and `Bottleneck` residual blocks with an
//!   automatic projection shortcut when the main path changes shape

pub mod error;
pub use error::{ModelError, Result};

pub mod activation;
pub use activation::*;

pub mod norm;
pub use norm::*;

pub mod conv;
pub use conv::*;

pub mod block;
pub use block::*;

/// Prelude module with common re-exports
pub mod prelude {
    pub use crate::error::{ModelError, Result};
    pub use crate::activation::Activation;
    pub use crate::norm::{Norm, NormKind};
    pub use crate::conv::{conv1x1, conv3x3};
    pub use crate::block::{
        BasicBlock, BasicBlockConfig, Bottleneck, BottleneckConfig, Downsample,
    };
}
