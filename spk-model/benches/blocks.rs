//! Forward-pass throughput of the residual blocks.

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use criterion::{Criterion, criterion_group, criterion_main};
use spk_model::{BasicBlock, BasicBlockConfig, Bottleneck, BottleneckConfig};

fn bench_blocks(c: &mut Criterion) {
    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);

    let basic = BasicBlock::new(&BasicBlockConfig::new(64, 64), vb.pp("basic")).unwrap();
    let bottleneck = Bottleneck::new(&BottleneckConfig::new(64, 16), vb.pp("bottleneck")).unwrap();
    let xs = Tensor::randn(0f32, 1f32, (1, 64, 32, 32), &Device::Cpu).unwrap();

    c.bench_function("basic_block_forward", |b| {
        b.iter(|| basic.forward(&xs, false).unwrap())
    });

    c.bench_function("bottleneck_forward", |b| {
        b.iter(|| bottleneck.forward(&xs, false).unwrap())
    });
}

criterion_group!(benches, bench_blocks);
criterion_main!(benches);
