// Per-cycle cost of the APU with every emulated channel sounding

use core_lib::apu::{
    SND_CHN_ADDR, SQ1_HI_ADDR, SQ1_LO_ADDR, SQ1_VOL_ADDR, SQ2_HI_ADDR, SQ2_LO_ADDR, SQ2_SWEEP_ADDR,
    SQ2_VOL_ADDR, TRI_HI_ADDR, TRI_LINEAR_ADDR, TRI_LO_ADDR,
};
use core_lib::{Apu, RegisterLog};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sounding_apu() -> Apu {
    let mut apu = Apu::new();
    apu.write(SND_CHN_ADDR, 0x07);
    apu.write(SQ1_VOL_ADDR, 0xBF);
    apu.write(SQ1_LO_ADDR, 0xFD);
    apu.write(SQ1_HI_ADDR, 0x08);
    apu.write(SQ2_VOL_ADDR, 0x84);
    apu.write(SQ2_SWEEP_ADDR, 0xA9);
    apu.write(SQ2_LO_ADDR, 0x80);
    apu.write(SQ2_HI_ADDR, 0x09);
    apu.write(TRI_LINEAR_ADDR, 0xFF);
    apu.write(TRI_LO_ADDR, 0x40);
    apu.write(TRI_HI_ADDR, 0x08);
    apu
}

fn apu_tick_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("APU ticking");
    group.sample_size(50);

    group.bench_function("tick_single_cycle", |b| {
        let mut apu = sounding_apu();
        b.iter(|| {
            apu.tick();
            black_box(apu.sample_ready())
        });
    });

    group.bench_function("run_one_frame", |b| {
        let mut apu = sounding_apu();
        b.iter(|| {
            apu.run(black_box(29_830));
            black_box(apu.drain_samples().len())
        });
    });

    group.bench_function("register_write", |b| {
        let mut apu = sounding_apu();
        b.iter(|| {
            apu.write(black_box(SQ1_HI_ADDR), black_box(0x08));
            black_box(apu.read(SND_CHN_ADDR))
        });
    });

    group.bench_function("replay_log", |b| {
        let log = RegisterLog::parse("0 $4015 $07\n0 $4000 $BF\n0 $4002 $FD\n0 $4003 $08")
            .unwrap_or_default();
        b.iter(|| {
            let mut apu = Apu::new();
            black_box(log.replay(&mut apu, 29_830))
        });
    });

    group.finish();
}

criterion_group!(benches, apu_tick_benchmark);
criterion_main!(benches);
