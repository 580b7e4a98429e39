// Integration tests for the APU driven purely through its bus interface
// Every scenario starts from power-on and only uses register writes and ticks.

use anyhow::Result;
use core_lib::apu::{
    FRAME_COUNTER_ADDR, SND_CHN_ADDR, SQ1_HI_ADDR, SQ1_LO_ADDR, SQ1_VOL_ADDR, SQ2_HI_ADDR,
    SQ2_LO_ADDR, SQ2_SWEEP_ADDR, SQ2_VOL_ADDR,
};
use core_lib::{Apu, ApuConfig, ChannelFlags, Region, RegisterLog};
use pretty_assertions::assert_eq;

/// Square 1 at ~440 Hz, constant volume 15, length index 1 (254 half-frames)
fn start_tone(apu: &mut Apu) {
    apu.write(SND_CHN_ADDR, 0x01);
    apu.write(SQ1_VOL_ADDR, 0x9F);
    apu.write(SQ1_LO_ADDR, 0xFD);
    apu.write(SQ1_HI_ADDR, 0x08);
}

/// Tick until square 1's length counter has dropped `count` times, returning the cycles it dropped on
fn length_decrements(apu: &mut Apu, count: usize) -> Vec<u64> {
    let mut cycles = Vec::new();
    let mut last = apu.square1.length.counter;
    while cycles.len() < count {
        apu.tick();
        let now = apu.square1.length.counter;
        if now < last {
            cycles.push(apu.cycles());
        }
        last = now;
    }
    cycles
}

#[test]
fn length_counter_expires_after_table_value() {
    let mut apu = Apu::new();
    start_tone(&mut apu);
    assert_eq!(apu.square1.length.counter, 254);

    // 254 half-frames = 127 four-step frames; the last one lands on step 4 of frame 126
    let expiry = 126 * 29_830 + 29_829;
    apu.run(expiry - 1);
    assert_eq!(apu.square1.length.counter, 1);
    assert_eq!(apu.read(SND_CHN_ADDR), 0x01);

    apu.tick();
    assert_eq!(apu.square1.length.counter, 0);
    assert_eq!(apu.read(SND_CHN_ADDR), 0x00);
    for _ in 0..10_000 {
        apu.tick();
        assert_eq!(apu.square1.output(), 0);
    }

    // Configuration survived; a reload write brings the tone back
    assert_eq!(apu.square1.timer_period, 0xFD);
    apu.write(SQ1_HI_ADDR, 0x08);
    assert_eq!(apu.read(SND_CHN_ADDR), 0x01);
}

#[test]
fn five_step_mode_stretches_half_frames() {
    let mut four = Apu::new();
    start_tone(&mut four);
    four.write(SQ1_VOL_ADDR, 0x10);
    let four_step = length_decrements(&mut four, 3);

    let mut five = Apu::new();
    start_tone(&mut five);
    five.write(SQ1_VOL_ADDR, 0x10);
    five.write(FRAME_COUNTER_ADDR, 0x80);
    // The $4017 write clocked a half-frame on its own
    assert_eq!(five.square1.length.counter, 253);
    let five_step = length_decrements(&mut five, 3);

    assert_eq!(four_step, vec![14_913, 29_829, 44_743]);
    assert_eq!(five_step, vec![14_913, 37_281, 52_195]);
    assert_eq!(four_step[1] - four_step[0], 14_916);
    assert_eq!(five_step[1] - five_step[0], 22_368);
}

#[test]
fn pal_timing_uses_pal_steps() -> Result<()> {
    let mut apu = Apu::with_config(ApuConfig::new(Region::Pal, 48_000))?;
    start_tone(&mut apu);
    let decrements = length_decrements(&mut apu, 2);
    assert_eq!(decrements, vec![16_627, 33_253]);
    Ok(())
}

#[test]
fn halted_length_counter_holds() {
    let mut apu = Apu::new();
    start_tone(&mut apu);
    apu.write(SQ1_VOL_ADDR, 0x3F);
    apu.run(29_830 * 4);
    assert_eq!(apu.square1.length.counter, 254);
}

#[test]
fn sweep_overflow_mutes_one_channel() {
    let mut apu = Apu::new();
    start_tone(&mut apu);
    apu.write(SND_CHN_ADDR, 0x03);
    apu.write(SQ2_VOL_ADDR, 0x9F);
    apu.write(SQ2_LO_ADDR, 0x00);
    apu.write(SQ2_HI_ADDR, 0x0A); // period 0x200, length 254
    apu.write(SQ2_SWEEP_ADDR, 0x81); // enabled, divider 0, shift 1

    apu.run(29_830 * 2);
    assert!(apu.square2.is_muted());
    assert!(!apu.square1.is_muted());
    assert_eq!(apu.status(), ChannelFlags::SQUARE1 | ChannelFlags::SQUARE2);
    let square1_heard = (0..5_000).any(|_| {
        apu.tick();
        apu.square1.output() > 0
    });
    assert!(square1_heard);
    assert_eq!(apu.square2.output(), 0);
}

#[test]
fn envelope_decays_through_quarter_frames() {
    let mut apu = Apu::new();
    apu.write(SND_CHN_ADDR, 0x01);
    apu.write(SQ1_VOL_ADDR, 0x80); // envelope mode, divider period 0, no loop
    apu.write(SQ1_LO_ADDR, 0xFD);
    apu.write(SQ1_HI_ADDR, 0x08);

    apu.run(7_457);
    assert_eq!(apu.square1.envelope.decay(), 15);
    // Period 0: one decay step per quarter-frame, four per 4-step frame
    apu.run(29_830 * 3);
    assert_eq!(apu.square1.envelope.decay(), 3);
    apu.run(29_830 * 2);
    assert_eq!(apu.square1.envelope.decay(), 0);
}

#[test]
fn samples_follow_the_configured_rate() -> Result<()> {
    let mut apu = Apu::with_config(ApuConfig::new(Region::Ntsc, 44_100))?;
    start_tone(&mut apu);
    apu.run(u64::from(Region::Ntsc.cpu_clock()));
    let samples = apu.drain_samples();
    assert_eq!(samples.len(), 44_100);
    assert!(samples.iter().any(|&s| s > 0.0));
    assert!(samples.iter().all(|&s| (0.0..1.0).contains(&s)));
    Ok(())
}

#[test]
fn identical_logs_replay_identically() -> Result<()> {
    let text = "\
0 $4015 $0F
0 $4000 $B4
0 $4001 $A3
0 $4002 $40
0 $4003 $21
700 $4008 $C0
700 $400A $80
700 $400B $10
9000 $4017 $80
12000 $4015 $05
";
    let log: RegisterLog = text.parse()?;
    let mut first = Apu::new();
    let mut second = Apu::new();
    let a = log.replay(&mut first, 100_000);
    let b = log.replay(&mut second, 100_000);
    assert_eq!(a, b);
    assert_eq!(first.snapshot(), second.snapshot());
    Ok(())
}
