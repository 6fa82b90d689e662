//! End-to-end scans against simulated lines

mod common;

use common::*;
use s88_core::config::toml::parse_config;
use s88_core::{DeviceRegistry, DeviceState, IoDevice};
use s88_drivers::s88::{phases_per_scan, Phase};
use s88_drivers::S88;
use s88_hal::PinMode;

#[test]
fn test_begin_configures_lines() {
    let s88 = started(200, 8, SimLines::constant(false));
    let lines = s88.gpio();

    assert_eq!(lines.mode(DATA), Some(PinMode::InputPullUp));
    assert_eq!(lines.mode(CLOCK), Some(PinMode::Output));
    assert_eq!(lines.mode(LOAD), Some(PinMode::Output));
    assert_eq!(lines.mode(RESET), Some(PinMode::Output));
    assert!(!lines.events.contains(&Event::Write(CLOCK, true)));
    assert!(!lines.events.iter().any(|e| matches!(e, Event::Read(..))));
}

#[test]
fn test_single_module_scan() {
    let mut s88 = started(200, 8, SimLines::scripted(bits("10110010")));
    let mut now = 0;

    assert_eq!(run_scan(&mut s88, &mut now), phases_per_scan(1));

    let read: Vec<bool> = (200..208).map(|vpin| s88.read(vpin)).collect();
    assert_eq!(read, bits("10110010"));
    assert_eq!(s88.buffer().as_slice(), &[0b0100_1101]);
}

#[test]
fn test_module_boundary() {
    // Bit 7 of module 0 high, bit 0 of module 1 low
    let mut s88 = started(300, 16, SimLines::scripted(bits("00000001 00000000")));
    let mut now = 0;
    run_scan(&mut s88, &mut now);

    assert!(s88.read(307));
    assert!(!s88.read(308));
    assert_eq!(s88.buffer().as_slice(), &[0x80, 0x00]);

    // And the other way round on the next scan
    s88.gpio_mut().push_script(bits("00000000 10000000"));
    run_scan(&mut s88, &mut now);

    assert!(!s88.read(307));
    assert!(s88.read(308));
    assert_eq!(s88.buffer().as_slice(), &[0x00, 0x01]);
}

#[test]
fn test_one_past_the_end_reads_false() {
    let mut s88 = started(50, 12, SimLines::constant(true));
    let mut now = 0;
    run_scan(&mut s88, &mut now);

    assert!(s88.read(61));
    assert!(!s88.read(62));
    assert!(!s88.read(49));
    // Pad bits were sampled high but stay hidden
    assert_eq!(s88.buffer().module(1), Some(0xFF));
}

#[test]
fn test_longest_chain_scan() {
    use s88_core::config::{MAX_MODULES, MAX_PINS};

    let mut s88 = started(1000, MAX_PINS, SimLines::constant(true));
    assert_eq!(s88.module_count(), MAX_MODULES);

    let mut now = 0;
    assert_eq!(run_scan(&mut s88, &mut now), phases_per_scan(MAX_MODULES));
    assert!((1000..1000 + MAX_PINS).all(|vpin| s88.read(vpin)));
    assert!(!s88.read(1000 + MAX_PINS));
    assert_eq!(s88.cursor(), (0, 0));
}

#[test]
fn test_no_advance_before_interval() {
    let mut s88 = started(0, 8, SimLines::constant(true));
    s88.gpio_mut().take_events();

    // The first step after begin runs idle phase 0 at once
    s88.step(0);
    assert_eq!(s88.phase_counter(), 1);
    assert!(s88.gpio().events.is_empty());

    for _ in 0..3 {
        for now in 1..INTERVAL {
            s88.step(now);
        }
    }

    assert_eq!(s88.phase_counter(), 1);
    assert!(s88.gpio().events.is_empty());

    s88.step(INTERVAL);
    assert_eq!(s88.phase_counter(), 2);
}

#[test]
fn test_lines_low_after_scan() {
    let mut s88 = started(0, 16, SimLines::constant(true));
    let mut now = 0;
    run_scan(&mut s88, &mut now);

    let lines = s88.gpio();
    assert!(!lines.level(CLOCK));
    assert!(!lines.level(LOAD));
    assert!(!lines.level(RESET));
    assert_eq!(
        &lines.events[lines.events.len() - 3..],
        &[
            Event::Write(LOAD, false),
            Event::Write(CLOCK, false),
            Event::Write(RESET, false)
        ]
    );
    assert_eq!(s88.phase(), Phase::Idle);
    assert_eq!(s88.cursor(), (0, 0));
}

#[test]
fn test_control_line_trace() {
    let data = bits("11010011");
    let mut s88 = started(0, 8, SimLines::scripted(data.clone()));
    s88.gpio_mut().take_events();

    let mut now = 0;
    let mut per_phase = Vec::new();
    for _ in 0..phases_per_scan(1) {
        now += INTERVAL;
        s88.step(now);
        per_phase.push(s88.gpio_mut().take_events());
    }

    let mut expected: Vec<Vec<Event>> = vec![Vec::new(); per_phase.len()];
    expected[3] = vec![Event::Write(LOAD, true)];
    expected[4] = vec![Event::Write(CLOCK, true)];
    expected[5] = vec![Event::Write(CLOCK, false), Event::Read(DATA, data[0])];
    expected[9] = vec![Event::Write(RESET, true)];
    expected[10] = vec![Event::Write(RESET, false)];
    expected[11] = vec![Event::Write(LOAD, false)];
    for (i, bit) in data.iter().enumerate().skip(1) {
        let clock = 12 + 2 * (i - 1);
        expected[clock] = vec![Event::Write(CLOCK, true)];
        expected[clock + 1] = vec![Event::Write(CLOCK, false), Event::Read(DATA, *bit)];
    }
    expected[25].extend([
        Event::Write(LOAD, false),
        Event::Write(CLOCK, false),
        Event::Write(RESET, false),
    ]);

    for (phase, (got, want)) in per_phase.iter().zip(expected.iter()).enumerate() {
        assert_eq!(got, want, "phase {}", phase);
    }
    assert_eq!(s88.scan_count(), 1);
}

#[test]
fn test_reads_keep_previous_scan_until_overwritten() {
    let mut s88 = started(0, 8, SimLines::constant(true));
    let mut now = 0;
    run_scan(&mut s88, &mut now);
    assert!((0..8).all(|vpin| s88.read(vpin)));

    s88.gpio_mut().set_idle_level(false);

    // Run up to and including the first sample of the next scan
    for _ in 0..6 {
        now += INTERVAL;
        s88.step(now);
    }
    assert_eq!(s88.cursor(), (0, 1));
    assert!(!s88.read(0));
    assert!((1..8).all(|vpin| s88.read(vpin)));

    run_scan(&mut s88, &mut now);
    assert!((0..8).all(|vpin| !s88.read(vpin)));
}

#[test]
fn test_timer_wraparound_mid_scan() {
    let mut s88 = started(0, 8, SimLines::constant(true));
    let mut now = u32::MAX - 10 * INTERVAL;
    s88.step(now);

    run_scan(&mut s88, &mut now);
    assert!(now < INTERVAL * phases_per_scan(1));
    assert!((0..8).all(|vpin| s88.read(vpin)));
}

#[test]
fn test_registry_dispatch() {
    let mut yard = S88::new(&config(100, 16), SimLines::constant(true)).unwrap();
    let mut station = S88::new(&config(200, 8), SimLines::scripted(bits("01000000 01000000"))).unwrap();

    {
        let mut registry: DeviceRegistry<'_, 4> = DeviceRegistry::new();
        registry.register(&mut yard).unwrap();
        registry.register(&mut station).unwrap();
        registry.begin_all();

        let mut now = 0;
        for _ in 0..phases_per_scan(2) {
            now += INTERVAL;
            registry.poll(now);
        }

        assert!(registry.read(100));
        assert!(registry.read(115));
        assert!(!registry.read(116));
        assert!(!registry.read(200));
        assert_eq!(registry.read_value(201), 1);
        assert_eq!(registry.read_value(300), 0);

        let mut out = String::new();
        registry.dump_all(&mut out).unwrap();
        assert_eq!(
            out,
            "S88 Configured on Vpins:100-115\nS88 Configured on Vpins:200-207\n"
        );
    }

    assert_eq!(yard.scan_count(), 1);
    assert!(station.scan_count() >= 1);
}

#[test]
fn test_failed_device_is_not_stepped() {
    let mut s88 = S88::new(&config(0, 8), SimLines::constant(true)).unwrap();

    {
        let mut registry: DeviceRegistry<'_, 1> = DeviceRegistry::new();
        registry.register(&mut s88).unwrap();
        registry.begin_all();
        registry.set_state(0, DeviceState::Failed);

        let mut now = 0;
        for _ in 0..100 {
            now += INTERVAL;
            registry.poll(now);
        }

        let mut out = String::new();
        registry.dump_all(&mut out).unwrap();
        assert_eq!(out, "S88 Configured on Vpins:0-7 OFFLINE\n");

        let statuses = registry.statuses();
        assert_eq!(statuses[0].kind, "S88");
        assert_eq!(statuses[0].state, DeviceState::Failed);
    }

    assert_eq!(s88.phase_counter(), 0);
    assert_eq!(s88.scan_count(), 0);
}

#[test]
fn test_poll_before_begin_leaves_lines_alone() {
    let mut s88 = S88::new(&config(0, 8), SimLines::constant(true)).unwrap();

    {
        let mut registry: DeviceRegistry<'_, 1> = DeviceRegistry::new();
        registry.register(&mut s88).unwrap();

        let mut now = 0;
        for _ in 0..phases_per_scan(1) + 5 {
            now += INTERVAL;
            registry.poll(now);
        }
        assert!(!registry.read(0));

        registry.begin_all();
        for _ in 0..phases_per_scan(1) {
            now += INTERVAL;
            registry.poll(now);
        }
        assert!(registry.read(0));
    }

    let lines = s88.gpio();
    // Nothing but the begin sequence precedes the first bus phase
    let configures = lines
        .events
        .iter()
        .take_while(|e| matches!(e, Event::Configure(..)))
        .count();
    assert_eq!(configures, 4);
    assert_eq!(s88.scan_count(), 1);
}

#[test]
fn test_devices_from_toml() {
    let config = parse_config(
        r#"
version = 1

[s88.yard]
first_vpin = 500
pins = 24
data_pin = 2
clock_pin = 3
load_pin = 4
reset_pin = 5
interval_us = 100
"#,
    )
    .unwrap();

    let bus = config.find("yard").unwrap();
    let mut s88 = S88::new(bus, SimLines::constant(true)).unwrap();
    s88.begin();
    assert_eq!(s88.module_count(), 3);
    assert_eq!(s88.ticker().interval(), 100);

    let mut now = 0;
    while s88.scan_count() == 0 {
        now += 100;
        s88.step(now);
    }
    assert_eq!(now, 100 * phases_per_scan(3));
    assert!((500..524).all(|vpin| s88.read(vpin)));
}
