//! Simulated GPIO lines shared by the integration tests

#![allow(dead_code)]

use std::collections::VecDeque;

use s88_core::config::S88Config;
use s88_core::{IoDevice, Micros};
use s88_drivers::S88;
use s88_hal::{GpioLines, LineId, PinMode};

pub const DATA: LineId = 2;
pub const CLOCK: LineId = 3;
pub const LOAD: LineId = 4;
pub const RESET: LineId = 5;

pub const INTERVAL: Micros = 400;

/// Something the driver did to the lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Configure(LineId, PinMode),
    Write(LineId, bool),
    Read(LineId, bool),
}

/// Line bank that records every operation and plays back a data script
pub struct SimLines {
    levels: [bool; 16],
    modes: [Option<PinMode>; 16],
    script: VecDeque<bool>,
    idle_level: bool,
    pub events: Vec<Event>,
}

impl SimLines {
    /// Data line reads `level` forever
    pub fn constant(level: bool) -> Self {
        Self {
            levels: [false; 16],
            modes: [None; 16],
            script: VecDeque::new(),
            idle_level: level,
            events: Vec::new(),
        }
    }

    /// Data line plays `bits` in order, then reads low
    pub fn scripted(bits: impl IntoIterator<Item = bool>) -> Self {
        let mut lines = Self::constant(false);
        lines.push_script(bits);
        lines
    }

    /// Queue more data bits
    pub fn push_script(&mut self, bits: impl IntoIterator<Item = bool>) {
        self.script.extend(bits);
    }

    /// Switch the level read once the script runs out
    pub fn set_idle_level(&mut self, level: bool) {
        self.idle_level = level;
    }

    pub fn level(&self, line: LineId) -> bool {
        self.levels[line as usize]
    }

    pub fn mode(&self, line: LineId) -> Option<PinMode> {
        self.modes[line as usize]
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl GpioLines for SimLines {
    fn configure(&mut self, line: LineId, mode: PinMode) {
        self.modes[line as usize] = Some(mode);
        self.events.push(Event::Configure(line, mode));
    }

    fn write(&mut self, line: LineId, high: bool) {
        self.levels[line as usize] = high;
        self.events.push(Event::Write(line, high));
    }

    fn read(&mut self, line: LineId) -> bool {
        let level = self.script.pop_front().unwrap_or(self.idle_level);
        self.events.push(Event::Read(line, level));
        level
    }
}

/// Bus config on the simulated lines
pub fn config(first_vpin: u16, pin_count: u16) -> S88Config {
    S88Config::new(first_vpin, pin_count, DATA, CLOCK, LOAD, RESET)
}

/// Create and initialise a driver
pub fn started(first_vpin: u16, pin_count: u16, lines: SimLines) -> S88<SimLines> {
    let mut s88 = S88::new(&config(first_vpin, pin_count), lines).unwrap();
    s88.begin();
    s88
}

/// Step one interval at a time until the current scan completes
///
/// Returns the number of phases executed.
pub fn run_scan(s88: &mut S88<SimLines>, now: &mut Micros) -> u32 {
    let scans = s88.scan_count();
    let mut phases = 0;
    while s88.scan_count() == scans {
        *now = now.wrapping_add(INTERVAL);
        s88.step(*now);
        phases += 1;
        assert!(phases <= 5000, "scan did not complete");
    }
    phases
}

/// Parse a `1`/`0` string into bits
pub fn bits(pattern: &str) -> Vec<bool> {
    pattern
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c == '1')
        .collect()
}
