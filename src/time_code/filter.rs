// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

const WINDOW_LEN: u8 = 8;
/// More than this many high samples in the window reads as high.
const HIGH_THRESHOLD: u8 = 3;

/// Majority filter over the last 8 samples, rejects single-tick glitches on the receiver output.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoiseFilter {
    window: u8,
    high_count: u8,
}

impl NoiseFilter {
    pub const fn new() -> Self {
        Self { window: 0, high_count: 0 }
    }

    pub fn filter(&mut self, sample: bool) -> bool {
        if self.window & 0x80 != 0 {
            self.high_count -= 1;
        }
        self.window = (self.window << 1) | u8::from(sample);
        if sample {
            self.high_count += 1;
        }
        self.high_count > HIGH_THRESHOLD
    }
}

/// Packs raw receiver samples into bytes, oldest sample in the most significant bit, so the
/// undecoded signal can be traced at one byte per 80 ms.
#[derive(Debug, Default, Clone, Copy)]
pub struct RawSampleMonitor {
    bits: u8,
    count: u8,
}

impl RawSampleMonitor {
    pub const fn new() -> Self {
        Self { bits: 0, count: 0 }
    }

    pub fn record(&mut self, sample: bool) -> Option<u8> {
        self.bits = (self.bits << 1) | u8::from(sample);
        self.count += 1;
        if self.count < WINDOW_LEN {
            return None;
        }
        self.count = 0;
        Some(self.bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(filter: &mut NoiseFilter, samples: &[bool]) -> Vec<bool> {
        samples.iter().map(|&s| filter.filter(s)).collect()
    }

    #[test]
    fn isolated_glitches_are_rejected() {
        let mut filter = NoiseFilter::new();
        let samples = [false, true, false, false, true, false, true, false, false, false];
        assert!(run(&mut filter, &samples).iter().all(|&level| !level));

        let mut filter = NoiseFilter::new();
        run(&mut filter, &[true; 8]);
        let out = run(&mut filter, &[false, true, true, false, true, true, true, true]);
        assert!(out.iter().all(|&level| level));
    }

    #[test]
    fn pulse_is_delayed_but_keeps_its_length() {
        let mut filter = NoiseFilter::new();
        let mut samples = vec![true; 10];
        samples.extend([false; 20]);
        let out = run(&mut filter, &samples);
        let first_high = out.iter().position(|&level| level).unwrap();
        let high_len = out.iter().filter(|&&level| level).count();
        assert_eq!(first_high, 3);
        assert_eq!(high_len, 11);
    }

    #[test]
    fn window_forgets_after_eight_samples() {
        let mut filter = NoiseFilter::new();
        run(&mut filter, &[true; 8]);
        let out = run(&mut filter, &[false; 8]);
        assert_eq!(out, [true, true, true, true, false, false, false, false]);
    }

    #[test]
    fn monitor_emits_every_eighth_sample() {
        let mut monitor = RawSampleMonitor::new();
        let samples = [true, false, true, true, false, false, false, true];
        let mut emitted = None;
        for (index, &sample) in samples.iter().enumerate() {
            emitted = monitor.record(sample);
            if index < 7 {
                assert_eq!(emitted, None);
            }
        }
        assert_eq!(emitted, Some(0b1011_0001));
        assert_eq!(monitor.record(false), None);
    }
}
