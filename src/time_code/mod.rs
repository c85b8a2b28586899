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

//! Tick-driven decoder for the amplitude-modulated long-wave time code.
//!
//! The carrier is reduced at the start of every second except the 59th. A reduction of ~100 ms is a
//! 0 bit, ~200 ms is a 1 bit, and the missing reduction marks the end of the minute. The receiver
//! output is sampled every 10 ms and is high while the carrier is reduced.

pub mod filter;
pub mod frame;

use crate::digits::PendingTime;
use crate::time_code::filter::NoiseFilter;
use crate::time_code::frame::Frame;
use log::{debug, trace};

// Run lengths in 10 ms ticks since the last level change.
const ZERO_BIT_TICKS: core::ops::RangeInclusive<u16> = 6..=14;
const ONE_BIT_TICKS: core::ops::RangeInclusive<u16> = 17..=24;
const MIN_GAP_TICKS: u16 = 66;
const MINUTE_GAP_TICKS: u16 = 110;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AcquisitionState {
    Invalid,
    Collecting,
    FrameValid,
}

pub struct TimeCodeDecoder {
    filter: NoiseFilter,
    state: AcquisitionState,
    level: bool,
    run_ticks: u16,
    frame: Frame,
}

impl Default for TimeCodeDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeCodeDecoder {
    pub const fn new() -> Self {
        Self {
            filter: NoiseFilter::new(),
            state: AcquisitionState::Invalid,
            level: false,
            run_ticks: 0,
            frame: Frame::new(),
        }
    }

    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    pub fn bits_received(&self) -> u8 {
        self.frame.bits_received()
    }

    fn discard_frame(&mut self) {
        if self.frame.bits_received() > 0 {
            trace!("time code frame discarded after {} bits", self.frame.bits_received());
        }
        self.frame.clear();
        self.state = AcquisitionState::Invalid;
    }

    /// End of minute: everything collected so far belongs to the frame that just finished.
    fn commit_frame(&mut self) -> Option<PendingTime> {
        let result = self.frame.decoded_time();
        self.frame.clear();
        match result {
            Ok(time) => {
                debug!("time code frame decoded: {:?}", time);
                debug_assert!(time.is_decimal());
                self.state = AcquisitionState::FrameValid;
                Some(PendingTime::new(time, 0))
            }
            Err(e) => {
                debug!("time code frame rejected: {:?}", e);
                self.state = AcquisitionState::Invalid;
                None
            }
        }
    }

    /// Consumes the receiver output for one 10 ms tick.
    pub fn sample(&mut self, raw: bool) -> Option<PendingTime> {
        let level = self.filter.filter(raw);
        if level == self.level {
            self.run_ticks = self.run_ticks.saturating_add(1);
            return None;
        }

        let run = self.run_ticks;
        self.run_ticks = 0;
        self.level = level;

        if level {
            if run >= MINUTE_GAP_TICKS {
                return self.commit_frame();
            }
            if run < MIN_GAP_TICKS {
                self.discard_frame();
            }
        } else {
            self.state = AcquisitionState::Collecting;
            if ZERO_BIT_TICKS.contains(&run) {
                self.frame.push_bit(false);
            } else if ONE_BIT_TICKS.contains(&run) {
                self.frame.push_bit(true);
            } else {
                self.discard_frame();
            }
        }
        None
    }
}
