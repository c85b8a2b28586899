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

use clock_sync::ZoneOffset;
use embassy_time::Duration;

/// Hours added to the received UTC time before it is written to the RTC.
pub const ZONE_OFFSET_HOURS: i8 = 1;

/// Sentence decoder delay between the date field and commit, in 10 ms ticks.
pub const SENTENCE_SETTLE_TICKS: u8 = clock_sync::config::DEFAULT_SENTENCE_SETTLE_TICKS;

pub const RECEIVER_BAUD_RATE: u32 = 9600;

/// The long-wave module pulls its output low during a carrier reduction.
pub const TIME_CODE_ACTIVE_LOW: bool = true;

pub const SAMPLE_TICK: Duration = Duration::from_millis(10);

const _: () = assert!(ZoneOffset::new(ZONE_OFFSET_HOURS).is_ok());
