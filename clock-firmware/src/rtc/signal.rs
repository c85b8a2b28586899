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

use clock_sync::sync::LastSync;
use clock_sync::time_code::AcquisitionState;
use clock_sync::{ClockRecord, SyncStatus, TimeHandoff};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::watch::{Receiver, Watch};

/// What the clock task publishes after every main cycle.
#[derive(Clone, Copy, defmt::Format)]
pub struct ClockSnapshot {
    pub record: ClockRecord,
    pub status: SyncStatus,
    pub last_sync: LastSync,
}

const CLOCK_WATCH_RECEIVER_COUNT: usize = 3;
pub type ClockWatchReceiver = Receiver<'static, CriticalSectionRawMutex, ClockSnapshot, CLOCK_WATCH_RECEIVER_COUNT>;
pub static CLOCK_UPDATE: Watch<CriticalSectionRawMutex, ClockSnapshot, CLOCK_WATCH_RECEIVER_COUNT> = Watch::new();

const ACQUISITION_WATCH_RECEIVER_COUNT: usize = 2;
pub type AcquisitionWatchReceiver =
    Receiver<'static, CriticalSectionRawMutex, AcquisitionState, ACQUISITION_WATCH_RECEIVER_COUNT>;
pub static ACQUISITION_UPDATE: Watch<CriticalSectionRawMutex, AcquisitionState, ACQUISITION_WATCH_RECEIVER_COUNT> =
    Watch::new();

/// Decoded time travelling from a receiver task to the clock task.
pub static DECODED_TIME: TimeHandoff<CriticalSectionRawMutex> = TimeHandoff::new(CriticalSectionRawMutex::new());

