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

use crate::calendar::ClockRecord;
use crate::config::SyncConfig;
use crate::digits::DigitPair;
use crate::handoff::TimeHandoff;
use core::fmt::Debug;
use embassy_sync::blocking_mutex::raw::RawMutex;
use log::{debug, warn};

/// The persistent calendar record, typically a battery-backed RTC.
pub trait ClockStore {
    type Error: Debug;

    fn read(&mut self) -> Result<ClockRecord, Self::Error>;

    fn write(&mut self, record: &ClockRecord) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncError<StoreE> {
    Store(StoreE),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncOutcome {
    Committed(ClockRecord),
    Fresh { remaining: u32 },
    Stale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncStatus {
    Synced { remaining: u32 },
    Unsynced,
}

impl SyncStatus {
    pub fn is_synced(&self) -> bool {
        matches!(self, SyncStatus::Synced { .. })
    }
}

/// Local hour and minute of the last committed sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LastSync {
    pub hour: DigitPair,
    pub minute: DigitPair,
}

impl LastSync {
    /// Shown before the first sync, lights every segment.
    pub const PLACEHOLDER: LastSync = LastSync {
        hour: DigitPair::new(8, 8),
        minute: DigitPair::new(8, 8),
    };
}

pub struct SyncManager {
    config: SyncConfig,
    remaining_cycles: u32,
    last_sync: Option<LastSync>,
}

impl SyncManager {
    pub const fn new(config: SyncConfig) -> Self {
        Self {
            config,
            remaining_cycles: 0,
            last_sync: None,
        }
    }

    /// Runs once per main cycle. Commits a settled decoded time to `store`, otherwise ages the last sync.
    pub fn cycle<M, S>(&mut self, handoff: &TimeHandoff<M>, store: &mut S) -> Result<SyncOutcome, SyncError<S::Error>>
    where
        M: RawMutex,
        S: ClockStore,
    {
        if let Some(time) = handoff.take_ready() {
            let record = ClockRecord::from_decoded(&time, self.config.zone_offset);
            if let Err(e) = store.write(&record) {
                warn!("unable to write synced time to clock store: {:?}", e);
                return Err(SyncError::Store(e));
            }
            self.remaining_cycles = self.config.freshness_cycles;
            self.last_sync = Some(LastSync {
                hour: record.hour,
                minute: record.minute,
            });
            debug!("clock synced to {:?}", record);
            return Ok(SyncOutcome::Committed(record));
        }

        if self.remaining_cycles > 0 {
            self.remaining_cycles -= 1;
            if self.remaining_cycles == 0 {
                debug!("sync expired");
                return Ok(SyncOutcome::Stale);
            }
            return Ok(SyncOutcome::Fresh {
                remaining: self.remaining_cycles,
            });
        }
        Ok(SyncOutcome::Stale)
    }

    pub fn status(&self) -> SyncStatus {
        match self.remaining_cycles {
            0 => SyncStatus::Unsynced,
            remaining => SyncStatus::Synced { remaining },
        }
    }

    pub fn last_sync(&self) -> Option<LastSync> {
        self.last_sync
    }

    pub fn last_sync_display(&self) -> LastSync {
        self.last_sync.unwrap_or(LastSync::PLACEHOLDER)
    }

    /// The clock was set by other means, the synced time can no longer be vouched for.
    pub fn invalidate(&mut self) {
        self.remaining_cycles = 0;
    }

    /// Forgets the last sync entirely.
    pub fn reset_sync(&mut self) {
        self.remaining_cycles = 0;
        self.last_sync = None;
    }
}
