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

use crate::rtc::signal::{
    AcquisitionWatchReceiver, ClockSnapshot, ClockWatchReceiver, ACQUISITION_UPDATE, CLOCK_UPDATE,
};
use clock_sync::time_code::AcquisitionState;
use defmt::warn;

pub enum ClockAccessorError {
    NoWatchSlotsAvailable,
}

pub struct ClockAccessor {
    receiver: ClockWatchReceiver,
    acquisition: AcquisitionWatchReceiver,
}

impl ClockAccessor {
    pub fn new() -> Result<ClockAccessor, ClockAccessorError> {
        match (CLOCK_UPDATE.receiver(), ACQUISITION_UPDATE.receiver()) {
            (Some(receiver), Some(acquisition)) => Ok(Self {
                receiver,
                acquisition,
            }),
            _ => {
                warn!("Unable to obtain clock update receiver");
                Err(ClockAccessorError::NoWatchSlotsAvailable)
            }
        }
    }

    pub async fn wait_for_update(&mut self) -> ClockSnapshot {
        self.receiver.changed().await
    }

    /// Only the time code receiver reports acquisition progress.
    pub fn acquisition_state(&mut self) -> Option<AcquisitionState> {
        self.acquisition.try_get()
    }
}
