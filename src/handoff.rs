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

use crate::digits::{DecodedTime, PendingTime};
use core::cell::Cell;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Single-slot mailbox carrying a verified time from a decoder context to the main cycle.
///
/// A record only becomes visible through [`TimeHandoff::publish`], which stores it whole inside one
/// lock, so the reader never observes a partially written record. The settle countdown is the only
/// thing mutated in place and it is mutated under the same lock.
pub struct TimeHandoff<M: RawMutex> {
    slot: Mutex<M, Cell<Option<PendingTime>>>,
}

impl<M: RawMutex> TimeHandoff<M> {
    pub const fn new(raw_mutex: M) -> Self {
        Self {
            slot: Mutex::const_new(raw_mutex, Cell::new(None)),
        }
    }

    /// Replaces any record that has not been taken yet.
    pub fn publish(&self, pending: PendingTime) {
        self.slot.lock(|slot| slot.set(Some(pending)));
    }

    /// Advances the settle countdown by one 10 ms tick.
    pub fn tick(&self) {
        self.slot.lock(|slot| {
            if let Some(mut pending) = slot.get() {
                pending.settle_ticks = pending.settle_ticks.saturating_sub(1);
                slot.set(Some(pending));
            }
        });
    }

    /// Takes the record once its settle countdown has expired.
    pub fn take_ready(&self) -> Option<DecodedTime> {
        self.slot.lock(|slot| match slot.get() {
            Some(pending) if pending.is_settled() => {
                slot.set(None);
                Some(pending.time)
            }
            _ => None,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock(|slot| slot.get().is_some())
    }
}
