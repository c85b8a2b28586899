#![cfg_attr(not(test), no_std)]
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

//! Time-signal acquisition and clock synchronisation.
//!
//! Two decoders turn a raw signal into a [`PendingTime`]:
//! - [`sentence::SentenceDecoder`] consumes RMC sentences from a satellite receiver, one byte at a time.
//! - [`time_code::TimeCodeDecoder`] consumes one demodulated long-wave sample every 10 ms.
//!
//! The decoder context publishes into a [`handoff::TimeHandoff`], and the main cycle drains it through
//! [`sync::SyncManager`] into a [`sync::ClockStore`].

pub mod calendar;
pub mod config;
pub mod digits;
pub mod handoff;
pub mod sentence;
pub mod sync;
pub mod time_code;

pub use calendar::{ClockRecord, ZoneOffset};
pub use config::SyncConfig;
pub use digits::{DecodedTime, DigitPair, PendingTime};
pub use handoff::TimeHandoff;
pub use sync::{ClockStore, SyncManager, SyncOutcome, SyncStatus};
