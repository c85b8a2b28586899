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

use crate::rtc::accessor::ClockAccessor;
use clock_sync::DigitPair;
use defmt::{info, warn};

/// Logs the clock once a minute, along with sync freshness and receiver progress.
pub async fn status_reporter() {
    let Ok(mut accessor) = ClockAccessor::new() else {
        warn!("Status reporting disabled");
        return;
    };

    let mut last_minute: Option<DigitPair> = None;
    loop {
        let snapshot = accessor.wait_for_update().await;
        if last_minute == Some(snapshot.record.minute) {
            continue;
        }
        last_minute = Some(snapshot.record.minute);

        info!(
            "Clock {} | {} | last sync {}{}:{}{}",
            snapshot.record,
            snapshot.status,
            snapshot.last_sync.hour.tens,
            snapshot.last_sync.hour.units,
            snapshot.last_sync.minute.tens,
            snapshot.last_sync.minute.units,
        );
        if let Some(state) = accessor.acquisition_state() {
            info!("Time code acquisition {}", state);
        }
    }
}
