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

pub mod accessor;
pub mod signal;

use crate::rtc::signal::{ClockSnapshot, CLOCK_UPDATE, DECODED_TIME};
use clock_sync::calendar::CalendarError;
use clock_sync::{ClockRecord, ClockStore, SyncManager, SyncOutcome};
use defmt::{error, info, trace, Debug2Format};
use ds323x::ic;
use ds323x::interface::I2cInterface;
use ds323x::{DateTimeAccess, Ds323x, Rtcc};
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C1;
use embassy_time::{Duration, Ticker};

pub type SystemRtc = Ds323x<I2cInterface<I2c<'static, I2C1, Async>>, ic::DS3231>;

pub const MAIN_CYCLE: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum RtcStoreError {
    Rtc(<SystemRtc as DateTimeAccess>::Error),
    Calendar(CalendarError),
}

/// The DS3231 as the persistent clock record.
pub struct RtcStore {
    rtc: SystemRtc,
}

impl RtcStore {
    pub fn new(rtc: SystemRtc) -> Self {
        Self { rtc }
    }
}

impl ClockStore for RtcStore {
    type Error = RtcStoreError;

    fn read(&mut self) -> Result<ClockRecord, Self::Error> {
        let dt = self.rtc.datetime().map_err(RtcStoreError::Rtc)?;
        let mut record = ClockRecord::try_from(dt).map_err(RtcStoreError::Calendar)?;
        record.weekday = self.rtc.weekday().map_err(RtcStoreError::Rtc)?;
        Ok(record)
    }

    fn write(&mut self, record: &ClockRecord) -> Result<(), Self::Error> {
        let dt = record.to_naive_date_time().map_err(RtcStoreError::Calendar)?;
        self.rtc.set_datetime(&dt).map_err(RtcStoreError::Rtc)?;
        self.rtc.set_weekday(record.weekday).map_err(RtcStoreError::Rtc)
    }
}

pub struct RtcControl {
    store: RtcStore,
    manager: SyncManager,
}

impl RtcControl {
    pub fn new(store: RtcStore, manager: SyncManager) -> Self {
        Self { store, manager }
    }

    pub async fn run(&mut self) {
        let sender = CLOCK_UPDATE.sender();
        let mut main_cycle_ticker = Ticker::every(MAIN_CYCLE);
        loop {
            main_cycle_ticker.next().await;
            match self.manager.cycle(&DECODED_TIME, &mut self.store) {
                Ok(SyncOutcome::Committed(record)) => info!("Clock synced to {}", record),
                Ok(_) => {}
                Err(e) => error!("unable to commit synced time: {}", Debug2Format(&e)),
            }
            match self.store.read() {
                Ok(record) => {
                    trace!("New RTC time: {}", record);
                    sender.send(ClockSnapshot {
                        record,
                        status: self.manager.status(),
                        last_sync: self.manager.last_sync_display(),
                    });
                }
                Err(e) => error!("unable to read RTC: {}", Debug2Format(&e)),
            }
        }
    }
}
