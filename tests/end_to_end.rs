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

use clock_sync::config::DEFAULT_SENTENCE_SETTLE_TICKS;
use clock_sync::sentence::SentenceDecoder;
use clock_sync::sync::SyncError;
use clock_sync::time_code::{AcquisitionState, TimeCodeDecoder};
use clock_sync::{ClockRecord, ClockStore, DigitPair, SyncConfig, SyncManager, SyncOutcome, SyncStatus, TimeHandoff};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;

#[derive(Default)]
struct RtcStub {
    record: ClockRecord,
    writes: Vec<ClockRecord>,
}

impl ClockStore for RtcStub {
    type Error = ();

    fn read(&mut self) -> Result<ClockRecord, Self::Error> {
        Ok(self.record)
    }

    fn write(&mut self, record: &ClockRecord) -> Result<(), Self::Error> {
        self.record = *record;
        self.writes.push(*record);
        Ok(())
    }
}

fn long_wave_frame(minute: u8, hour: u8, day: u8, weekday: u8, month: u8, year: u8) -> Vec<bool> {
    let bcd = |value: u8| u64::from(value % 10) | (u64::from(value / 10) << 4);
    let parity = |value: u64| u64::from(value.count_ones() & 1);
    let min = bcd(minute);
    let hr = bcd(hour);
    let date = bcd(day) | (u64::from(weekday) << 6) | (bcd(month) << 9) | (bcd(year) << 14);
    let word: u64 = (1 << 20) | min << 21 | parity(min) << 28 | hr << 29 | parity(hr) << 35 | date << 36 | parity(date) << 58;

    let mut samples = vec![false; 200];
    for second in 0..59 {
        let high = if word & (1 << second) != 0 { 20 } else { 10 };
        samples.extend(std::iter::repeat(true).take(high));
        samples.extend(std::iter::repeat(false).take(100 - high));
    }
    samples.extend([false; 100]);
    samples.extend([true; 10]);
    samples
}

#[test]
fn sentence_to_clock_store() {
    let handoff = TimeHandoff::new(NoopRawMutex::new());
    let mut decoder = SentenceDecoder::new(DEFAULT_SENTENCE_SETTLE_TICKS);
    let mut manager = SyncManager::new(SyncConfig::default().with_zone_offset_hours(1).unwrap());
    let mut rtc = RtcStub::default();

    for &byte in b"$GPRMC,182600.00,V,,,,,,,210916,,,N*7D\r\n" {
        if let Some(pending) = decoder.feed(byte) {
            handoff.publish(pending);
        }
    }
    assert!(handoff.is_pending());

    // ten 10 ms ticks per main cycle
    let mut committed = None;
    for cycle in 0..20 {
        for _ in 0..10 {
            handoff.tick();
        }
        if let Ok(SyncOutcome::Committed(record)) = manager.cycle(&handoff, &mut rtc) {
            committed = Some((cycle, record));
            break;
        }
    }

    let (cycle, record) = committed.expect("sentence should reach the clock");
    assert_eq!(cycle, 7);
    assert_eq!(rtc.writes.len(), 1);
    assert_eq!(rtc.read(), Ok(record));
    assert_eq!(record.hour, DigitPair::new(1, 9));
    assert_eq!(record.minute, DigitPair::new(2, 6));
    assert_eq!(record.day, DigitPair::new(2, 1));
    assert_eq!(record.month, DigitPair::new(0, 9));
    assert_eq!(record.year, DigitPair::new(1, 6));
    assert_eq!(record.weekday, 3);
    assert!(manager.status().is_synced());
}

#[test]
fn time_code_to_clock_store_across_midnight() {
    let handoff = TimeHandoff::new(NoopRawMutex::new());
    let mut decoder = TimeCodeDecoder::new();
    let mut manager = SyncManager::new(SyncConfig::default().with_zone_offset_hours(-2).unwrap());
    let mut rtc = RtcStub::default();

    // 2024-03-01 01:15, Friday
    for (tick, sample) in long_wave_frame(15, 1, 1, 5, 3, 24).into_iter().enumerate() {
        if let Some(pending) = decoder.sample(sample) {
            handoff.publish(pending);
        }
        handoff.tick();
        if tick % 10 == 9 {
            manager.cycle(&handoff, &mut rtc).unwrap();
        }
    }
    manager.cycle(&handoff, &mut rtc).unwrap();

    assert_eq!(decoder.state(), AcquisitionState::FrameValid);
    assert_eq!(rtc.writes.len(), 1);
    let record = rtc.writes[0];
    assert_eq!(record.to_naive_date_time().map(|dt| dt.to_string()), Ok("2024-02-29 23:15:00".into()));
    assert_eq!(record.weekday, 4);
    assert_eq!(
        manager.last_sync_display(),
        clock_sync::sync::LastSync {
            hour: DigitPair::new(2, 3),
            minute: DigitPair::new(1, 5)
        }
    );
}

#[test]
fn rejected_input_never_reaches_the_store() {
    let handoff = TimeHandoff::new(NoopRawMutex::new());
    let mut decoder = SentenceDecoder::new(0);
    let mut manager = SyncManager::new(SyncConfig::default());
    let mut rtc = RtcStub::default();

    for &byte in b"$GPRMC,182600.00,V,,,,,,,210916,,,N*7E\r\n" {
        if let Some(pending) = decoder.feed(byte) {
            handoff.publish(pending);
        }
        let outcome: Result<SyncOutcome, SyncError<()>> = manager.cycle(&handoff, &mut rtc);
        assert_eq!(outcome, Ok(SyncOutcome::Stale));
    }
    assert!(rtc.writes.is_empty());
    assert_eq!(manager.status(), SyncStatus::Unsynced);
}
