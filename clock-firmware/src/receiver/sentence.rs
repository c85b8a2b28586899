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

use crate::config;
use crate::rtc::signal::DECODED_TIME;
use clock_sync::sentence::SentenceDecoder;
use defmt::{debug, warn};
use embassy_rp::uart::{Async, UartRx};
use embassy_time::Ticker;

/// Feeds every received byte to the sentence decoder and hands decoded times to the clock task.
pub async fn sentence_receiver(mut rx: UartRx<'static, Async>) {
    let mut decoder = SentenceDecoder::new(config::SENTENCE_SETTLE_TICKS);
    let mut byte = [0u8; 1];
    loop {
        match rx.read(&mut byte).await {
            Ok(()) => {
                if let Some(pending) = decoder.feed(byte[0]) {
                    debug!("Sentence decoded: {}", pending.time);
                    DECODED_TIME.publish(pending);
                }
            }
            Err(e) => {
                warn!("Receiver UART error: {}", e);
                decoder.reset();
            }
        }
    }
}

pub async fn settle_ticker() {
    let mut ticker = Ticker::every(config::SAMPLE_TICK);
    loop {
        ticker.next().await;
        DECODED_TIME.tick();
    }
}
