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
use crate::rtc::signal::{ACQUISITION_UPDATE, DECODED_TIME};
use clock_sync::time_code::filter::RawSampleMonitor;
use clock_sync::time_code::TimeCodeDecoder;
use defmt::{debug, info, trace};
use embassy_rp::gpio::Input;
use embassy_time::Ticker;

/// Samples the demodulated time code every tick, decodes it and drives the settle countdown.
pub async fn time_code_sampler(input: Input<'static>) {
    let mut decoder = TimeCodeDecoder::new();
    let mut monitor = RawSampleMonitor::new();
    let acquisition = ACQUISITION_UPDATE.sender();
    let mut last_state = decoder.state();
    acquisition.send(last_state);

    let mut ticker = Ticker::every(config::SAMPLE_TICK);
    loop {
        ticker.next().await;
        let sample = input.is_high() != config::TIME_CODE_ACTIVE_LOW;

        if let Some(bits) = monitor.record(sample) {
            trace!("Time code samples {=u8:b}", bits);
        }
        if let Some(pending) = decoder.sample(sample) {
            info!("Time code frame decoded: {}", pending.time);
            DECODED_TIME.publish(pending);
        }
        DECODED_TIME.tick();

        let state = decoder.state();
        if state != last_state {
            debug!("Time code acquisition {} ({} bits)", state, decoder.bits_received());
            acquisition.send(state);
            last_state = state;
        }
    }
}
