#![no_std]
#![no_main]
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

mod config;
mod receiver;
mod rtc;
mod status;

#[cfg(all(feature = "gps", feature = "dcf77"))]
compile_error!("select exactly one receiver feature: gps or dcf77");
#[cfg(not(any(feature = "gps", feature = "dcf77")))]
compile_error!("select a receiver feature: gps or dcf77");

use assign_resources::assign_resources;
use clock_sync::{SyncConfig, SyncManager};
use defmt::{error, info};
use ds323x::Ds323x;
use embassy_executor::{Executor, Spawner};
use embassy_rp::i2c::{self, Config};
use embassy_rp::peripherals::I2C1;
use embassy_rp::{bind_interrupts, peripherals, Peri};
use static_cell::StaticCell;
#[allow(unused_imports)]
use {defmt_rtt as _, panic_probe as _};

use crate::rtc::{RtcControl, RtcStore};

mod built_info {
    // The file has been placed there by the build script.
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

assign_resources! {
    rtc_i2c: RtcI2cPins {
        sda_pin: PIN_2,
        scl_pin: PIN_3,
        i2c_peripheral: I2C1,
    },
    receiver_uart: ReceiverUartResources {
        uart: UART0,
        rx_pin: PIN_1,
        dma_channel: DMA_CH0,
    },
    time_code_input: TimeCodeInputPins {
        data_pin: PIN_6,
    },
}

bind_interrupts!(struct I2cIrqs {
    I2C1_IRQ => i2c::InterruptHandler<I2C1>;
});

#[cfg(feature = "gps")]
bind_interrupts!(struct UartIrqs {
    UART0_IRQ => embassy_rp::uart::InterruptHandler<peripherals::UART0>;
});

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

#[cortex_m_rt::entry]
fn main() -> ! {
    let p = embassy_rp::init(Default::default());
    let resources = split_resources! {p};

    info!(
        "{} v{} ({})",
        built_info::PKG_NAME,
        built_info::PKG_VERSION,
        built_info::GIT_COMMIT_HASH_SHORT.unwrap_or("unknown")
    );

    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| core_main(spawner, resources));
}

fn core_main(spawner: Spawner, resources: AssignedResources) {
    spawner.spawn(clock_task(resources.rtc_i2c)).unwrap();
    spawner.spawn(status_task()).unwrap();

    #[cfg(feature = "gps")]
    {
        spawner.spawn(sentence_task(resources.receiver_uart)).unwrap();
        spawner.spawn(settle_tick_task()).unwrap();
    }
    #[cfg(feature = "dcf77")]
    spawner.spawn(time_code_task(resources.time_code_input)).unwrap();
}

#[embassy_executor::task]
async fn clock_task(rtc_i2c_pins: RtcI2cPins) {
    let i2c = i2c::I2c::new_async(
        rtc_i2c_pins.i2c_peripheral,
        rtc_i2c_pins.scl_pin,
        rtc_i2c_pins.sda_pin,
        I2cIrqs,
        Config::default(),
    );
    let store = RtcStore::new(Ds323x::new_ds3231(i2c));

    let sync_config = SyncConfig::default()
        .with_zone_offset_hours(config::ZONE_OFFSET_HOURS)
        .unwrap_or_else(|e| {
            error!("invalid sync configuration, using UTC: {}", e);
            SyncConfig::default()
        });

    let mut rtc_control = RtcControl::new(store, SyncManager::new(sync_config));
    rtc_control.run().await;
}

#[embassy_executor::task]
async fn status_task() {
    status::status_reporter().await;
}

#[cfg(feature = "gps")]
#[embassy_executor::task]
async fn sentence_task(uart_resources: ReceiverUartResources) {
    use embassy_rp::uart::{self, UartRx};

    let mut uart_config = uart::Config::default();
    uart_config.baudrate = config::RECEIVER_BAUD_RATE;
    let rx = UartRx::new(
        uart_resources.uart,
        uart_resources.rx_pin,
        UartIrqs,
        uart_resources.dma_channel,
        uart_config,
    );
    receiver::sentence::sentence_receiver(rx).await;
}

#[cfg(feature = "gps")]
#[embassy_executor::task]
async fn settle_tick_task() {
    receiver::sentence::settle_ticker().await;
}

#[cfg(feature = "dcf77")]
#[embassy_executor::task]
async fn time_code_task(input_pins: TimeCodeInputPins) {
    use embassy_rp::gpio::{Input, Pull};

    let input = Input::new(input_pins.data_pin, Pull::Up);
    receiver::time_code::time_code_sampler(input).await;
}
