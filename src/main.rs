//! Light-sensor datalogger firmware for nRF52840.
//!
//! Interrupt-level work (USB serial RX/TX, the auto-sample tick) runs on an
//! Embassy `InterruptExecutor`. The datalogger itself is a plain blocking
//! loop in thread mode: it may sit in EEPROM settle delays or a blink and
//! the interrupt-level tasks preempt it as needed.

#![no_std]
#![no_main]

mod hw;
mod usb;

use cortex_m_rt::entry;
use datalogger::config::{
    AUTO_SAMPLE_PERIOD_MS, EEPROM_I2C_ADDRESS, KEYPAD_DEBOUNCE_MS, KEYPAD_MAP,
};
use datalogger::keypad::matrix::{ClockedMatrix, KeyMatrix};
use datalogger::{Datalogger, Eeprom, Led, Shared};
use defmt::info;
use embassy_executor::InterruptExecutor;
use embassy_futures::block_on;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt;
use embassy_nrf::interrupt::{InterruptExt, Priority};
use embassy_nrf::{bind_interrupts, peripherals, saadc, twim};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pipe::Pipe;
use embassy_time::{Delay, Duration, Ticker};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hw::NrfBoard;
use usb::cdc::{self, UsbDriver};
use usb::SerialTxPipe;

bind_interrupts!(pub(crate) struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
    TWISPI0 => twim::InterruptHandler<peripherals::TWISPI0>;
    SAADC => saadc::InterruptHandler;
});

type AppShared = Shared<CriticalSectionRawMutex>;

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();
static SHARED: StaticCell<AppShared> = StaticCell::new();
static SERIAL_TX: StaticCell<SerialTxPipe> = StaticCell::new();

#[interrupt]
unsafe fn EGU1_SWI1() {
    EXECUTOR_HIGH.on_interrupt()
}

// ═══════════════════════════════════════════════════════════════════════════
// Interrupt-priority tasks
// ═══════════════════════════════════════════════════════════════════════════

#[embassy_executor::task]
async fn usb_device_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    cdc::run_usb_device(device).await
}

#[embassy_executor::task]
async fn serial_rx_task(
    rx: embassy_usb::class::cdc_acm::Receiver<'static, UsbDriver>,
    shared: &'static AppShared,
) -> ! {
    cdc::serial_rx_task(rx, shared).await
}

#[embassy_executor::task]
async fn serial_tx_task(
    tx: embassy_usb::class::cdc_acm::Sender<'static, UsbDriver>,
    pipe: &'static SerialTxPipe,
) -> ! {
    cdc::serial_tx_task(tx, pipe).await
}

/// Periodic auto-sample tick. Flag-only.
#[embassy_executor::task]
async fn sample_tick_task(shared: &'static AppShared) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(AUTO_SAMPLE_PERIOD_MS));
    loop {
        ticker.next().await;
        shared.scheduler.on_tick();
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Entry point
// ═══════════════════════════════════════════════════════════════════════════

#[entry]
fn main() -> ! {
    info!("datalogger v{} starting", env!("CARGO_PKG_VERSION"));

    let p = embassy_nrf::init(Default::default());

    let shared: &'static AppShared = SHARED.init(Shared::new());
    let serial_tx: &'static SerialTxPipe = SERIAL_TX.init(Pipe::new());

    // - Interrupt-level tasks -----------------------------------------
    interrupt::EGU1_SWI1.set_priority(Priority::P6);
    let spawner = EXECUTOR_HIGH.start(interrupt::EGU1_SWI1);

    let usb = cdc::init(p.USBD);
    spawner.must_spawn(usb_device_task(usb.device));
    spawner.must_spawn(serial_rx_task(usb.rx, shared));
    spawner.must_spawn(serial_tx_task(usb.tx, serial_tx));
    spawner.must_spawn(sample_tick_task(shared));

    // - EEPROM on TWIM0 -----------------------------------------------
    let i2c = twim::Twim::new(p.TWISPI0, Irqs, p.P0_26, p.P0_27, twim::Config::default());
    let eeprom = Eeprom::new(i2c, Delay, EEPROM_I2C_ADDRESS);

    // - Light sensor on AIN0 ------------------------------------------
    let mut adc_config = saadc::Config::default();
    adc_config.resolution = saadc::Resolution::_12BIT;
    let adc = saadc::Saadc::new(
        p.SAADC,
        Irqs,
        adc_config,
        [saadc::ChannelConfig::single_ended(p.P0_02)],
    );
    block_on(adc.calibrate());

    // - Keypad matrix -------------------------------------------------
    let rows = [
        Output::new(p.P1_01, Level::High, OutputDrive::Standard),
        Output::new(p.P1_02, Level::High, OutputDrive::Standard),
        Output::new(p.P1_03, Level::High, OutputDrive::Standard),
        Output::new(p.P1_04, Level::High, OutputDrive::Standard),
    ];
    let cols = [
        Input::new(p.P1_05, Pull::Up),
        Input::new(p.P1_06, Pull::Up),
        Input::new(p.P1_07, Pull::Up),
    ];
    let matrix = KeyMatrix::new(rows, cols, KEYPAD_MAP, KEYPAD_DEBOUNCE_MS);
    let keypad = ClockedMatrix::new(matrix, hw::uptime_ms as fn() -> u64);

    // - Indicator LED (LED1, active-low) -------------------------------
    let led = Led::new(
        Output::new(p.P0_13, Level::High, OutputDrive::Standard),
        Delay,
        true,
    );

    let mut board = NrfBoard::new(keypad, adc, led, serial_tx);
    let mut logger = Datalogger::new(eeprom, shared);

    info!("Entering main loop");
    loop {
        logger.poll(&mut board);
    }
}
