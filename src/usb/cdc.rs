//! USB CDC-ACM serial device.
//!
//! Initialises the Embassy USB stack on the nRF52840 hardware USB
//! peripheral and splits the ACM class into an RX and a TX half.

use datalogger::config;
use datalogger::Shared;
use defmt::{info, warn};
use embassy_nrf::peripherals;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_usb::class::cdc_acm::{CdcAcmClass, Receiver, Sender, State};
use embassy_usb::driver::EndpointError;
use embassy_usb::{Builder, Config, UsbDevice};
use static_cell::StaticCell;

use super::SerialTxPipe;
use crate::Irqs;

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

static ACM_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();

/// Build result containing the USB device runner and both ACM halves.
pub struct UsbSerialDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub tx: Sender<'static, UsbDriver>,
    pub rx: Receiver<'static, UsbDriver>,
}

/// Initialise the USB stack and create the CDC-ACM device.
///
/// Must be called exactly once. All static buffers are consumed here.
pub fn init(usbd: peripherals::USBD) -> UsbSerialDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = 100; // mA
    usb_config.max_packet_size_0 = 64;

    // IAD so Windows binds the ACM driver without an .inf
    usb_config.device_class = 0xEF;
    usb_config.device_sub_class = 0x02;
    usb_config.device_protocol = 0x01;
    usb_config.composite_with_iads = true;

    let mut builder = Builder::new(
        driver,
        usb_config,
        USB_CONFIG_DESC.init([0u8; 256]),
        USB_BOS_DESC.init([0u8; 256]),
        USB_MSOS_DESC.init([0u8; 256]),
        USB_CTRL_BUF.init([0u8; 64]),
    );

    let state = ACM_STATE.init(State::new());
    let class = CdcAcmClass::new(&mut builder, state, config::USB_PACKET_SIZE);
    let (tx, rx) = class.split();

    let device = builder.build();

    info!("USB CDC-ACM device initialised");

    UsbSerialDevice { device, tx, rx }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    device.run().await
}

/// Feed every received byte into the inbox.
pub async fn serial_rx_task(
    mut rx: Receiver<'static, UsbDriver>,
    shared: &'static Shared<CriticalSectionRawMutex>,
) -> ! {
    let mut buf = [0u8; config::USB_PACKET_SIZE as usize];

    loop {
        rx.wait_connection().await;
        info!("Serial: host connected");

        loop {
            match rx.read_packet(&mut buf).await {
                Ok(n) => shared.inbox.on_bytes(&buf[..n]),
                Err(EndpointError::BufferOverflow) => warn!("Serial: RX packet overflow"),
                Err(EndpointError::Disabled) => break,
            }
        }
        info!("Serial: host disconnected");
    }
}

/// Drain the TX pipe into IN packets.
pub async fn serial_tx_task(
    mut tx: Sender<'static, UsbDriver>,
    pipe: &'static SerialTxPipe,
) -> ! {
    let mut buf = [0u8; config::USB_PACKET_SIZE as usize];

    loop {
        tx.wait_connection().await;

        loop {
            let n = pipe.read(&mut buf).await;
            if tx.write_packet(&buf[..n]).await.is_err() {
                break;
            }
            // A full packet leaves the host waiting for more; terminate it.
            if n == buf.len() && tx.write_packet(&[]).await.is_err() {
                break;
            }
        }
    }
}
