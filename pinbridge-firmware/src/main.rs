//! PinBridge - USB GPIO/I2C/ADC Expander Firmware
//!
//! Main firmware binary for RP2040 boards. The board enumerates as a Diolan
//! DLN-2 adapter, so the host's stock `dln2` drivers expose its pins as a
//! gpiochip, an I2C adapter and an IIO ADC.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::USB;
use embassy_rp::usb::{Driver, InterruptHandler as UsbInterruptHandler};
use {defmt_rtt as _, panic_probe as _};

use pinbridge_core::modules::ctrl::serial_from_unique_id;
use pinbridge_core::Device;
use pinbridge_hal_rp2040::{
    bank_insert, unique_id, AdcPins, BootselButton, HalI2c, PinBank, RpAdc, SioBank,
    BUS_FREQUENCY,
};

mod channels;
mod config;
mod tasks;
mod usb;

bind_interrupts!(struct Irqs {
    USBCTRL_IRQ => UsbInterruptHandler<USB>;
});

/// Runs the edge watchers, preempting the thread-mode executor
static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("PinBridge firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Board identity
    let uid = unique_id(p.FLASH).unwrap_or_else(|| {
        warn!("Flash unique id unavailable, using zeros");
        [0; 8]
    });
    let serial = serial_from_unique_id(&uid);

    let device_config = unwrap!(config::device_config(serial));
    info!(
        "Board: {} GPIOs, button {}, I2C {}, {} ADC channels",
        config::GPIO_PINS.len(),
        device_config.button_mode,
        config::I2C_ENABLED,
        device_config.adc.count()
    );

    // Every GPIO not claimed by a peripheral is parked by number
    let mut bank = PinBank::new();
    bank_insert!(bank,
        0 => p.PIN_0, 1 => p.PIN_1, 2 => p.PIN_2, 3 => p.PIN_3,
        4 => p.PIN_4, 5 => p.PIN_5, 6 => p.PIN_6, 7 => p.PIN_7,
        8 => p.PIN_8, 9 => p.PIN_9, 10 => p.PIN_10, 11 => p.PIN_11,
        12 => p.PIN_12, 13 => p.PIN_13, 14 => p.PIN_14, 15 => p.PIN_15,
        18 => p.PIN_18, 19 => p.PIN_19, 20 => p.PIN_20, 21 => p.PIN_21,
        22 => p.PIN_22, 23 => p.PIN_23, 24 => p.PIN_24, 25 => p.PIN_25,
    );

    // I2C0 on GPIO16 (SDA) / GPIO17 (SCL)
    let i2c = if config::I2C_ENABLED {
        let mut i2c_config = i2c::Config::default();
        i2c_config.frequency = BUS_FREQUENCY;
        HalI2c::new(I2c::new_blocking(p.I2C0, p.PIN_17, p.PIN_16, i2c_config))
    } else {
        bank_insert!(bank, 16 => p.PIN_16, 17 => p.PIN_17);
        HalI2c::absent()
    };

    // ADC; GPIOs of unexposed channels go back to the bank
    let adc_pins = AdcPins {
        pin26: p.PIN_26,
        pin27: p.PIN_27,
        pin28: p.PIN_28,
        pin29: p.PIN_29,
        temp: p.ADC_TEMP_SENSOR,
    };
    let adc = RpAdc::new(p.ADC, adc_pins, device_config.adc.offset(), &mut bank);

    info!("Peripherals initialized");

    // Edge watchers run on SWI_IRQ_1, above thread mode
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    let mut sio = SioBank::new();
    for &number in config::GPIO_PINS {
        let pin = unwrap!(bank.take(number));
        let watcher = unwrap!(sio.claim(number, pin));
        high_spawner.spawn(tasks::edge_watch_task(watcher).unwrap());
    }

    let button = BootselButton::new(p.BOOTSEL);
    let device: tasks::BoardDevice = Device::new(device_config, sio, button, i2c, adc);

    // USB
    let driver = Driver::new(p.USB, Irqs);
    let usb = usb::build(driver, &uid);

    info!("USB initialized");

    // Spawn tasks
    spawner.spawn(tasks::usb_task(usb.device).unwrap());
    spawner.spawn(tasks::usb_rx_task(usb.bulk_out).unwrap());
    spawner.spawn(tasks::usb_tx_task(usb.bulk_in).unwrap());
    spawner.spawn(tasks::bridge_task(device).unwrap());

    info!("All tasks spawned, firmware running");
}

