//! BioFET Test Rig Controller Firmware
//!
//! Firmware for the BioFET bench rig on a Nucleo-F401RE. Runs timed ramp
//! and constant-voltage tests, logs samples to an external W25Q NOR flash
//! and serves the line-oriented command protocol over USART2.
//!
//! Everything runs in one cooperative loop: received bytes and control
//! ticks are handled in turn, so a command never interleaves with a tick.

#![no_std]
#![no_main]

mod board;
mod dac;
mod link;

use defmt::*;
use embassy_executor::Spawner;
use embassy_futures::select::{select, Either};
use embassy_stm32::bind_interrupts;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::peripherals::USART2;
use embassy_stm32::spi::Spi;
use embassy_stm32::usart::{self, BufferedUart};
use embassy_time::{Delay, Duration, Instant, Ticker};
use embedded_io_async::Read;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use biofet_core::config::ControllerSettings;
use biofet_core::state::State;
use biofet_core::{BootReport, ConfigSource, Controller};
use biofet_drivers::flash::{W25q, W25qConfig};
use biofet_hal::gpio::BootModeInput;
use biofet_hal::select::ActiveLow;
use biofet_hal_stm32f4::{spi_config, uart_config, BlockingSpi, InputLine, OutputLine, SerialTx};

use crate::board::{UART_RX_BUF_LEN, UART_TX_BUF_LEN};
use crate::dac::LoggedDac;
use crate::link::LoggedLink;

bind_interrupts!(struct Irqs {
    USART2 => usart::BufferedInterruptHandler<USART2>;
});

// UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; UART_TX_BUF_LEN]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; UART_RX_BUF_LEN]> = StaticCell::new();

/// Milliseconds since boot, wrapping
fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("BioFET controller starting...");

    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    // Sample the boot-mode strap before anything else can disturb it
    let boot_mode = BootModeInput::new(
        InputLine::new(Input::new(p.PC13, Pull::Up)),
        board::BOOT_MODE_ACTIVE_HIGH,
    );
    let auto_start = boot_mode.auto_start();

    // Flash on SPI1 (PA5=SCK, PA7=MOSI, PA6=MISO), select on PB6
    let spi = Spi::new_blocking(p.SPI1, p.PA5, p.PA7, p.PA6, spi_config(&board::FLASH_SPI));
    let cs = ActiveLow::new(OutputLine::new(Output::new(
        p.PB6,
        Level::High,
        Speed::VeryHigh,
    )));
    let flash = W25q::new(BlockingSpi::new(spi), cs, Delay, W25qConfig::default());

    // Command link on USART2 (PA2=TX, PA3=RX)
    let tx_buf = TX_BUF.init([0u8; UART_TX_BUF_LEN]);
    let rx_buf = RX_BUF.init([0u8; UART_RX_BUF_LEN]);
    let config = unwrap!(uart_config(&board::COMMAND_UART));
    let uart = unwrap!(BufferedUart::new(
        p.USART2, p.PA3, p.PA2, tx_buf, rx_buf, Irqs, config,
    ));
    let (tx, mut rx) = uart.split();
    let mut link = LoggedLink::new(SerialTx::new(tx));
    info!("UART initialized for host commands");

    let mut controller = Controller::new(flash, LoggedDac::new(), ControllerSettings::default());
    let report = controller.boot(auto_start, now_ms());
    log_boot(&report);

    let settings = controller.settings();
    info!(
        "Outputs every {} ms, samples every {} ms, ramp to {} V",
        settings.update_interval_ms, settings.log_interval_ms, settings.ramp_ceiling_v
    );
    let config = controller.config();
    info!(
        "Test type {}, run time {} min",
        config.test_type, config.run_time_minutes
    );

    let mut ticker = Ticker::every(Duration::from_millis(board::TICK_INTERVAL_MS));
    let mut buf = [0u8; 32];

    loop {
        match select(rx.read(&mut buf), ticker.next()).await {
            Either::First(Ok(len)) => {
                for &byte in &buf[..len] {
                    let before = controller.state();
                    match controller.feed(byte, now_ms(), &mut link) {
                        Ok(Some(command)) => debug!("Command: {}", command.name()),
                        Ok(None) => {}
                        Err(e) => warn!("Link write failed: {:?}", e),
                    }
                    log_transition(before, controller.state());
                }
            }
            Either::First(Err(e)) => {
                warn!("UART read error: {:?}", e);
            }
            Either::Second(()) => {
                let before = controller.state();
                if let Err(e) = controller.tick(now_ms(), &mut link) {
                    warn!("Link write failed: {:?}", e);
                }
                log_transition(before, controller.state());
            }
        }
    }
}

fn log_boot(report: &BootReport) {
    match report.device_id {
        Some(id) => info!(
            "Flash JEDEC id {=u8:02x} {=u8:02x} {=u8:02x}",
            id.manufacturer, id.memory_type, id.capacity
        ),
        None => error!("No flash device"),
    }

    match report.config_source {
        ConfigSource::Flash => info!("Configuration loaded from flash"),
        ConfigSource::Defaults => info!("No stored configuration, using defaults"),
        ConfigSource::StorageFault(e) => {
            error!("Configuration read failed: {:?}, using defaults", e)
        }
    }

    info!("Recovered log: {} bytes", report.log_len);
    if report.auto_started {
        info!("Boot mode: run started");
    }
}

fn log_transition(before: State, after: State) {
    if before == after {
        return;
    }
    if after.is_running() {
        info!("Run started");
    } else {
        info!("Run ended");
    }
}
