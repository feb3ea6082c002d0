//! FpgaDebugBridge - Firmware entry point
//!
//! On the ESP32-S3 this brings up the console UART, the SPI link to the
//! FPGA and the JTAG routing pins, then runs the app loop with the bridge
//! serviced every cycle. On a host build the same bridge runs against the
//! simulated FPGA on stdin/stdout, which is handy for poking at the
//! protocol without hardware.

#![cfg_attr(target_arch = "xtensa", no_std)]
#![cfg_attr(target_arch = "xtensa", no_main)]

#[cfg(target_arch = "xtensa")]
mod firmware {
    use esp_idf_svc::hal::delay::FreeRtos;
    use esp_idf_svc::hal::gpio::{AnyIOPin, OutputPin as _, PinDriver};
    use esp_idf_svc::hal::peripherals::Peripherals;
    use esp_idf_svc::hal::prelude::*;
    use esp_idf_svc::hal::spi::{config as spi_config, SpiDeviceDriver, SpiDriver, SpiDriverConfig};
    use esp_idf_svc::hal::uart::{config as uart_config, UartDriver, UartTxDriver};
    use esp_idf_svc::sys as esp_idf_sys;

    use fpga_debug_bridge::bus::{regs, SpiWishbone, WishboneBus};
    use fpga_debug_bridge::config::BridgeConfig;
    use fpga_debug_bridge::hal::{ConsoleUart, HwSpi, UartLogDrain, UsbJtagPins};
    use fpga_debug_bridge::logging::LogRing;
    use fpga_debug_bridge::router::SignalRouter;
    use fpga_debug_bridge::DebugBridge;

    static LOG: LogRing = LogRing::new();

    #[no_mangle]
    fn main() {
        // Initialize ESP-IDF
        esp_idf_sys::link_patches();

        let cfg = BridgeConfig::default();
        let p = Peripherals::take().expect("peripherals already taken");

        // Console on UART0 (the board's USB bridge pins).
        let uart = UartDriver::new(
            p.uart0,
            p.pins.gpio43,
            p.pins.gpio44,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config::Config::default().baudrate(Hertz(cfg.console_baud)),
        )
        .expect("console uart");
        let serial = ConsoleUart::new(uart);

        // Hardware SPI link to the FPGA; pin map per BridgeConfig defaults.
        // CS is a plain GPIO so the read settle happens inside the frame.
        let spi_driver = SpiDriver::new(
            p.spi2,
            p.pins.gpio12,
            p.pins.gpio11,
            Some(p.pins.gpio9),
            &SpiDriverConfig::new(),
        )
        .expect("spi driver");
        let spi_dev = SpiDeviceDriver::new(
            spi_driver,
            Option::<AnyIOPin>::None,
            &spi_config::Config::new()
                .baudrate(Hertz(cfg.spi.freq_hz))
                .data_mode(embedded_hal::spi::MODE_0),
        )
        .expect("spi device");
        let cs = PinDriver::output(p.pins.gpio10.downgrade_output()).expect("cs pin");
        let bus = SpiWishbone::new(HwSpi::new(spi_dev, cs));

        // JTAG routing pins stay tri-stated until `J 1`.
        let router = SignalRouter::new(UsbJtagPins::new(cfg.jtag));

        // Diagnostics drain on a spare pin, off the command channel.
        let log_tx = UartTxDriver::new(
            p.uart1,
            p.pins.gpio4,
            Option::<AnyIOPin>::None,
            Option::<AnyIOPin>::None,
            &uart_config::Config::default().baudrate(Hertz(cfg.log_baud)),
        )
        .expect("log uart");
        let mut log_drain = UartLogDrain::new(log_tx);

        let mut bridge = DebugBridge::new(bus, router, serial, FreeRtos)
            .poll_interval(cfg.poll_interval_ms)
            .with_log(&LOG);
        bridge.begin();

        let mut heartbeat: u8 = 0;
        let mut last_tick: i64 = 0;

        loop {
            bridge.service();
            log_drain.drain(&LOG);

            // Skip app work while halted; the console stays live above.
            if bridge.is_paused() {
                FreeRtos::delay_ms(10);
                continue;
            }

            // App cycle: once a second, walk the LED intensity register.
            let now = unsafe { esp_idf_sys::esp_timer_get_time() };
            if now - last_tick >= 1_000_000 {
                last_tick = now;
                heartbeat = heartbeat.wrapping_add(1);
                bridge.bus().write(regs::RGB_LED_BASE + 3, heartbeat);
            }

            FreeRtos::delay_ms(1);
        }
    }
}

#[cfg(not(target_arch = "xtensa"))]
fn main() {
    use std::io::{BufRead, Write as _};

    use fpga_debug_bridge::logging::LogRing;
    use fpga_debug_bridge::sim::{SimFpga, SimJtagPins};
    use fpga_debug_bridge::{DebugBridge, SerialIo, SignalRouter, SpiWishbone};

    static LOG: LogRing = LogRing::new();

    /// stdin/stdout console; refills from stdin when the buffer runs dry.
    struct StdioSerial {
        pending: std::collections::VecDeque<u8>,
        log: &'static LogRing,
    }

    impl core::fmt::Write for StdioSerial {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            print!("{}", s);
            let _ = std::io::stdout().flush();
            Ok(())
        }
    }

    impl SerialIo for StdioSerial {
        fn poll_byte(&mut self) -> Option<u8> {
            if self.pending.is_empty() {
                // Surface queued diagnostics between commands.
                while let Some(record) = self.log.drain() {
                    eprintln!("[{:6}] {}: {}", record.seq, record.level.as_str(), record.text());
                }

                let mut line = String::new();
                match std::io::stdin().lock().read_line(&mut line) {
                    Ok(0) | Err(_) => std::process::exit(0),
                    Ok(_) => self.pending.extend(line.bytes()),
                }
            }
            self.pending.pop_front()
        }
    }

    struct HostDelay;

    impl embedded_hal::delay::DelayNs for HostDelay {
        fn delay_ns(&mut self, ns: u32) {
            std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
        }
    }

    let serial = StdioSerial {
        pending: std::collections::VecDeque::new(),
        log: &LOG,
    };
    let mut bridge = DebugBridge::new(
        SpiWishbone::new(SimFpga::new()),
        SignalRouter::new(SimJtagPins::new()),
        serial,
        HostDelay,
    )
    .with_log(&LOG);

    bridge.begin();
    loop {
        bridge.service();
    }
}
