//! Static configuration: pin maps and rates.
//!
//! All state is volatile; nothing here persists across a power cycle.

/// Serial bus link to the FPGA.
pub struct SpiBusConfig {
    pub clk_pin: i32,
    pub mosi_pin: i32,
    pub miso_pin: i32,
    pub cs_pin: i32,
    pub freq_hz: u32,
}

impl Default for SpiBusConfig {
    fn default() -> Self {
        Self {
            clk_pin: 12,
            mosi_pin: 11,
            miso_pin: 9,
            cs_pin: 10,
            freq_hz: 8_000_000,
        }
    }
}

/// Pins wired to the FPGA's JTAG header.
pub struct JtagPinConfig {
    pub tck_pin: i32,
    pub tms_pin: i32,
    pub tdi_pin: i32,
    pub tdo_pin: i32,
    pub srst_pin: i32,
}

impl Default for JtagPinConfig {
    fn default() -> Self {
        Self {
            tck_pin: 6,
            tms_pin: 8,
            tdi_pin: 7,
            tdo_pin: 5,
            srst_pin: 13,
        }
    }
}

/// Top-level bridge configuration.
pub struct BridgeConfig {
    /// Console line rate.
    pub console_baud: u32,

    /// Serial poll interval while blocked at a breakpoint.
    pub poll_interval_ms: u32,

    /// Diagnostic log drain UART (TX only).
    pub log_tx_pin: i32,
    pub log_baud: u32,

    pub spi: SpiBusConfig,
    pub jtag: JtagPinConfig,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            console_baud: 115_200,
            poll_interval_ms: 10,
            log_tx_pin: 4,
            log_baud: 115_200,
            spi: SpiBusConfig::default(),
            jtag: JtagPinConfig::default(),
        }
    }
}
