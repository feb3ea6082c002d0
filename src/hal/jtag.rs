//! USB-JTAG signal routing on the ESP32-S3.
//!
//! The S3's USB debug peripheral can drive an external JTAG chain once its
//! bridge bit is set and the signals are placed onto GPIOs through the ROM
//! GPIO matrix. Direction changes go through the plain GPIO driver calls;
//! the multiplex bit is a raw register read-modify-write.

use esp_idf_svc::sys as esp_idf_sys;

use crate::config::JtagPinConfig;
use crate::router::JtagPins;

// USB_SERIAL_JTAG peripheral CONF0 register (SoC reference manual).
const USB_SERIAL_JTAG_CONF0_REG: u32 = 0x6003_8018;

// CONF0 bit that routes the internal USB-JTAG signals to the GPIO matrix.
const USB_JTAG_BRIDGE_EN: u32 = 1 << 24;

// GPIO matrix signal indices for the USB-JTAG bridge (SoC signal map).
const SIG_USB_JTAG_TCK: u32 = 85;
const SIG_USB_JTAG_TMS: u32 = 86;
const SIG_USB_JTAG_TDI: u32 = 87;
const SIG_USB_JTAG_TRST: u32 = 88;
const SIG_USB_JTAG_TDO_BRIDGE: u32 = 89;

pub struct UsbJtagPins {
    cfg: JtagPinConfig,
}

impl UsbJtagPins {
    pub fn new(cfg: JtagPinConfig) -> Self {
        Self { cfg }
    }
}

fn set_output(pin: i32) {
    unsafe {
        esp_idf_sys::gpio_set_direction(pin, esp_idf_sys::gpio_mode_t_GPIO_MODE_OUTPUT);
    }
}

fn set_input(pin: i32) {
    unsafe {
        esp_idf_sys::gpio_set_direction(pin, esp_idf_sys::gpio_mode_t_GPIO_MODE_INPUT);
    }
}

fn set_level(pin: i32, high: bool) {
    unsafe {
        esp_idf_sys::gpio_set_level(pin, high as u32);
    }
}

impl JtagPins for UsbJtagPins {
    fn claim(&mut self) {
        set_output(self.cfg.tck_pin);
        set_output(self.cfg.tms_pin);
        set_output(self.cfg.tdi_pin);
        set_input(self.cfg.tdo_pin);
        set_output(self.cfg.srst_pin);
        // Reset line inactive while routed.
        set_level(self.cfg.srst_pin, true);

        unsafe {
            let conf = core::ptr::read_volatile(USB_SERIAL_JTAG_CONF0_REG as *const u32);
            core::ptr::write_volatile(
                USB_SERIAL_JTAG_CONF0_REG as *mut u32,
                conf | USB_JTAG_BRIDGE_EN,
            );

            esp_idf_sys::esp_rom_gpio_connect_out_signal(
                self.cfg.tck_pin as u32,
                SIG_USB_JTAG_TCK,
                false,
                false,
            );
            esp_idf_sys::esp_rom_gpio_connect_out_signal(
                self.cfg.tms_pin as u32,
                SIG_USB_JTAG_TMS,
                false,
                false,
            );
            esp_idf_sys::esp_rom_gpio_connect_out_signal(
                self.cfg.tdi_pin as u32,
                SIG_USB_JTAG_TDI,
                false,
                false,
            );
            esp_idf_sys::esp_rom_gpio_connect_out_signal(
                self.cfg.srst_pin as u32,
                SIG_USB_JTAG_TRST,
                false,
                false,
            );
            esp_idf_sys::esp_rom_gpio_connect_in_signal(
                self.cfg.tdo_pin as u32,
                SIG_USB_JTAG_TDO_BRIDGE,
                false,
            );
        }
    }

    fn release(&mut self) {
        unsafe {
            let conf = core::ptr::read_volatile(USB_SERIAL_JTAG_CONF0_REG as *const u32);
            core::ptr::write_volatile(
                USB_SERIAL_JTAG_CONF0_REG as *mut u32,
                conf & !USB_JTAG_BRIDGE_EN,
            );
        }

        // All five pins revert to inputs (tri-state).
        set_input(self.cfg.tck_pin);
        set_input(self.cfg.tms_pin);
        set_input(self.cfg.tdi_pin);
        set_input(self.cfg.tdo_pin);
        set_input(self.cfg.srst_pin);
    }
}
