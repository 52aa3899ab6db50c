//! Driver for the DS1307 real-time clock and the EEPROM sharing its I2C bus.
//!
//! ```no_run
//! # fn demo<I2C: embedded_hal::i2c::I2c, D: embedded_hal::delay::DelayNs>(i2c: I2C, delay: D) {
//! use ds1307_rtc::{Ds1307, SqwPinMode, TimeRecord};
//!
//! let mut rtc = Ds1307::new(i2c, delay);
//! while !rtc.begin() {}
//!
//! rtc.set_time(&TimeRecord::from([5, 1, 7, 6, 9, 9, 2021])).ok();
//! rtc.set_sqw_pin_mode(SqwPinMode::Hz1).ok();
//! let now = rtc.get_time().ok();
//! # }
//! ```

#[cfg(feature = "raspberrypi")]
pub mod board;
pub mod config;
pub mod driver;
pub mod eeprom;
pub mod errors;
pub mod models;
pub mod registers;

pub use config::Config;
pub use driver::Ds1307;
pub use errors::{Error, InitError};
pub use models::{RegisterImage, SqwPinMode, TimeRecord, TimeType, Weekday};
