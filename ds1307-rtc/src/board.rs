//! Raspberry Pi wiring shared by the demonstration programs.

use std::{thread, time::Duration};

use log::info;
use rppal::hal::Delay;
use rppal::i2c::I2c;

use crate::{Config, Ds1307, InitError};

pub type BoardRtc = Ds1307<I2c, Delay>;

const BEGIN_RETRY: Duration = Duration::from_secs(3);

/// Binds the `log` facade to stderr, `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

pub fn configure() -> Result<BoardRtc, InitError> {
    let config = Config::from_env()?;
    info!(
        "I2C bus {}: DS1307 at 0x{:02x}, EEPROM at 0x{:02x}",
        config.i2c_bus, config.rtc_address, config.eeprom_address
    );

    let i2c = I2c::with_bus(config.i2c_bus)?;

    Ok(Ds1307::with_config(i2c, Delay::new(), config))
}

/// Blocks until the module answers, retrying every few seconds.
pub fn wait_for_rtc(rtc: &mut BoardRtc) {
    while !rtc.begin() {
        println!("Please check that the device is properly connected");
        thread::sleep(BEGIN_RETRY);
    }

    println!("DS1307 begin successfully!!!");
}
