//! Restores the clock from the time saved in the EEPROM, round-trips a
//! string through the EEPROM, then keeps saving the current time so a power
//! cycle can resume from it.

use std::{thread::sleep, time::Duration};

use ds1307_rtc::{board, InitError};
use log::warn;

const SLEEP_TIME: Duration = Duration::from_secs(1);
const MESSAGE: &str = "This is data from the eeprom!";

fn main() -> Result<(), InitError> {
    board::init_logger();

    let mut rtc = board::configure()?;
    board::wait_for_rtc(&mut rtc);

    rtc.stop()?;
    // NOTE: on a fresh module the saved area is blank and this sets garbage.
    rtc.set_time_from_eeprom()?;
    rtc.start()?;

    println!("--- EEPROM Read-Write Test---");
    rtc.write_eeprom(0, MESSAGE.as_bytes())?;
    println!("Written Done!");

    let data = rtc.read_eeprom(0, MESSAGE.len())?;
    println!("Read Data: {}", String::from_utf8_lossy(&data));
    if data != MESSAGE.as_bytes() {
        warn!("EEPROM read back differs from what was written");
    }

    loop {
        let now = rtc.get_time()?;
        println!("time: {}", now.to_s());

        rtc.save_time_to_eeprom()?;

        sleep(SLEEP_TIME);
    }
}
