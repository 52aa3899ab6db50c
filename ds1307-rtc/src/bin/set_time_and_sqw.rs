//! Sets the time, starts the clock and drives SQW/OUT at 1Hz, then prints
//! the time and pin mode once a second.

use std::{thread::sleep, time::Duration};

use ds1307_rtc::{board, InitError, SqwPinMode, TimeRecord, TimeType};
use log::info;

const SLEEP_TIME: Duration = Duration::from_secs(1);

fn main() -> Result<(), InitError> {
    board::init_logger();

    let mut rtc = board::configure()?;
    board::wait_for_rtc(&mut rtc);

    rtc.set_type_time(TimeType::Year, 2000)?;
    println!("get type time: {}", rtc.get_type_time(TimeType::Year)?);

    // sec, min, hour, day of week, date, month, year
    let time = TimeRecord::from([5, 1, 7, 6, 9, 9, 2021]);
    rtc.stop()?;
    rtc.set_time(&time)?;
    rtc.start()?;
    info!("Clock set to {}", time);

    rtc.set_sqw_pin_mode(SqwPinMode::Hz1)?;

    loop {
        if SqwPinMode::try_from(rtc.get_sqw_pin_mode()?) == Ok(SqwPinMode::Hz1) {
            print!("SQW/OUT pin: 1Hz | ");
        }

        let now = rtc.get_time()?;
        println!("time: {}", now.to_s());

        sleep(SLEEP_TIME);
    }
}
