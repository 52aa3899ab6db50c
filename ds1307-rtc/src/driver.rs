use chrono::{Datelike, NaiveDateTime};
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

use crate::config::Config;
use crate::errors::Error;
use crate::models::{RegisterImage, SqwPinMode, TimeRecord, TimeType};
use crate::registers::{
    bcd_to_bin, DS1307_CTL_REG, DS1307_RAM_REG, DS1307_RAM_SIZE, DS1307_SEC_REG, MAX_BLOCK_WRITE,
};

/// DS1307 on `I2C`, plus the EEPROM that shares its bus.
///
/// The driver keeps a copy of registers 0x00-0x07 ([`RegisterImage`]) and
/// merges single-field writes into it, so bits it does not own (the
/// clock-halt flag, the control byte) are written back as last seen. Call
/// [`Ds1307::refresh`] before a field write if the chip may have changed
/// underneath the cache.
pub struct Ds1307<I2C, D> {
    pub(crate) i2c: I2C,
    pub(crate) delay: D,
    pub(crate) config: Config,
    pub(crate) rtc_bcd: RegisterImage,
}

impl<I2C, D> Ds1307<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    pub fn new(i2c: I2C, delay: D) -> Self {
        Self::with_config(i2c, delay, Config::default())
    }

    pub fn with_config(i2c: I2C, delay: D, config: Config) -> Self {
        Self {
            i2c,
            delay,
            config,
            rtc_bcd: RegisterImage::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn image(&self) -> &RegisterImage {
        &self.rtc_bcd
    }

    /// Hand back the bus and delay.
    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }

    /// Reads the register image and starts the clock.
    ///
    /// Returns `false` if the chip could not be read. The clock-halt bit is
    /// cleared either way; callers usually poll this with a delay until the
    /// module shows up.
    pub fn begin(&mut self) -> bool {
        let ready = match self.refresh() {
            Ok(image) => {
                info!("RTC: Found DS1307, registers {:02x?}", image.as_bytes());
                true
            }
            Err(e) => {
                warn!("RTC: Failed reading DS1307 registers: {:?}", e);
                false
            }
        };

        if let Err(e) = self.start() {
            warn!("RTC: Failed clearing clock-halt: {:?}", e);
        }

        ready
    }

    /// Re-reads all eight clock registers into the cached image.
    pub fn refresh(&mut self) -> Result<&RegisterImage, Error<I2C::Error>> {
        let mut raw = [0_u8; 8];
        self.read_reg(self.config.rtc_address, DS1307_SEC_REG, &mut raw)?;
        self.rtc_bcd = raw.into();

        Ok(&self.rtc_bcd)
    }

    pub fn get_time(&mut self) -> Result<TimeRecord, Error<I2C::Error>> {
        let image = *self.refresh()?;

        let mut rtc = TimeRecord::default();
        for field in TimeType::ALL {
            rtc.set(field, self.to_user(field, image.decode(field)));
        }

        Ok(rtc)
    }

    pub fn get_type_time(&mut self, field: TimeType) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0_u8; 1];
        self.read_reg(self.config.rtc_address, field.register(), &mut buf)?;

        Ok(self.to_user(field, bcd_to_bin(buf[0] & field.mask())))
    }

    /// Writes all seven fields in one block.
    ///
    /// Values must already be in range; they are masked, not checked.
    pub fn set_time(&mut self, rtc: &TimeRecord) -> Result<(), Error<I2C::Error>> {
        for field in TimeType::ALL {
            let value = self.to_register(field, rtc.get(field));
            self.rtc_bcd.merge(field, value);
        }

        let image = *self.rtc_bcd.as_bytes();
        self.write_reg(self.config.rtc_address, DS1307_SEC_REG, &image)
    }

    pub fn set_type_time(&mut self, field: TimeType, value: u16) -> Result<(), Error<I2C::Error>> {
        let value = self.to_register(field, value);
        self.rtc_bcd.merge(field, value);

        let byte = self.rtc_bcd.byte(field);
        self.write_reg(self.config.rtc_address, field.register(), &[byte])
    }

    /// Clears the clock-halt bit; timekeeping resumes from the stored time.
    pub fn start(&mut self) -> Result<(), Error<I2C::Error>> {
        self.rtc_bcd.set_halted(false);
        self.write_seconds()
    }

    /// Sets the clock-halt bit, freezing the clock.
    pub fn stop(&mut self) -> Result<(), Error<I2C::Error>> {
        self.rtc_bcd.set_halted(true);
        self.write_seconds()
    }

    pub fn is_running(&mut self) -> Result<bool, Error<I2C::Error>> {
        let mut buf = [0_u8; 1];
        self.read_reg(self.config.rtc_address, DS1307_SEC_REG, &mut buf)?;
        self.rtc_bcd.0[DS1307_SEC_REG as usize] = buf[0];

        Ok(!self.rtc_bcd.is_halted())
    }

    pub fn set_sqw_pin_mode(&mut self, mode: SqwPinMode) -> Result<(), Error<I2C::Error>> {
        self.write_reg(self.config.rtc_address, DS1307_CTL_REG, &[mode.value()])?;
        // keep a later block write from restoring the old mode
        self.rtc_bcd.0[DS1307_CTL_REG as usize] = mode.value();

        Ok(())
    }

    /// Raw control register; see [`SqwPinMode::try_from`].
    pub fn get_sqw_pin_mode(&mut self) -> Result<u8, Error<I2C::Error>> {
        let mut buf = [0_u8; 1];
        self.read_reg(self.config.rtc_address, DS1307_CTL_REG, &mut buf)?;

        Ok(buf[0])
    }

    pub fn get_datetime(&mut self) -> Result<NaiveDateTime, Error<I2C::Error>> {
        self.get_time()?
            .to_naive_datetime()
            .ok_or(Error::InvalidDateTime)
    }

    /// Sets the clock from a calendar value; the day of week is derived from
    /// the date, counting Sunday as 1.
    pub fn set_datetime(&mut self, datetime: &NaiveDateTime) -> Result<(), Error<I2C::Error>> {
        let base = i32::from(self.config.base_year);
        if !(base..=base + 99).contains(&datetime.year()) {
            return Err(Error::InvalidDateTime);
        }
        let rtc = TimeRecord::from(datetime);

        self.set_time(&rtc)
    }

    /// Reads from the 56 byte battery-backed RAM; `offset` counts from its start.
    pub fn read_ram(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        check_ram_range(offset, buf.len())?;
        self.read_reg(self.config.rtc_address, DS1307_RAM_REG + offset, buf)
    }

    pub fn write_ram(&mut self, offset: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        check_ram_range(offset, data.len())?;

        let mut reg = DS1307_RAM_REG + offset;
        for chunk in data.chunks(MAX_BLOCK_WRITE) {
            self.write_reg(self.config.rtc_address, reg, chunk)?;
            reg += chunk.len() as u8;
        }

        Ok(())
    }

    fn write_seconds(&mut self) -> Result<(), Error<I2C::Error>> {
        let sec = self.rtc_bcd.byte(TimeType::Second);
        self.write_reg(self.config.rtc_address, DS1307_SEC_REG, &[sec])
    }

    fn to_register(&self, field: TimeType, value: u16) -> u8 {
        let value = match field {
            TimeType::Year => value.wrapping_sub(self.config.base_year),
            _ => value,
        };

        (value & u16::from(field.mask())) as u8
    }

    fn to_user(&self, field: TimeType, value: u8) -> u16 {
        match field {
            TimeType::Year => u16::from(value).wrapping_add(self.config.base_year),
            _ => u16::from(value),
        }
    }

    /// Block write of at most [`MAX_BLOCK_WRITE`] bytes starting at `reg`.
    pub(crate) fn write_reg(
        &mut self,
        address: u8,
        reg: u8,
        data: &[u8],
    ) -> Result<(), Error<I2C::Error>> {
        debug_assert!(data.len() <= MAX_BLOCK_WRITE);

        let mut payload = [0_u8; MAX_BLOCK_WRITE + 1];
        payload[0] = reg;
        payload[1..=data.len()].copy_from_slice(data);

        debug!("I2C write 0x{:02x} reg 0x{:02x}: {:02x?}", address, reg, data);
        self.i2c
            .write(address, &payload[..=data.len()])
            .map_err(Error::I2c)
    }

    pub(crate) fn read_reg(
        &mut self,
        address: u8,
        reg: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(address, &[reg], buf)
            .map_err(Error::I2c)?;
        debug!("I2C read 0x{:02x} reg 0x{:02x}: {:02x?}", address, reg, buf);

        Ok(())
    }
}

fn check_ram_range<E>(offset: u8, len: usize) -> Result<(), Error<E>> {
    if len > DS1307_RAM_SIZE.saturating_sub(usize::from(offset)) {
        return Err(Error::RamOutOfRange {
            offset: usize::from(offset),
            len,
        });
    }

    Ok(())
}
