//! Pass-through access to the EEPROM that sits next to the DS1307.
//!
//! The last eight bytes (248-255) are reserved for a copy of the clock's
//! register image; everything below is free for the application.

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use log::{debug, info, warn};

use crate::driver::Ds1307;
use crate::errors::Error;
use crate::registers::{
    DS1307_SEC_REG, EEPROM_PAGE_SIZE, EEPROM_SIZE, EEPROM_TIME_OFFSET, REGISTER_IMAGE_LEN,
};

impl<I2C, D> Ds1307<I2C, D>
where
    I2C: I2c,
    D: DelayNs,
{
    /// Writes `data` starting at `offset`, one page (8 bytes) per transaction.
    ///
    /// Chunks are cut at page boundaries and each is followed by the
    /// configured write-cycle pause, so the device is ready for the next
    /// access when this returns.
    pub fn write_eeprom(&mut self, offset: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        check_eeprom_range(offset, data.len())?;
        if usize::from(offset) + data.len() > usize::from(EEPROM_TIME_OFFSET) {
            warn!(
                "EEPROM: write of {} bytes at {} overlaps the saved time area",
                data.len(),
                offset
            );
        }

        self.write_eeprom_pages(offset, data)
    }

    pub fn read_eeprom(&mut self, offset: u8, len: usize) -> Result<Vec<u8>, Error<I2C::Error>> {
        check_eeprom_range(offset, len)?;
        let mut buf = vec![0_u8; len];
        self.read_eeprom_into(offset, &mut buf)?;

        Ok(buf)
    }

    /// Single block read, no chunking.
    pub fn read_eeprom_into(&mut self, offset: u8, buf: &mut [u8]) -> Result<(), Error<I2C::Error>> {
        check_eeprom_range(offset, buf.len())?;
        if buf.is_empty() {
            return Ok(());
        }

        self.read_reg(self.config.eeprom_address, offset, buf)
    }

    /// Copies the live register image into EEPROM 248-255.
    ///
    /// Meant to be called periodically (or on power-fail) so that
    /// [`Ds1307::set_time_from_eeprom`] can restore the last known time.
    pub fn save_time_to_eeprom(&mut self) -> Result<(), Error<I2C::Error>> {
        let image = *self.refresh()?;
        self.write_eeprom_pages(EEPROM_TIME_OFFSET, image.as_bytes())?;
        debug!("EEPROM: saved register image {:02x?}", image.as_bytes());

        Ok(())
    }

    /// Loads the image saved by [`Ds1307::save_time_to_eeprom`] and writes it
    /// to the clock.
    ///
    /// Nothing checks that a save ever happened; a blank or reused EEPROM
    /// tail is written to the clock as-is.
    pub fn set_time_from_eeprom(&mut self) -> Result<(), Error<I2C::Error>> {
        let mut raw = [0_u8; REGISTER_IMAGE_LEN];
        self.read_reg(self.config.eeprom_address, EEPROM_TIME_OFFSET, &mut raw)?;
        self.rtc_bcd = raw.into();

        self.write_reg(self.config.rtc_address, DS1307_SEC_REG, &raw)?;
        info!("RTC: time restored from EEPROM {:02x?}", raw);

        Ok(())
    }

    fn write_eeprom_pages(&mut self, offset: u8, data: &[u8]) -> Result<(), Error<I2C::Error>> {
        let mut addr = usize::from(offset);
        let mut rest = data;

        while !rest.is_empty() {
            let room = EEPROM_PAGE_SIZE - addr % EEPROM_PAGE_SIZE;
            let (chunk, tail) = rest.split_at(room.min(rest.len()));

            self.write_reg(self.config.eeprom_address, addr as u8, chunk)?;
            self.delay.delay_ms(self.config.eeprom_write_delay_ms);

            addr += chunk.len();
            rest = tail;
        }

        Ok(())
    }
}

fn check_eeprom_range<E>(offset: u8, len: usize) -> Result<(), Error<E>> {
    if len > EEPROM_SIZE.saturating_sub(usize::from(offset)) {
        return Err(Error::EepromOutOfRange {
            offset: usize::from(offset),
            len,
        });
    }

    Ok(())
}
