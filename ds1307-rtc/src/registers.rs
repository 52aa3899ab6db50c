//! DS1307 register map, bit masks and packed BCD helpers.

/// Default bus address of the DS1307.
pub const DS1307_I2C_ADDR: u8 = 0x68;
/// Default bus address of the companion EEPROM.
pub const EEPROM_I2C_ADDR: u8 = 0x50;
/// The year register only holds two digits, counted from here.
pub const DS1307_BASE_YR: u16 = 2000;

pub const DS1307_SEC_REG: u8 = 0x00;
pub const DS1307_MIN_REG: u8 = 0x01;
pub const DS1307_HR_REG: u8 = 0x02;
pub const DS1307_DOW_REG: u8 = 0x03;
pub const DS1307_DATE_REG: u8 = 0x04;
pub const DS1307_MTH_REG: u8 = 0x05;
pub const DS1307_YR_REG: u8 = 0x06;
pub const DS1307_CTL_REG: u8 = 0x07;

/// Battery-backed RAM, 0x08..=0x3F.
pub const DS1307_RAM_REG: u8 = 0x08;
pub const DS1307_RAM_SIZE: usize = 56;

/// Seconds register through control register.
pub const REGISTER_IMAGE_LEN: usize = 8;

/// Largest payload moved in one block write.
pub const MAX_BLOCK_WRITE: usize = 8;

pub const EEPROM_SIZE: usize = 256;
pub const EEPROM_PAGE_SIZE: usize = 8;
/// The last eight EEPROM bytes hold a saved register image.
pub const EEPROM_TIME_OFFSET: u8 = (EEPROM_SIZE - REGISTER_IMAGE_LEN) as u8;

// Register bit masks
pub const DS1307_CLOCKHALT: u8 = 0b1000_0000;

pub const DS1307_SEC_MASK: u8 = 0b0111_1111;
pub const DS1307_MIN_MASK: u8 = 0b0111_1111;
pub const DS1307_HR_MASK: u8 = 0b0011_1111;
pub const DS1307_DOW_MASK: u8 = 0b0000_0111;
pub const DS1307_DATE_MASK: u8 = 0b0011_1111;
pub const DS1307_MTH_MASK: u8 = 0b0001_1111;
pub const DS1307_YR_MASK: u8 = 0b1111_1111;

/// Field masks indexed by register number.
pub const RTC_MASK: [u8; 7] = [
    DS1307_SEC_MASK,
    DS1307_MIN_MASK,
    DS1307_HR_MASK,
    DS1307_DOW_MASK,
    DS1307_DATE_MASK,
    DS1307_MTH_MASK,
    DS1307_YR_MASK,
];

/// Packed BCD to binary. Exact for 0x00..=0x99.
pub fn bcd_to_bin(val: u8) -> u8 {
    val - 6 * (val >> 4)
}

/// Binary to packed BCD. Exact for 0..=99, wraps above that.
pub fn bin_to_bcd(val: u8) -> u8 {
    val.wrapping_add(6 * (val / 10))
}
