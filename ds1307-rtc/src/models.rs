use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::registers::{
    bcd_to_bin, bin_to_bcd, DS1307_CLOCKHALT, DS1307_CTL_REG, REGISTER_IMAGE_LEN, RTC_MASK,
};

/// Time fields, numbered like the registers that hold them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TimeType {
    Second = 0,
    Minute,
    Hour,
    DayOfWeek,
    Date,
    Month,
    Year,
}

impl TimeType {
    pub const ALL: [TimeType; 7] = [
        Self::Second,
        Self::Minute,
        Self::Hour,
        Self::DayOfWeek,
        Self::Date,
        Self::Month,
        Self::Year,
    ];

    pub fn register(&self) -> u8 {
        *self as u8
    }

    pub fn mask(&self) -> u8 {
        RTC_MASK[*self as usize]
    }
}

/// Human-readable time as kept by the DS1307.
///
/// Ranges: second/minute 0-59, hour 0-23, day_of_week 1-7, date 1-31,
/// month 1-12, year 2000-2099. Nothing here enforces them; out-of-range
/// values are masked when written and end up as a different time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRecord {
    pub second: u16,
    pub minute: u16,
    pub hour: u16,
    pub day_of_week: u16,
    pub date: u16,
    pub month: u16,
    pub year: u16,
}

impl TimeRecord {
    pub fn get(&self, field: TimeType) -> u16 {
        match field {
            TimeType::Second => self.second,
            TimeType::Minute => self.minute,
            TimeType::Hour => self.hour,
            TimeType::DayOfWeek => self.day_of_week,
            TimeType::Date => self.date,
            TimeType::Month => self.month,
            TimeType::Year => self.year,
        }
    }

    pub fn set(&mut self, field: TimeType, value: u16) {
        match field {
            TimeType::Second => self.second = value,
            TimeType::Minute => self.minute = value,
            TimeType::Hour => self.hour = value,
            TimeType::DayOfWeek => self.day_of_week = value,
            TimeType::Date => self.date = value,
            TimeType::Month => self.month = value,
            TimeType::Year => self.year = value,
        }
    }

    pub fn to_array(&self) -> [u16; 7] {
        TimeType::ALL.map(|field| self.get(field))
    }

    pub fn weekday(&self) -> Weekday {
        (self.day_of_week as u8).into()
    }

    /// Calendar view of the record; `None` if the fields are not a real date.
    pub fn to_naive_datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(
            i32::from(self.year),
            u32::from(self.month),
            u32::from(self.date),
        )?
        .and_hms_opt(
            u32::from(self.hour),
            u32::from(self.minute),
            u32::from(self.second),
        )
    }

    pub fn to_s(&self) -> String {
        format!(
            "{}/{}/{}-{} {}:{}:{}",
            self.year, self.month, self.date, self.day_of_week, self.hour, self.minute, self.second
        )
    }
}

impl From<[u16; 7]> for TimeRecord {
    fn from(rtc: [u16; 7]) -> Self {
        let mut record = Self::default();
        for field in TimeType::ALL {
            record.set(field, rtc[field as usize]);
        }

        record
    }
}

impl From<TimeRecord> for [u16; 7] {
    fn from(record: TimeRecord) -> Self {
        record.to_array()
    }
}

impl From<&NaiveDateTime> for TimeRecord {
    fn from(dt: &NaiveDateTime) -> Self {
        let weekday: Weekday = dt.weekday().into();

        Self {
            second: dt.second() as u16,
            minute: dt.minute() as u16,
            hour: dt.hour() as u16,
            day_of_week: u16::from(weekday.value()),
            date: dt.day() as u16,
            month: dt.month() as u16,
            year: dt.year() as u16,
        }
    }
}

impl fmt::Display for TimeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}-{:0>2}-{:0>2} {:0>2}:{:0>2}:{:0>2}",
            self.weekday(),
            self.year,
            self.month,
            self.date,
            self.hour,
            self.minute,
            self.second
        )
    }
}

/// Raw copy of registers 0x00-0x07 (seconds through control).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterImage(pub [u8; REGISTER_IMAGE_LEN]);

impl RegisterImage {
    pub fn as_bytes(&self) -> &[u8; REGISTER_IMAGE_LEN] {
        &self.0
    }

    pub fn byte(&self, field: TimeType) -> u8 {
        self.0[field as usize]
    }

    pub fn control(&self) -> u8 {
        self.0[DS1307_CTL_REG as usize]
    }

    pub fn is_halted(&self) -> bool {
        self.0[TimeType::Second as usize] & DS1307_CLOCKHALT != 0
    }

    pub fn set_halted(&mut self, halted: bool) {
        let sec = &mut self.0[TimeType::Second as usize];
        if halted {
            *sec |= DS1307_CLOCKHALT;
        } else {
            *sec &= !DS1307_CLOCKHALT;
        }
    }

    /// Binary value of one field, without the base year.
    pub fn decode(&self, field: TimeType) -> u8 {
        bcd_to_bin(self.byte(field) & field.mask())
    }

    /// Merge a binary value into one field, keeping the bits outside its mask.
    ///
    /// The value is masked before encoding and the BCD result is masked again,
    /// so an out-of-range value wraps inside the field instead of spilling into
    /// neighbouring flags such as the clock-halt bit.
    pub fn merge(&mut self, field: TimeType, value: u8) {
        let mask = field.mask();
        let bcd = bin_to_bcd(value & mask) & mask;
        let byte = &mut self.0[field as usize];
        *byte = (*byte & !mask) | bcd;
    }
}

impl From<[u8; REGISTER_IMAGE_LEN]> for RegisterImage {
    fn from(raw: [u8; REGISTER_IMAGE_LEN]) -> Self {
        Self(raw)
    }
}

/// SQW/OUT pin modes, as written to the control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum SqwPinMode {
    /// No square wave, output held low.
    Low = 0x00,
    /// No square wave, output held high.
    High = 0x80,
    Hz1 = 0x10,
    KHz4 = 0x11,
    KHz8 = 0x12,
    KHz32 = 0x13,
}

impl SqwPinMode {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::High => "high",
            Self::Hz1 => "1Hz",
            Self::KHz4 => "4.096kHz",
            Self::KHz8 => "8.192kHz",
            Self::KHz32 => "32.768kHz",
        }
    }
}

impl TryFrom<u8> for SqwPinMode {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x00 => Ok(Self::Low),
            0x80 => Ok(Self::High),
            0x10 => Ok(Self::Hz1),
            0x11 => Ok(Self::KHz4),
            0x12 => Ok(Self::KHz8),
            0x13 => Ok(Self::KHz32),
            other => Err(other),
        }
    }
}

impl fmt::Display for SqwPinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// The DS1307 day register just counts 1-7; Sunday first is our convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Sunday = 1,
    Monday = 2,
    Tuesday = 3,
    Wednesday = 4,
    Thursday = 5,
    Friday = 6,
    Saturday = 7,
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Weekday {
    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunday => "Sunday",
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
        }
    }

    // Returns the first 3-letters of the day of the week
    pub fn as_short(&self) -> &'static str {
        &self.as_str()[..3]
    }
}

impl From<u8> for Weekday {
    fn from(day: u8) -> Self {
        match day {
            1 => Self::Sunday,
            2 => Self::Monday,
            3 => Self::Tuesday,
            4 => Self::Wednesday,
            5 => Self::Thursday,
            6 => Self::Friday,
            7 => Self::Saturday,
            _ => Self::Sunday,
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Self::Sunday,
            chrono::Weekday::Mon => Self::Monday,
            chrono::Weekday::Tue => Self::Tuesday,
            chrono::Weekday::Wed => Self::Wednesday,
            chrono::Weekday::Thu => Self::Thursday,
            chrono::Weekday::Fri => Self::Friday,
            chrono::Weekday::Sat => Self::Saturday,
        }
    }
}
