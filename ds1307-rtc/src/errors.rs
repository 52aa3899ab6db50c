use std::error::Error as StdError;
use std::fmt;
use std::io::Error as IoError;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Driver error, generic over the bus error `E`.
#[derive(Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The bus transaction failed; passed through untouched.
    I2c(E),
    /// EEPROM access past the end of its 256 byte address space.
    EepromOutOfRange { offset: usize, len: usize },
    /// RAM access outside registers 0x08-0x3F.
    RamOutOfRange { offset: usize, len: usize },
    /// The clock registers do not hold a calendar date/time.
    InvalidDateTime,
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(e) => write!(f, "I2C bus error: {:?}", e),
            Self::EepromOutOfRange { offset, len } => write!(
                f,
                "EEPROM access of {} bytes at offset {} runs past the end of the device",
                len, offset
            ),
            Self::RamOutOfRange { offset, len } => write!(
                f,
                "RAM access of {} bytes at offset {} runs past the end of the RTC RAM",
                len, offset
            ),
            Self::InvalidDateTime => write!(f, "RTC registers do not hold a valid date/time"),
        }
    }
}

impl<E: fmt::Debug> StdError for Error<E> {}

/// Failures while bringing up the board in the demonstration programs.
#[derive(Debug)]
#[allow(clippy::enum_variant_names)]
pub enum InitError {
    AnyhowError(anyhow::Error),
    IoError(IoError),
    I2cError(BoxError),
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyhowError(e) => write!(f, "{:#}", e),
            Self::IoError(e) => write!(f, "I/O error: {}", e),
            Self::I2cError(e) => write!(f, "I2C setup failed: {}", e),
        }
    }
}

impl StdError for InitError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::AnyhowError(e) => Some(&**e),
            Self::IoError(e) => Some(e),
            Self::I2cError(e) => Some(&**e),
        }
    }
}

impl From<anyhow::Error> for InitError {
    fn from(e: anyhow::Error) -> Self {
        Self::AnyhowError(e)
    }
}

impl From<IoError> for InitError {
    fn from(e: IoError) -> Self {
        Self::IoError(e)
    }
}

#[cfg(feature = "raspberrypi")]
impl From<rppal::i2c::Error> for InitError {
    fn from(e: rppal::i2c::Error) -> Self {
        Self::I2cError(e.into())
    }
}

impl<E> From<Error<E>> for InitError
where
    E: fmt::Debug + Send + Sync + 'static,
{
    fn from(e: Error<E>) -> Self {
        Self::I2cError(e.into())
    }
}
