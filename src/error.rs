// SPDX-License-Identifier: Apache-2.0
#[cfg(feature = "std")]
extern crate std;

use core::fmt;

use embedded_hal::blocking::i2c;

use crate::common::Address;

/// Errors that don't involve I²C.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LibraryError {
    /// An operation was issued against a driver whose channel is not open.
    ///
    /// This happens when the driver was created with [`closed`][crate::BusDriver::closed], after
    /// [`close`][crate::BusDriver::close], or after a failed
    /// [`reopen`][crate::BusDriver::reopen].
    ChannelClosed,

    /// A block read was requested that does not fit in the driver's transfer buffer.
    ///
    /// The driver never splits a read into multiple transactions; smaller requests are the
    /// caller's responsibility. Both counts are in 16-bit words.
    ReadTooLong { requested: usize, capacity: usize },
}

impl fmt::Display for LibraryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryError::ChannelClosed => write!(f, "the bus channel is not open"),
            LibraryError::ReadTooLong {
                requested,
                capacity,
            } => write!(
                f,
                "block read of {} words exceeds the transfer buffer capacity of {} words",
                requested, capacity
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LibraryError {}

/// Errors from the MLX90640 transport driver.
///
/// The transport and verification failure kinds are deliberately separate: a transport failure
/// points at the bus itself (wiring, a NACKing device, a missing adapter), while a
/// [`VerificationMismatch`][Error::VerificationMismatch] means the bus is healthy but the sensor
/// did not keep the value it acknowledged, which usually calls for retrying the write or checking
/// the supply rail.
pub enum Error<I2C>
where
    I2C: i2c::WriteRead + i2c::Write,
{
    /// An error from the I²C implementation during a write-only transaction.
    I2cWriteError(<I2C as i2c::Write>::Error),

    /// An error from the I²C implementation during a combined write-read transaction.
    ///
    /// The write-then-verify sequence in [`write_register`][crate::BusDriver::write_register]
    /// also uses this variant when the *verification read* fails at the transport level; that
    /// case leaves the write status unknown but is still a bus problem, not a mismatch.
    I2cWriteReadError(<I2C as i2c::WriteRead>::Error),

    /// A register write was acknowledged, but reading the register back produced a different
    /// value.
    VerificationMismatch {
        address: Address,
        expected: u16,
        actual: u16,
    },

    /// Errors originating from within this library.
    LibraryError(LibraryError),
}

// Custom Debug implementation so that I2C doesn't need to implement Debug (like the one from
// linux-embedded-hal).
impl<I2C> fmt::Debug for Error<I2C>
where
    I2C: i2c::WriteRead + i2c::Write,
    <I2C as i2c::WriteRead>::Error: fmt::Debug,
    <I2C as i2c::Write>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2cWriteError(i2c_error) => f
                .debug_tuple("Error::I2cWriteError")
                .field(i2c_error)
                .finish(),
            Error::I2cWriteReadError(i2c_error) => f
                .debug_tuple("Error::I2cWriteReadError")
                .field(i2c_error)
                .finish(),
            Error::VerificationMismatch {
                address,
                expected,
                actual,
            } => f
                .debug_struct("Error::VerificationMismatch")
                .field("address", address)
                .field("expected", expected)
                .field("actual", actual)
                .finish(),
            Error::LibraryError(err) => f.debug_tuple("Error::LibraryError").field(err).finish(),
        }
    }
}

impl<I2C> fmt::Display for Error<I2C>
where
    I2C: i2c::WriteRead + i2c::Write,
    <I2C as i2c::WriteRead>::Error: fmt::Debug,
    <I2C as i2c::Write>::Error: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::I2cWriteError(i2c_error) => write!(f, "I2C write error: {:?}", i2c_error),
            Error::I2cWriteReadError(i2c_error) => {
                write!(f, "I2C write-read error: {:?}", i2c_error)
            }
            Error::VerificationMismatch {
                address,
                expected,
                actual,
            } => write!(
                f,
                "register {} read back as {:#06X} after writing {:#06X}",
                address, actual, expected
            ),
            Error::LibraryError(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(feature = "std")]
impl<I2C> std::error::Error for Error<I2C>
where
    I2C: i2c::WriteRead + i2c::Write,
    <I2C as i2c::WriteRead>::Error: std::error::Error + 'static,
    <I2C as i2c::Write>::Error: std::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::I2cWriteError(i2c_error) => Some(i2c_error),
            Error::I2cWriteReadError(i2c_error) => Some(i2c_error),
            Error::VerificationMismatch { .. } => None,
            Error::LibraryError(lib_err) => Some(lib_err),
        }
    }
}

impl<I2C> From<LibraryError> for Error<I2C>
where
    I2C: i2c::WriteRead + i2c::Write,
{
    fn from(lib_err: LibraryError) -> Self {
        Self::LibraryError(lib_err)
    }
}
