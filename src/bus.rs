// SPDX-License-Identifier: Apache-2.0
//! The bus transport driver.
//!
//! Everything the MLX90640 exposes is a 16-bit word behind a 16-bit address, and all of it is
//! accessed through three primitives: a block read using a repeated start, a register write that
//! is immediately read back for verification, and a general-call reset. The data sheet requires
//! the address phase and the data phase of a read to share one bus acquisition; releasing the bus
//! in between lets other traffic interleave and resets the sensor's internal read pointer. The
//! `embedded-hal` [`WriteRead`][i2c::WriteRead] trait carries exactly that guarantee (on Linux,
//! `linux-embedded-hal` maps it to a single `I2C_RDWR` ioctl with two messages), which is why the
//! driver is generic over those traits instead of a pair of independent transfers.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c;

use crate::common::Address;
use crate::error::{Error, LibraryError};

/// The reserved broadcast address all general-call capable devices listen on.
pub const GENERAL_CALL_ADDRESS: u8 = 0x00;

/// The general-call command that resets every listening device on the bus.
pub const RESET_COMMAND: u8 = 0x06;

/// How long the sensor takes to come back after a reset, in milliseconds.
///
/// The sensor does not respond on the bus during this window, so
/// [`general_reset`][BusDriver::general_reset] waits it out before returning.
pub const RESET_SETTLE_MS: u16 = 50;

/// Exclusive driver for the I²C bus a MLX90640 is attached to.
///
/// The driver owns the channel to the bus; all three bus primitives take `&mut self`, so the
/// compiler enforces that transactions from one driver never interleave. `BUFFER_SIZE` is the
/// size in bytes of the internal transfer buffer, and bounds the largest block read the driver
/// will issue. The [`Mlx90640Bus`][crate::Mlx90640Bus] alias sizes it for a full EEPROM or RAM
/// dump.
///
/// The channel slot may be empty: a driver created with [`closed`][BusDriver::closed] (or one
/// whose [`reopen`][BusDriver::reopen] failed) holds no channel, and every operation fails with
/// [`LibraryError::ChannelClosed`] until a channel is supplied. This mirrors how the sensor is
/// brought up in practice, where opening the bus device may fail long before the first real
/// transaction.
#[derive(Clone, Debug)]
pub struct BusDriver<I2C, const BUFFER_SIZE: usize> {
    /// The channel to the physical bus, if one is open.
    channel: Option<I2C>,

    /// Scratch buffer block reads are received into before byte pairs are reassembled.
    read_buffer: [u8; BUFFER_SIZE],

    /// The most recently requested bus clock, in hertz.
    requested_frequency: Option<u32>,
}

impl<I2C, const BUFFER_SIZE: usize> BusDriver<I2C, BUFFER_SIZE>
where
    I2C: i2c::WriteRead + i2c::Write,
{
    /// Create a driver for an already open channel.
    pub fn new(channel: I2C) -> Self {
        Self {
            channel: Some(channel),
            read_buffer: [0u8; BUFFER_SIZE],
            requested_frequency: None,
        }
    }

    /// Create a driver with no open channel.
    ///
    /// Every bus operation fails with [`LibraryError::ChannelClosed`] until
    /// [`reopen`][Self::reopen] succeeds.
    pub const fn closed() -> Self {
        Self {
            channel: None,
            read_buffer: [0u8; BUFFER_SIZE],
            requested_frequency: None,
        }
    }

    /// Whether the driver currently holds an open channel.
    pub fn is_open(&self) -> bool {
        self.channel.is_some()
    }

    /// Close the current channel (if any) and open a new one.
    ///
    /// The previous channel is dropped *before* `connect` runs, so exclusive transports (such as
    /// an `i2c-dev` file descriptor) can be reacquired without leaking the old descriptor. If
    /// `connect` fails the driver is left with no channel and the connect error is returned.
    pub fn reopen<E, F>(&mut self, connect: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<I2C, E>,
    {
        self.channel = None;
        self.channel = Some(connect()?);
        log::info!("bus channel opened");
        Ok(())
    }

    /// Drop the current channel, leaving the driver in the closed state.
    pub fn close(&mut self) {
        self.channel = None;
    }

    /// Release the channel back to the caller, consuming the driver.
    pub fn free(self) -> Option<I2C> {
        self.channel
    }

    /// Request a bus clock frequency, in hertz.
    ///
    /// The clock cannot be set through the channel itself; on the original Jetson Nano target it
    /// is configured through `/sys/class/i2c-adapter/<bus>/bus_clk_rate`. The request is recorded
    /// and logged so calling code (and tests) can confirm it was made, but no bus traffic
    /// results.
    pub fn set_frequency(&mut self, frequency_hz: u32) {
        log::info!(
            "bus clock of {} Hz requested; apply it through the platform's clock configuration",
            frequency_hz
        );
        self.requested_frequency = Some(frequency_hz);
    }

    /// The most recently requested bus clock frequency, in hertz.
    pub fn requested_frequency(&self) -> Option<u32> {
        self.requested_frequency
    }

    /// Read a block of 16-bit words starting at `start_address`, filling `words`.
    ///
    /// The whole block is transferred in one transaction: the two address bytes are written, then
    /// `2 × words.len()` data bytes are read after a repeated start. On success, `words[i]` holds
    /// the big-endian-decoded word at `start_address + i`. On failure nothing is written to
    /// `words`; a failed read produces no partial output.
    ///
    /// Reads larger than the transfer buffer are rejected with [`LibraryError::ReadTooLong`]; the
    /// driver never splits a request into multiple transactions.
    pub fn read_block(
        &mut self,
        device_address: u8,
        start_address: Address,
        words: &mut [u16],
    ) -> Result<(), Error<I2C>> {
        if words.is_empty() {
            // The camera rejects zero-length reads, so don't put one on the wire.
            return Ok(());
        }
        let byte_count = words.len() * 2;
        if byte_count > BUFFER_SIZE {
            return Err(LibraryError::ReadTooLong {
                requested: words.len(),
                capacity: BUFFER_SIZE / 2,
            }
            .into());
        }
        let channel = self
            .channel
            .as_mut()
            .ok_or(LibraryError::ChannelClosed)?;
        let address_bytes = start_address.as_bytes();
        let buffer = &mut self.read_buffer[..byte_count];
        channel
            .write_read(device_address, &address_bytes, buffer)
            .map_err(Error::I2cWriteReadError)?;
        // The sensor transmits most significant byte first.
        for (word, bytes) in words.iter_mut().zip(buffer.chunks_exact(2)) {
            *word = u16::from_be_bytes([bytes[0], bytes[1]]);
        }
        Ok(())
    }

    /// Write a 16-bit word to a register and read it back to confirm it was stored.
    ///
    /// The data sheet (§11.2) requires every register write to be verified with a read-back, so
    /// this always costs two bus transactions: a 4-byte write (address then value, both
    /// MSB-first) and a 1-word read at the same address. A transport failure on either
    /// transaction surfaces as the matching I²C error variant; only a successful read-back that
    /// disagrees with the written value produces
    /// [`VerificationMismatch`][Error::VerificationMismatch], as the remediation for the two is
    /// different (a mismatch usually means retrying the write or checking the supply voltage
    /// rather than the wiring).
    pub fn write_register(
        &mut self,
        device_address: u8,
        register_address: Address,
        value: u16,
    ) -> Result<(), Error<I2C>> {
        let address_bytes = register_address.as_bytes();
        let value_bytes = value.to_be_bytes();
        let payload = [
            address_bytes[0],
            address_bytes[1],
            value_bytes[0],
            value_bytes[1],
        ];
        let channel = self
            .channel
            .as_mut()
            .ok_or(LibraryError::ChannelClosed)?;
        channel
            .write(device_address, &payload)
            .map_err(Error::I2cWriteError)?;
        let mut read_back = [0u16; 1];
        self.read_block(device_address, register_address, &mut read_back)?;
        if read_back[0] != value {
            return Err(Error::VerificationMismatch {
                address: register_address,
                expected: value,
                actual: read_back[0],
            });
        }
        Ok(())
    }

    /// Reset every general-call capable device on the bus, then wait for the sensor to reboot.
    ///
    /// The reset command is a single byte written to the broadcast address, not to the sensor's
    /// own address. After the write is acknowledged the sensor is unresponsive for its power-on
    /// time, so the driver waits [`RESET_SETTLE_MS`] on the provided delay before returning; the
    /// wait is part of this operation's contract, not the caller's concern. The delay is skipped
    /// when the transport write itself fails.
    pub fn general_reset<D>(&mut self, delay: &mut D) -> Result<(), Error<I2C>>
    where
        D: DelayMs<u16>,
    {
        let channel = self
            .channel
            .as_mut()
            .ok_or(LibraryError::ChannelClosed)?;
        channel
            .write(GENERAL_CALL_ADDRESS, &[RESET_COMMAND])
            .map_err(Error::I2cWriteError)?;
        delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }
}
