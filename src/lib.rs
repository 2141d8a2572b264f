// SPDX-License-Identifier: Apache-2.0
//! A transport driver for talking to the Melexis MLX90640 thermal camera over I²C.
//!
//! The MLX90640 is picky about how it is addressed: every read is a two-phase transaction (write
//! the 16-bit register address, then read the data after a *repeated start*, without releasing
//! the bus in between), every register write must be read back for verification, and the only
//! reliable reset is an I²C general call followed by a settling wait. This crate implements
//! exactly that transport layer and nothing else; converting raw words into temperatures is the
//! job of a calibration library, and drawing or persisting the resulting 24×32 grid is the job
//! of an imaging layer.
//!
//! The driver is generic over the [`embedded-hal`][embedded-hal] blocking I²C traits, whose
//! `write_read` operation carries the repeated-start guarantee. On Linux,
//! [`linux-embedded-hal`]'s `I2cdev` implements them on top of the `I2C_RDWR` ioctl, which is
//! what the original Jetson Nano deployment used.
//!
//! [embedded-hal]: https://docs.rs/embedded-hal/0.2/embedded_hal/blocking/i2c/index.html
//! [`linux-embedded-hal`]: https://docs.rs/linux-embedded-hal/0.3
//!
//! ```no_run
//! use linux_embedded_hal::{Delay, I2cdev};
//! use mlx90640_i2c::{mlx90640, Mlx90640Bus};
//!
//! let channel = I2cdev::new("/dev/i2c-1").expect("/dev/i2c-1 needs to be an I2C controller");
//! let mut bus = Mlx90640Bus::new(channel);
//! bus.general_reset(&mut Delay {})?;
//! // The calibration library consumes the EEPROM image once at startup.
//! let mut eeprom = [0u16; mlx90640::EEPROM_LENGTH];
//! mlx90640::dump_eeprom(&mut bus, mlx90640::DEFAULT_ADDRESS, &mut eeprom)?;
//! // ...then raw frames, one per polling cycle.
//! let mut frame = [0u16; mlx90640::FRAME_LENGTH];
//! mlx90640::read_frame(&mut bus, mlx90640::DEFAULT_ADDRESS, &mut frame)?;
//! # Ok::<(), mlx90640_i2c::Error<I2cdev>>(())
//! ```
//!
//! The driver never retries: every failure is surfaced as a typed [`Error`] so the caller can
//! pick a remediation. A failed startup read is usually fatal (no calibration data means no
//! meaningful operation), while a failed frame read in the steady-state loop is normally handled
//! by skipping that cycle and polling again.

#![no_std]

pub mod bus;
pub mod common;
pub mod error;
pub mod mlx90640;
#[cfg(test)]
mod test;

pub use bus::{BusDriver, GENERAL_CALL_ADDRESS, RESET_COMMAND, RESET_SETTLE_MS};
pub use common::Address;
pub use error::{Error, LibraryError};

/// A [`BusDriver`] with a transfer buffer sized for the MLX90640's largest block read (a full
/// EEPROM or RAM dump of 832 words).
pub type Mlx90640Bus<I2C> = BusDriver<I2C, { mlx90640::EEPROM_LENGTH * 2 }>;
