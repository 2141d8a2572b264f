// SPDX-License-Identifier: Apache-2.0
//! MLX90640-specific constants and the bulk reads its collaborators consume.
//!
//! The calibration library is a black box to this crate: it takes the raw EEPROM image once at
//! startup and a raw frame per polling cycle, and produces a [`NUM_PIXELS`]-element grid of
//! temperatures in degrees, [`HEIGHT`] rows of [`WIDTH`] values in row-major order. Everything
//! here exists to feed it words in the layout it expects.

use embedded_hal::blocking::i2c;

use crate::bus::BusDriver;
use crate::common::Address;
use crate::error::Error;

/// The factory-default I²C address for the MLX90640.
///
/// The address is reconfigurable in EEPROM (to anything except 0x00), but 0x33 is what modules
/// ship with.
pub const DEFAULT_ADDRESS: u8 = 0x33;

/// Height of the thermal image, in pixels.
pub const HEIGHT: usize = 24;

/// Width of the thermal image, in pixels.
pub const WIDTH: usize = 32;

/// The total number of pixels in the thermal image.
pub const NUM_PIXELS: usize = HEIGHT * WIDTH;

/// The first address of the camera's EEPROM.
pub const EEPROM_BASE: Address = Address::new(0x2400);

/// The length of the camera's EEPROM image, in 16-bit words.
pub const EEPROM_LENGTH: usize = 832;

/// The first address of the camera's measurement RAM.
pub const RAM_BASE: Address = Address::new(0x0400);

/// The length of the camera's measurement RAM, in 16-bit words.
pub const RAM_LENGTH: usize = 832;

/// The length of one frame in the calibration library's layout, in 16-bit words.
///
/// A frame is the full RAM image followed by the control register word and the status register
/// word.
pub const FRAME_LENGTH: usize = RAM_LENGTH + 2;

/// The status register (0x8000).
pub const STATUS_REGISTER: Address = Address::new(0x8000);

/// Control register 1 (0x800D).
pub const CONTROL_REGISTER: Address = Address::new(0x800D);

/// The I²C configuration register (0x800F).
pub const I2C_CONFIG_REGISTER: Address = Address::new(0x800F);

/// Read the camera's complete EEPROM image.
///
/// This is the bulk read the calibration library performs once at startup to extract the factory
/// calibration parameters. It is a single 832-word block read starting at [`EEPROM_BASE`].
pub fn dump_eeprom<I2C, const BUFFER_SIZE: usize>(
    bus: &mut BusDriver<I2C, BUFFER_SIZE>,
    device_address: u8,
    destination: &mut [u16; EEPROM_LENGTH],
) -> Result<(), Error<I2C>>
where
    I2C: i2c::WriteRead + i2c::Write,
{
    bus.read_block(device_address, EEPROM_BASE, destination)
}

/// Read one frame of raw data in the layout the calibration library expects.
///
/// The destination is filled with the 832 RAM words, then the control register word at index 832,
/// then the status register word at index 833. The registers are not contiguous with RAM, so
/// this costs three bus transactions.
pub fn read_frame<I2C, const BUFFER_SIZE: usize>(
    bus: &mut BusDriver<I2C, BUFFER_SIZE>,
    device_address: u8,
    destination: &mut [u16; FRAME_LENGTH],
) -> Result<(), Error<I2C>>
where
    I2C: i2c::WriteRead + i2c::Write,
{
    let (pixels, registers) = destination.split_at_mut(RAM_LENGTH);
    bus.read_block(device_address, RAM_BASE, pixels)?;
    bus.read_block(device_address, CONTROL_REGISTER, &mut registers[..1])?;
    bus.read_block(device_address, STATUS_REGISTER, &mut registers[1..])?;
    Ok(())
}

#[cfg(test)]
mod test {
    extern crate std;

    use crate::test::{eeprom_pattern, mock_sensor_at_address, ram_pattern};
    use crate::Mlx90640Bus;

    use super::*;

    #[test]
    fn eeprom_dump_decodes_the_full_image_in_order() {
        let mock = mock_sensor_at_address(DEFAULT_ADDRESS);
        let mut bus = Mlx90640Bus::new(mock.clone());
        mock.clear_recent_operations();
        let mut eeprom = [0u16; EEPROM_LENGTH];
        dump_eeprom(&mut bus, DEFAULT_ADDRESS, &mut eeprom).unwrap();
        assert_eq!(
            mock.recent_operations().len(),
            1,
            "the EEPROM dump is a single transaction"
        );
        for (index, &word) in eeprom.iter().enumerate() {
            let expected =
                u16::from_be_bytes([eeprom_pattern(index * 2), eeprom_pattern(index * 2 + 1)]);
            assert_eq!(word, expected, "EEPROM word {} decoded incorrectly", index);
        }
    }

    #[test]
    fn frame_layout_is_ram_then_control_then_status() {
        let mock = mock_sensor_at_address(DEFAULT_ADDRESS);
        let mut bus = Mlx90640Bus::new(mock);
        let mut frame = [0u16; FRAME_LENGTH];
        read_frame(&mut bus, DEFAULT_ADDRESS, &mut frame).unwrap();
        for (index, &word) in frame[..RAM_LENGTH].iter().enumerate() {
            let expected = u16::from_be_bytes([ram_pattern(index * 2), ram_pattern(index * 2 + 1)]);
            assert_eq!(word, expected, "RAM word {} decoded incorrectly", index);
        }
        // Power-on defaults set by the mock.
        assert_eq!(frame[832], 0x1901, "control register word");
        assert_eq!(frame[833], 0x0008, "status register word");
    }

    #[test]
    fn grid_contract() {
        assert_eq!(NUM_PIXELS, 768);
        assert_eq!(FRAME_LENGTH, 834);
    }
}
