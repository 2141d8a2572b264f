// SPDX-License-Identifier: Apache-2.0
//! Types shared between the transport driver and the camera-specific module.

use core::fmt;

/// An address within the camera's memory map.
///
/// The MLX90640 uses 16-bit register addresses, transmitted most significant byte first. This is
/// a thin wrapper to keep register addresses from being mixed up with register values (which are
/// also 16 bits wide).
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord, Hash)]
pub struct Address(u16);

impl Address {
    /// Wrap the given address in an `Address`.
    ///
    /// This function is intended to be used in const contexts, in other cases the
    /// [`From`][core::convert::From] implementations are probably easier to use.
    pub const fn new(address: u16) -> Self {
        Self(address)
    }

    /// The address in wire order (most significant byte first).
    pub(crate) fn as_bytes(&self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06X}", self.0)
    }
}

impl From<u16> for Address {
    fn from(raw_address: u16) -> Self {
        Self::new(raw_address)
    }
}

impl From<Address> for u16 {
    fn from(address: Address) -> Self {
        address.0
    }
}

impl From<Address> for usize {
    fn from(address: Address) -> Self {
        address.0 as usize
    }
}

#[cfg(test)]
mod test {
    use super::Address;

    #[test]
    fn wire_order_is_big_endian() {
        assert_eq!(Address::new(0x2400).as_bytes(), [0x24, 0x00]);
        assert_eq!(Address::new(0x800D).as_bytes(), [0x80, 0x0D]);
    }
}
