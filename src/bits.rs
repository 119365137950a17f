// Nibble and bit helpers shared by the decoder and the sprite blitter.

use crate::memory::TypeAddr;

pub fn high_nibble(byte: u8) -> u8 {
    (byte & 0xF0) >> 4
}

pub fn low_nibble(byte: u8) -> u8 {
    byte & 0x0F
}

/// Splits two bytes into the four nibbles of an instruction, most significant first.
pub fn nibbles(hi: u8, lo: u8) -> [u8; 4] {
    [
        high_nibble(hi),
        low_nibble(hi),
        high_nibble(lo),
        low_nibble(lo),
    ]
}

// NN
pub fn byte_from_nibbles(high: u8, low: u8) -> u8 {
    (high << 4) | (low & 0x0F)
}

// NNN
pub fn addr_from_nibbles(high: u8, mid: u8, low: u8) -> TypeAddr {
    ((high as TypeAddr & 0xF) << 8) | ((mid as TypeAddr & 0xF) << 4) | (low as TypeAddr & 0xF)
}

/// Bit `n` of `byte`, counting from the least significant bit.
pub fn nth_bit(n: u8, byte: u8) -> bool {
    byte & (1 << n) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nibbles() {
        assert_eq!(high_nibble(0x4C), 0x4);
        assert_eq!(low_nibble(0x4C), 0xC);
        assert_eq!(nibbles(0x4C, 0xEE), [0x4, 0xC, 0xE, 0xE]);
    }

    #[test]
    fn test_recompose() {
        assert_eq!(byte_from_nibbles(0xC, 0xE), 0xCE);
        assert_eq!(addr_from_nibbles(0xC, 0xE, 0xE), 0xCEE);
        assert_eq!(addr_from_nibbles(0x0, 0x0, 0x1), 0x001);
    }

    #[test]
    fn test_nth_bit() {
        assert!(nth_bit(7, 0x80));
        assert!(!nth_bit(6, 0x80));
        assert!(nth_bit(0, 0x01));
    }
}
