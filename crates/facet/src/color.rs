//! # Color: Packing Tint and Alpha Into One Word
//!
//! The shader reads a vertex's tint as four normalized bytes. On the CPU side
//! that is a single `u32`: the 24-bit RGB color in the low three bytes and the
//! alpha byte on top.
//!
//! ```text
//!  bit 31      24 23      16 15       8 7        0
//!  ┌───────────┬───────────┬──────────┬──────────┐
//!  │  alpha    │  red      │  green   │  blue    │
//!  └───────────┴───────────┴──────────┴──────────┘
//! ```
//!
//! Read as `Unorm8x4` on a little-endian host the bytes arrive as
//! `(b, g, r, a)`; the shader swizzles `.bgr` back.
//!
//! Packing is a seam ([`ColorPacker`]) so a renderer with a different tint
//! format can plug its own in without touching the vertex code.

/// Converts a 24-bit color plus a combined float alpha into the 32-bit tint
/// word written to the vertex stream.
pub trait ColorPacker {
    fn pack(&self, rgb: u32, alpha: f64) -> u32;
}

impl<F: Fn(u32, f64) -> u32> ColorPacker for F {
    fn pack(&self, rgb: u32, alpha: f64) -> u32 {
        self(rgb, alpha)
    }
}

/// The default packer: `alpha << 24 | rgb`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TintPacker;

impl ColorPacker for TintPacker {
    fn pack(&self, rgb: u32, alpha: f64) -> u32 {
        pack_tint(rgb, alpha)
    }
}

/// Pack `rgb` with `alpha` in the top byte.
///
/// Alpha is clamped to [0, 1] and truncated to 8 bits; NaN packs as 0.
/// Bits of `rgb` above the low 24 are discarded.
pub fn pack_tint(rgb: u32, alpha: f64) -> u32 {
    // `as u8` saturates and maps NaN to 0.
    let a = (alpha.clamp(0.0, 1.0) * 255.0) as u8;
    (u32::from(a) << 24) | (rgb & 0x00FF_FFFF)
}

/// Split a packed word back into `(rgb, alpha_byte)`.
pub fn unpack_tint(word: u32) -> (u32, u8) {
    (word & 0x00FF_FFFF, (word >> 24) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_red() {
        assert_eq!(pack_tint(0xFF0000, 1.0), 0xFFFF_0000);
    }

    #[test]
    fn alpha_is_truncated_not_rounded() {
        // 0.5 * 255 = 127.5
        let (_, a) = unpack_tint(pack_tint(0x123456, 0.5));
        assert_eq!(a, 127);
    }

    #[test]
    fn out_of_range_alpha_is_clamped() {
        assert_eq!(unpack_tint(pack_tint(0xFFFFFF, 3.0)).1, 255);
        assert_eq!(unpack_tint(pack_tint(0xFFFFFF, -1.0)).1, 0);
        assert_eq!(unpack_tint(pack_tint(0xFFFFFF, f64::NAN)).1, 0);
    }

    #[test]
    fn high_color_bits_are_dropped() {
        assert_eq!(pack_tint(0xAB00_FF00, 0.0), 0x0000_FF00);
    }

    #[test]
    fn alpha_byte_never_decreases() {
        let mut last = 0u8;
        for i in 0..=1000 {
            let (_, a) = unpack_tint(pack_tint(0, i as f64 / 1000.0));
            assert!(a >= last, "alpha byte dropped at step {i}");
            last = a;
        }
        assert_eq!(last, 255);
    }

    #[test]
    fn closures_are_packers() {
        let swap = |rgb: u32, _alpha: f64| rgb.swap_bytes();
        assert_eq!(swap.pack(0x0011_2233, 1.0), 0x3322_1100);
    }
}
