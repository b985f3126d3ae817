//! CPU main clock, provided by the SYSCLK divided by a configurable factor

use crate::time::Hertz;

/// Decoded AHB (HCLK) prescaler setting.
///
/// The 4-bit HPRE field packs three modes: `0b0000` switches the prescaler
/// off entirely, `0b0001..=0b0111` divide by the field value plus one, and
/// settings with the high bit set shift right instead, reaching divisors up
/// to 256.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AhbPrescaler {
    /// Prescaler off, HCLK = SYSCLK
    Off,
    /// Integer division by a factor in 2..=8
    Div(u8),
    /// Power-of-two division by right shift, count in 1..=8
    Shift(u8),
}

impl AhbPrescaler {
    /// Decodes the HPRE field. Total over all 16 encodings.
    pub fn from_bits(bits: u8) -> Self {
        let count = (bits & 0x7) + 1;

        if bits == 0b0000 {
            Self::Off
        } else if bits & 0b1000 != 0 {
            Self::Shift(count)
        } else {
            Self::Div(count)
        }
    }

    pub fn bits(self) -> u8 {
        match self {
            Self::Off => 0b0000,
            Self::Div(factor) => factor - 1,
            Self::Shift(count) => 0b1000 | (count - 1),
        }
    }

    /// Applies the prescaler to the SYSCLK frequency
    pub fn apply(self, sysclk: Hertz) -> Hertz {
        match self {
            Self::Off => sysclk,
            Self::Div(factor) => Hertz::from_raw(sysclk.raw() / factor as u32),
            Self::Shift(count) => Hertz::from_raw(sysclk.raw() >> count),
        }
    }
}
