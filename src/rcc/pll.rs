use crate::rcc::{HSE_FREQ, HSI_FREQ, PLL_MULTIPLIER};
use crate::time::Hertz;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// PLL input clock selection
///
/// The PLL on this part has a single fixed x2 ratio; only the input clock is
/// selectable via the PLLSRC bit.
pub enum PllSource {
    /// High-speed 24 MHz internal clock
    HSI,
    /// High-speed external clock
    HSE,
}

impl PllSource {
    /// Decodes the PLLSRC bit of CFGR0
    pub fn from_bit(bit: bool) -> Self {
        if bit {
            Self::HSE
        } else {
            Self::HSI
        }
    }

    pub fn source_bit(self) -> bool {
        self == Self::HSE
    }

    /// Nominal PLL output frequency for this input, input clock times the
    /// fixed multiplier
    pub fn output_freq(self) -> Hertz {
        let input = match self {
            Self::HSI => HSI_FREQ,
            Self::HSE => HSE_FREQ,
        };

        Hertz::from_raw(input.raw() * PLL_MULTIPLIER)
    }
}
