//! SYSCLK derivation from live clock configuration state.
//!
//! Pure calculation over a single CFGR0 snapshot, so a torn view is
//! impossible even if something reprograms the clock tree between calls.

use crate::rcc::{AhbPrescaler, Cfgr0, PllSource, SysclkSource, HSE_FREQ, HSI_FREQ};
use crate::time::Hertz;

/// Base clock frequency of the active system clock source.
///
/// A reserved SWS readback falls back to the HSI nominal frequency; the
/// hardware should never report it, but the calculation stays defined.
fn base_clock(cfgr0: Cfgr0) -> Hertz {
    match SysclkSource::from_status_bits(cfgr0.sws()) {
        SysclkSource::HSI => HSI_FREQ,
        SysclkSource::HSE => HSE_FREQ,
        SysclkSource::PLL => PllSource::from_bit(cfgr0.pllsrc()).output_freq(),
    }
}

/// Core clock frequency implied by a CFGR0 snapshot: active source base
/// clock with the AHB prescaler applied.
pub fn sysclk_from(cfgr0: Cfgr0) -> Hertz {
    AhbPrescaler::from_bits(cfgr0.hpre()).apply(base_clock(cfgr0))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SWS_HSI: u8 = 0b00;
    const SWS_HSE: u8 = 0b01;
    const SWS_PLL: u8 = 0b10;
    const SWS_RESERVED: u8 = 0b11;

    fn cfgr0(sws: u8, hpre: u8, pll_from_hse: bool) -> Cfgr0 {
        let mut cfgr0 = Cfgr0(0);
        cfgr0.set_hpre(hpre);
        cfgr0.set_pllsrc(pll_from_hse);
        // SWS is a read-only field, force the raw bits for the snapshot
        Cfgr0(cfgr0.0 | u32::from(sws) << 2)
    }

    #[test]
    fn hsi_with_prescaler_off() {
        assert_eq!(sysclk_from(cfgr0(SWS_HSI, 0b0000, false)), Hertz::MHz(24));
    }

    #[test]
    fn hsi_divided_by_eight() {
        assert_eq!(sysclk_from(cfgr0(SWS_HSI, 0b0111, false)), Hertz::MHz(3));
    }

    #[test]
    fn hse_with_prescaler_off() {
        assert_eq!(sysclk_from(cfgr0(SWS_HSE, 0b0000, false)), Hertz::MHz(24));
    }

    #[test]
    fn pll_from_hsi_with_prescaler_off() {
        assert_eq!(sysclk_from(cfgr0(SWS_PLL, 0b0000, false)), Hertz::MHz(48));
    }

    #[test]
    fn pll_from_hse_with_shift_by_one() {
        assert_eq!(sysclk_from(cfgr0(SWS_PLL, 0b1000, true)), Hertz::MHz(24));
    }

    #[test]
    fn reserved_source_status_falls_back_to_hsi() {
        assert_eq!(
            sysclk_from(cfgr0(SWS_RESERVED, 0b0000, false)),
            Hertz::MHz(24)
        );
    }

    #[test]
    fn fallback_base_still_passes_through_the_prescaler() {
        assert_eq!(
            sysclk_from(cfgr0(SWS_RESERVED, 0b0001, false)),
            Hertz::MHz(12)
        );
    }
}
