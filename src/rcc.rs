//! Reset and Clock Control

pub mod hclk;
pub mod pll;
pub mod regs;
pub mod sysclk;

pub use hclk::AhbPrescaler;
pub use pll::PllSource;
pub use regs::{Cfgr0, Ctlr, Intr, Reg, RegisterBlock, RCC};
pub use sysclk::sysclk_from;

use crate::time::Hertz;
use core::sync::atomic::{AtomicU32, Ordering};

/// Nominal frequency of the internal 24 MHz RC oscillator
pub const HSI_FREQ: Hertz = Hertz::MHz(24);
/// Nominal frequency of the external crystal oscillator
pub const HSE_FREQ: Hertz = Hertz::MHz(24);
/// The PLL multiplies its input clock by this fixed ratio
pub(crate) const PLL_MULTIPLIER: u32 = 2;

/// Calculated SYSCLK frequency in Hz
static SYSTEM_CORE_CLOCK: AtomicU32 = AtomicU32::new(0);

/// System clock source, as encoded in the SW/SWS fields of CFGR0
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SysclkSource {
    HSI = 0b00,
    HSE = 0b01,
    PLL = 0b10,
}

impl SysclkSource {
    /// Decodes the SWS status readback. The reserved `0b11` encoding
    /// degrades to HSI rather than leaving the decode undefined; hardware
    /// should never report it.
    pub fn from_status_bits(bits: u8) -> Self {
        match bits {
            0b01 => Self::HSE,
            0b10 => Self::PLL,
            _ => Self::HSI,
        }
    }
}

/// Returns the SYSCLK frequency implied by the last applied clock
/// configuration.
///
/// This is the `SystemCoreClock` of the CMSIS startup convention: a cached
/// value, not a live readback. It stays correct only as long as every
/// reprogramming of the clock tree is followed by an [`update_sysclk`] call.
/// The read is a single word-atomic load, so consulting it from interrupt
/// context is fine.
pub fn sysclk() -> Hertz {
    Hertz::from_raw(SYSTEM_CORE_CLOCK.load(Ordering::Relaxed))
}

fn publish_sysclk(freq: Hertz) {
    SYSTEM_CORE_CLOCK.store(freq.raw(), Ordering::Relaxed);
}

/// Early system init, the `SystemInit` of the CMSIS startup convention.
///
/// Forces the clock tree to its minimal known-good configuration: HSI
/// enabled and selected as SYSCLK with all prescalers off, PLL/HSE/CSS
/// powered down, clock interrupts disabled and stale flags cleared, and the
/// published frequency set to the HSI nominal value.
///
/// Call once from startup, before interrupts are enabled and before any
/// code depends on timing. The sequence is idempotent and unconditional: it
/// does not wait for HSIRDY, which is acceptable for the internal RC
/// oscillator only. Starting HSE or the PLL afterwards, including the
/// readiness wait that entails, is the job of higher-level clock setup.
pub fn init() {
    let rcc = unsafe { &*RCC::ptr() };

    reset_clock_tree(rcc);
    publish_sysclk(HSI_FREQ);
}

fn reset_clock_tree(rcc: &RegisterBlock) {
    // Enable HSI and switch SYSCLK over to it
    rcc.ctlr.modify(|mut r| {
        r.set_hsion(true);
        r
    });
    rcc.cfgr0.modify(|mut r| {
        r.set_mco(0);
        r.set_adcpre(0);
        r.set_hpre(AhbPrescaler::Off.bits());
        r.set_sw(SysclkSource::HSI as u8);
        r
    });

    // Power down and de-configure PLL and HSE. HSEBYP may only change
    // while HSE is off, hence the separate write.
    rcc.ctlr.modify(|mut r| {
        r.set_pllon(false);
        r.set_csson(false);
        r.set_hseon(false);
        r
    });
    rcc.ctlr.modify(|mut r| {
        r.set_hsebyp(false);
        r
    });
    rcc.cfgr0.modify(|mut r| {
        r.set_pllsrc(PllSource::HSI.source_bit());
        r
    });

    // Disable clock interrupts and clear any latched flags, so nothing
    // stale from before the reset can fire once interrupts are enabled
    rcc.intr.modify(|mut r| {
        r.set_pllrdyie(false);
        r.set_hserdyie(false);
        r.set_hsirdyie(false);
        r.set_lserdyie(false);
        r.set_lsirdyie(false);
        r
    });
    rcc.intr.modify(|mut r| {
        r.set_cssc(true);
        r.set_pllrdyc(true);
        r.set_hserdyc(true);
        r.set_hsirdyc(true);
        r.set_lserdyc(true);
        r.set_lsirdyc(true);
        r
    });
}

/// Recalculates the published SYSCLK frequency from live register state,
/// the `SystemCoreClockUpdate` of the CMSIS startup convention.
///
/// CFGR0 is snapshotted exactly once per call; the decode never sees a torn
/// view even if the configuration changes concurrently. Call after any
/// reprogramming of the clock tree.
pub fn update_sysclk() {
    let rcc = unsafe { &*RCC::ptr() };

    publish_sysclk(sysclk_from(rcc.cfgr0.read()));
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A block left behind by a previous run: SYSCLK on the PLL fed from
    /// HSE, prescalers and MCO configured, clock interrupts armed.
    fn misconfigured_block() -> RegisterBlock {
        let rcc = RegisterBlock::reset();

        rcc.ctlr.modify(|mut r| {
            r.set_hseon(true);
            r.set_hsebyp(true);
            r.set_csson(true);
            r.set_pllon(true);
            r
        });
        rcc.cfgr0.write(Cfgr0(
            0b10 | (0b10 << 2) | (0b0111 << 4) | (0b11 << 11) | (1 << 16) | (0b100 << 24),
        ));
        rcc.intr.modify(|mut r| {
            r.set_pllrdyie(true);
            r.set_hserdyie(true);
            r.set_hsirdyie(true);
            r.set_lserdyie(true);
            r.set_lsirdyie(true);
            r
        });

        rcc
    }

    #[test]
    fn reset_reaches_the_minimal_known_good_state() {
        let rcc = misconfigured_block();
        reset_clock_tree(&rcc);

        let ctlr = rcc.ctlr.read();
        assert!(ctlr.hsion());
        assert!(!ctlr.hseon());
        assert!(!ctlr.hsebyp());
        assert!(!ctlr.csson());
        assert!(!ctlr.pllon());

        let cfgr0 = rcc.cfgr0.read();
        assert_eq!(cfgr0.sw(), SysclkSource::HSI as u8);
        assert_eq!(cfgr0.hpre(), AhbPrescaler::Off.bits());
        assert_eq!(cfgr0.adcpre(), 0);
        assert_eq!(cfgr0.mco(), 0);
        assert!(!cfgr0.pllsrc());

        let intr = rcc.intr.read();
        assert!(!intr.pllrdyie());
        assert!(!intr.hserdyie());
        assert!(!intr.hsirdyie());
        assert!(!intr.lserdyie());
        assert!(!intr.lsirdyie());
        // every write-1-to-clear bit was written
        assert!(intr.cssc());
        assert!(intr.pllrdyc());
        assert!(intr.hserdyc());
        assert!(intr.hsirdyc());
        assert!(intr.lserdyc());
        assert!(intr.lsirdyc());
    }

    #[test]
    fn reset_is_idempotent() {
        let rcc = misconfigured_block();

        reset_clock_tree(&rcc);
        let after_once = (rcc.ctlr.read().0, rcc.cfgr0.read().0, rcc.intr.read().0);

        reset_clock_tree(&rcc);
        let after_twice = (rcc.ctlr.read().0, rcc.cfgr0.read().0, rcc.intr.read().0);

        assert_eq!(after_once, after_twice);
    }

    #[test]
    fn published_frequency_round_trips_through_the_accessor() {
        publish_sysclk(HSI_FREQ);
        assert_eq!(sysclk(), Hertz::MHz(24));
    }

    #[test]
    fn reserved_status_readback_decodes_to_hsi() {
        assert_eq!(SysclkSource::from_status_bits(0b00), SysclkSource::HSI);
        assert_eq!(SysclkSource::from_status_bits(0b01), SysclkSource::HSE);
        assert_eq!(SysclkSource::from_status_bits(0b10), SysclkSource::PLL);
        assert_eq!(SysclkSource::from_status_bits(0b11), SysclkSource::HSI);
    }
}
