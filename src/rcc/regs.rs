//! Register interface of the reset and clock control unit.
//!
//! Only the three registers this crate touches are modeled: `CTLR`, `CFGR0`
//! and `INTR`. The peripheral reset/enable registers further up the block are
//! owned by whatever HAL sits on top. Field layout follows the CH32V003
//! reference manual; all field access goes through the typed views below
//! instead of raw shifted masks.

use bitfield::bitfield;
use core::marker::PhantomData;
use vcell::VolatileCell;

bitfield! {
    /// Clock control register (RCC_CTLR)
    #[derive(Copy, Clone)]
    pub struct Ctlr(u32);
    impl Debug;
    pub hsion, set_hsion          : 0;
    pub hsirdy, _                 : 1;
    pub u8, hsitrim, set_hsitrim  : 7, 3;
    pub u8, hsical, _             : 15, 8;
    pub hseon, set_hseon          : 16;
    pub hserdy, _                 : 17;
    pub hsebyp, set_hsebyp        : 18;
    pub csson, set_csson          : 19;
    pub pllon, set_pllon          : 24;
    pub pllrdy, _                 : 25;
}

bitfield! {
    /// Clock configuration register (RCC_CFGR0)
    #[derive(Copy, Clone)]
    pub struct Cfgr0(u32);
    impl Debug;
    pub u8, sw, set_sw            : 1, 0;
    pub u8, sws, _                : 3, 2;
    pub u8, hpre, set_hpre        : 7, 4;
    pub u8, adcpre, set_adcpre    : 15, 11;
    pub pllsrc, set_pllsrc        : 16;
    pub u8, mco, set_mco          : 26, 24;
}

bitfield! {
    /// Clock interrupt register (RCC_INTR)
    #[derive(Copy, Clone)]
    pub struct Intr(u32);
    impl Debug;
    // ready/failure flags
    pub lsirdyf, _                : 0;
    pub lserdyf, _                : 1;
    pub hsirdyf, _                : 2;
    pub hserdyf, _                : 3;
    pub pllrdyf, _                : 4;
    pub cssf, _                   : 7;
    // interrupt enables
    pub lsirdyie, set_lsirdyie    : 8;
    pub lserdyie, set_lserdyie    : 9;
    pub hsirdyie, set_hsirdyie    : 10;
    pub hserdyie, set_hserdyie    : 11;
    pub pllrdyie, set_pllrdyie    : 12;
    // write-1-to-clear, read back as zero on hardware
    pub lsirdyc, set_lsirdyc      : 16;
    pub lserdyc, set_lserdyc      : 17;
    pub hsirdyc, set_hsirdyc      : 18;
    pub hserdyc, set_hserdyc      : 19;
    pub pllrdyc, set_pllrdyc      : 20;
    pub cssc, set_cssc            : 23;
}

/// Conversion between a typed register view and its backing bits.
pub trait RegisterValue: Copy {
    fn from_bits(bits: u32) -> Self;
    fn bits(self) -> u32;
}

macro_rules! register_value {
    ($($reg:ident,)+) => {
        $(
            impl RegisterValue for $reg {
                fn from_bits(bits: u32) -> Self {
                    $reg(bits)
                }

                fn bits(self) -> u32 {
                    self.0
                }
            }
        )+
    };
}

register_value! {
    Ctlr,
    Cfgr0,
    Intr,
}

/// A memory-mapped register read and written through the typed view `R`.
#[repr(transparent)]
pub struct Reg<R: RegisterValue> {
    value: VolatileCell<u32>,
    _marker: PhantomData<R>,
}

impl<R: RegisterValue> Reg<R> {
    #[cfg(test)]
    pub(crate) const fn new(bits: u32) -> Self {
        Reg {
            value: VolatileCell::new(bits),
            _marker: PhantomData,
        }
    }

    /// Reads the register once
    pub fn read(&self) -> R {
        R::from_bits(self.value.get())
    }

    /// Writes the register
    pub fn write(&self, value: R) {
        self.value.set(value.bits());
    }

    /// Read-modify-write of the register
    pub fn modify(&self, f: impl FnOnce(R) -> R) {
        self.write(f(self.read()));
    }
}

/// RCC register block
#[repr(C)]
pub struct RegisterBlock {
    /// Clock control register
    pub ctlr: Reg<Ctlr>,
    /// Clock configuration register 0
    pub cfgr0: Reg<Cfgr0>,
    /// Clock interrupt register
    pub intr: Reg<Intr>,
}

#[cfg(test)]
impl RegisterBlock {
    /// A register block in its power-on reset state, backed by plain memory.
    pub(crate) const fn reset() -> Self {
        RegisterBlock {
            ctlr: Reg::new(0x0000_0083),
            cfgr0: Reg::new(0x0000_0000),
            intr: Reg::new(0x0000_0000),
        }
    }
}

/// Reset and clock control peripheral
pub struct RCC {
    _marker: PhantomData<*const ()>,
}

impl RCC {
    /// Returns a pointer to the register block
    pub const fn ptr() -> *const RegisterBlock {
        0x4002_1000 as *const _
    }
}
