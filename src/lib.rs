//! Early system initialisation for the ch32v00x chips
//!
//! Brings the clock tree to a minimal known-good configuration after reset
//! and keeps a published SYSCLK frequency in sync with the RCC registers:
//!
//! ```text
//!        24 MHz                            24 MHz       3 MHz
//!   HSI ------> SYSCLK ---[ /1 ]---> HCLK ---+---[ /8 ]--------------> SysTick
//!                                            |          12 MHz
//!                                            +---[ /2 ]--------------> ADC
//! ```
//!
//! [`init`] is the `SystemInit` of the CMSIS startup convention and must run
//! once, before interrupts are enabled and before anything depends on timing.
//! After other code reprograms the clock tree, [`update_sysclk`] recomputes
//! the published frequency from live register state, and [`sysclk`] reads it.
//!
//! References:
//!  [1] CH32V003RM "CH32x003 Reference Manual", p. 13ff
//!      <http://www.wch-ic.com/downloads/CH32V003RM_PDF.html>

#![cfg_attr(not(test), no_std)]

pub mod rcc;
pub mod time;

pub use rcc::{init, sysclk, update_sysclk};
