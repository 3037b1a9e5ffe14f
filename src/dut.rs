//! Pin contract of the multiplier core.
//!
//! The layout follows the Tiny Tapeout user-module convention: `ui_in` carries
//! the operand, `uio_in` the control strobes, `uo_out` the selected result
//! byte and `uio_out` the status flags.

/// `uio_in` bit latching `ui_in` into operand A.
pub const LOAD_A: u8 = 0;
/// `uio_in` bit latching `ui_in` into operand B.
pub const LOAD_B: u8 = 1;
/// `uio_in` bit starting a multiply.
pub const START: u8 = 2;
/// `uio_in` bit selecting the high (1) or low (0) result byte on `uo_out`.
pub const OUT_SEL: u8 = 3;
/// `uio_out` bit raised once the result is ready.
pub const DONE_BIT: u8 = 7;

/// A simulated device exposing the multiplier pins.
///
/// Setters only change input levels; nothing is latched until `eval` runs
/// with the clock going high.
pub trait Dut {
    fn set_clk(&mut self, level: u8);
    fn set_rst_n(&mut self, level: u8);
    fn set_ena(&mut self, level: u8);
    fn set_ui_in(&mut self, value: u8);
    fn set_uio_in(&mut self, value: u8);

    /// Value currently driven on `uio_in`.
    fn uio_in(&self) -> u8;
    fn uo_out(&self) -> u8;
    fn uio_out(&self) -> u8;

    fn eval(&mut self);

    fn done(&self) -> bool {
        (self.uio_out() >> DONE_BIT) & 1 != 0
    }
}
