//! Cycle-level model of the multiplier's pin contract.
//!
//! Only the externally visible behaviour is modelled: operand latches, a
//! busy period of `latency` edges, the done flag and the registered output
//! byte mux. It stands in for the RTL when no Verilator build is available.

use log::trace;

use crate::{
    dut::{Dut, DONE_BIT, LOAD_A, LOAD_B, OUT_SEL, START},
    vectors::expected_product,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelConfig {
    /// Rising edges from the start edge until done asserts. Clamped to 1.
    pub latency: u32,
    pub frac_bits: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            latency: 8,
            frac_bits: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Mul8Model {
    config: ModelConfig,

    // Inputs
    clk: u8,
    rst_n: u8,
    ena: u8,
    ui_in: u8,
    uio_in: u8,

    // Registers
    last_clk: u8,
    a: u8,
    b: u8,
    result: u16,
    remaining: u32,
    busy: bool,
    done: bool,
    uo_out: u8,
}

impl Mul8Model {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config: ModelConfig {
                latency: config.latency.max(1),
                ..config
            },
            ..Default::default()
        }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Internal result register, independent of the output mux.
    pub fn result(&self) -> u16 {
        self.result
    }

    fn control(&self, bit: u8) -> bool {
        (self.uio_in >> bit) & 1 != 0
    }

    fn reset(&mut self) {
        self.a = 0;
        self.b = 0;
        self.result = 0;
        self.remaining = 0;
        self.busy = false;
        self.done = false;
        self.uo_out = 0;
    }

    fn rising_edge(&mut self) {
        if self.rst_n == 0 {
            self.reset();
            return;
        }
        if self.ena == 0 {
            return;
        }

        // The output register samples the result as it was before this edge.
        let previous = self.result;

        if self.control(LOAD_A) {
            self.a = self.ui_in;
        }
        if self.control(LOAD_B) {
            self.b = self.ui_in;
        }

        if self.busy {
            self.remaining -= 1;
            if self.remaining == 0 {
                self.result = expected_product(self.a, self.b, self.config.frac_bits);
                self.busy = false;
                self.done = true;
                trace!(
                    "model: {:02x} * {:02x} -> {:04x}",
                    self.a,
                    self.b,
                    self.result
                );
            }
        } else if self.control(START) {
            self.busy = true;
            self.done = false;
            self.remaining = self.config.latency;
        }

        self.uo_out = if self.control(OUT_SEL) {
            (previous >> 8) as u8
        } else {
            previous as u8
        };
    }
}

impl Dut for Mul8Model {
    fn set_clk(&mut self, level: u8) {
        self.clk = level & 1;
    }

    fn set_rst_n(&mut self, level: u8) {
        self.rst_n = level & 1;
    }

    fn set_ena(&mut self, level: u8) {
        self.ena = level & 1;
    }

    fn set_ui_in(&mut self, value: u8) {
        self.ui_in = value;
    }

    fn set_uio_in(&mut self, value: u8) {
        self.uio_in = value;
    }

    fn uio_in(&self) -> u8 {
        self.uio_in
    }

    fn uo_out(&self) -> u8 {
        self.uo_out
    }

    fn uio_out(&self) -> u8 {
        u8::from(self.done) << DONE_BIT
    }

    fn eval(&mut self) {
        if self.clk == 1 && self.last_clk == 0 {
            self.rising_edge();
        }
        self.last_clk = self.clk;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(model: &mut Mul8Model) {
        model.set_clk(1);
        model.eval();
        model.set_clk(0);
        model.eval();
    }

    fn powered(config: ModelConfig) -> Mul8Model {
        let mut model = Mul8Model::new(config);
        model.set_rst_n(0);
        edge(&mut model);
        model.set_rst_n(1);
        model.set_ena(1);
        edge(&mut model);
        model
    }

    fn load(model: &mut Mul8Model, a: u8, b: u8) {
        model.set_ui_in(a);
        model.set_uio_in(1 << LOAD_A);
        edge(model);
        model.set_ui_in(b);
        model.set_uio_in(1 << LOAD_B);
        edge(model);
        model.set_uio_in(0);
    }

    #[test]
    fn test_only_rising_edge_latches() {
        let mut model = powered(ModelConfig::default());
        model.set_ui_in(0x42);
        model.set_uio_in(1 << LOAD_A);
        model.eval();
        assert_eq!(model.a, 0);
        edge(&mut model);
        assert_eq!(model.a, 0x42);
    }

    #[test]
    fn test_done_after_latency() {
        let mut model = powered(ModelConfig {
            latency: 3,
            frac_bits: 0,
        });
        load(&mut model, 0x13, 0x27);

        model.set_uio_in(1 << START);
        edge(&mut model);
        model.set_uio_in(0);
        assert!(model.is_busy());
        assert!(!model.done());

        edge(&mut model);
        edge(&mut model);
        assert!(!model.done());
        edge(&mut model);
        assert!(model.done());
        assert_eq!(model.result(), 0x02E5);
    }

    #[test]
    fn test_zero_latency_is_clamped() {
        let model = Mul8Model::new(ModelConfig {
            latency: 0,
            frac_bits: 0,
        });
        assert_eq!(model.config().latency, 1);
    }

    #[test]
    fn test_output_register_follows_select() {
        let mut model = powered(ModelConfig {
            latency: 1,
            frac_bits: 0,
        });
        load(&mut model, 0xFF, 0xFF);
        model.set_uio_in(1 << START);
        edge(&mut model);
        model.set_uio_in(0);
        edge(&mut model);
        assert!(model.done());

        edge(&mut model);
        assert_eq!(model.uo_out(), 0x01);
        model.set_uio_in(1 << OUT_SEL);
        // Select changed but no edge yet.
        assert_eq!(model.uo_out(), 0x01);
        edge(&mut model);
        assert_eq!(model.uo_out(), 0xFE);
    }

    #[test]
    fn test_disabled_holds_state() {
        let mut model = powered(ModelConfig::default());
        model.set_ena(0);
        model.set_ui_in(0x55);
        model.set_uio_in(1 << LOAD_A);
        edge(&mut model);
        assert_eq!(model.a, 0);
    }

    #[test]
    fn test_reset_clears_done_and_output() {
        let mut model = powered(ModelConfig {
            latency: 1,
            frac_bits: 0,
        });
        load(&mut model, 0xAA, 0x0F);
        model.set_uio_in(1 << START);
        edge(&mut model);
        model.set_uio_in(1 << OUT_SEL);
        edge(&mut model);
        edge(&mut model);
        assert!(model.done());
        assert_eq!(model.uo_out(), 0x09);

        model.set_rst_n(0);
        edge(&mut model);
        assert!(!model.done());
        assert_eq!(model.uo_out(), 0);
        assert_eq!(model.uio_out(), 0);
        assert_eq!(model.result(), 0);
    }
}
