//! Stimulus-and-check driver for the multiplier.
//!
//! Every wait is one rising edge of the simulated clock. The driver only
//! touches the device through [`Dut`], so the same sequence runs against the
//! Verilator build and [`crate::Mul8Model`].

use log::{debug, info, trace};

use crate::{
    dut::{Dut, LOAD_A, LOAD_B, OUT_SEL, START},
    error::{Result, TbError},
    vectors::TestVector,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TbConfig {
    /// Fractional bits of the fixed-point product. Must match the RTL parameter.
    pub frac_bits: u32,
    /// Edges to wait for the done flag after the start pulse.
    pub timeout_cycles: u32,
    pub clock_period_ns: u64,
    /// Edges to hold reset low.
    pub reset_cycles: u32,
}

impl Default for TbConfig {
    fn default() -> Self {
        Self {
            frac_bits: 0,
            timeout_cycles: 64,
            clock_period_ns: 20,
            reset_cycles: 2,
        }
    }
}

/// Counts rising edges and maps them onto simulated time.
#[derive(Debug, Clone)]
pub struct Clock {
    period_ns: u64,
    cycles: u64,
}

impl Clock {
    pub fn new(period_ns: u64) -> Self {
        Self {
            period_ns,
            cycles: 0,
        }
    }

    pub fn period_ns(&self) -> u64 {
        self.period_ns
    }

    /// Frequency in MHz, 50 for the default 20 ns period.
    pub fn frequency_mhz(&self) -> f64 {
        1_000.0 / self.period_ns as f64
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn now_ns(&self) -> u64 {
        self.cycles * self.period_ns
    }

    fn tick(&mut self) {
        self.cycles += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorOutcome {
    pub vector: TestVector,
    pub result: u16,
    /// Edges spent polling before done was seen.
    pub wait_cycles: u32,
}

#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    pub outcomes: Vec<VectorOutcome>,
    pub cycles: u64,
    pub sim_time_ns: u64,
}

impl SuiteReport {
    pub fn max_wait_cycles(&self) -> u32 {
        self.outcomes
            .iter()
            .map(|outcome| outcome.wait_cycles)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone)]
pub struct Testbench {
    config: TbConfig,
    clock: Clock,
}

impl Default for Testbench {
    fn default() -> Self {
        Self::new(TbConfig::default())
    }
}

impl Testbench {
    pub fn new(config: TbConfig) -> Self {
        Self {
            clock: Clock::new(config.clock_period_ns),
            config,
        }
    }

    pub fn config(&self) -> &TbConfig {
        &self.config
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// One full clock cycle: rising edge, then falling edge.
    pub fn step<D: Dut>(&mut self, dut: &mut D) {
        dut.set_clk(1);
        dut.eval();

        dut.set_clk(0);
        dut.eval();

        self.clock.tick();
        trace!(
            "edge {} @ {} ns: uio_in={:08b} uo_out={:02x} uio_out={:08b}",
            self.clock.cycles(),
            self.clock.now_ns(),
            dut.uio_in(),
            dut.uo_out(),
            dut.uio_out()
        );
    }

    pub fn step_n<D: Dut>(&mut self, dut: &mut D, cycles: u32) {
        for _ in 0..cycles {
            self.step(dut);
        }
    }

    /// Hold reset and enable low, then release both and let one edge pass.
    pub fn reset<D: Dut>(&mut self, dut: &mut D) {
        debug!("reset for {} cycles", self.config.reset_cycles);
        dut.set_rst_n(0);
        dut.set_ena(0);
        dut.set_ui_in(0);
        dut.set_uio_in(0);
        self.step_n(dut, self.config.reset_cycles);

        dut.set_rst_n(1);
        dut.set_ena(1);
        self.step(dut);
    }

    /// Drive `bit` of `uio_in` high for one edge, then low for one edge.
    pub fn pulse<D: Dut>(&mut self, dut: &mut D, bit: u8) {
        dut.set_uio_in(dut.uio_in() | (1 << bit));
        self.step(dut);
        dut.set_uio_in(dut.uio_in() & !(1 << bit));
        self.step(dut);
    }

    pub fn write_a<D: Dut>(&mut self, dut: &mut D, value: u8) {
        debug!("write A={value:02x}");
        dut.set_ui_in(value);
        self.pulse(dut, LOAD_A);
    }

    pub fn write_b<D: Dut>(&mut self, dut: &mut D, value: u8) {
        debug!("write B={value:02x}");
        dut.set_ui_in(value);
        self.pulse(dut, LOAD_B);
    }

    pub fn start<D: Dut>(&mut self, dut: &mut D) {
        debug!("start");
        self.pulse(dut, START);
    }

    /// Sample done before each of up to `timeout_cycles` edges.
    ///
    /// Returns the number of edges waited.
    pub fn wait_done<D: Dut>(&mut self, dut: &mut D, vector: TestVector) -> Result<u32> {
        for waited in 0..self.config.timeout_cycles {
            if dut.done() {
                debug!("done after {waited} cycles");
                return Ok(waited);
            }
            self.step(dut);
        }
        Err(TbError::Timeout {
            a: vector.a,
            b: vector.b,
            cycles: self.config.timeout_cycles,
        })
    }

    /// Read the low byte, then the high byte, one settling edge after each
    /// select change.
    pub fn read_result<D: Dut>(&mut self, dut: &mut D) -> u16 {
        dut.set_uio_in(dut.uio_in() & !(1 << OUT_SEL));
        self.step(dut);
        let lo = dut.uo_out();

        dut.set_uio_in(dut.uio_in() | (1 << OUT_SEL));
        self.step(dut);
        let hi = dut.uo_out();

        (u16::from(hi) << 8) | u16::from(lo)
    }

    pub fn check(&self, vector: TestVector, got: u16) -> Result<u16> {
        let expected = vector.expected(self.config.frac_bits);
        if got != expected {
            return Err(TbError::Mismatch {
                a: vector.a,
                b: vector.b,
                expected,
                got,
            });
        }
        Ok(got)
    }

    pub fn run_vector<D: Dut>(&mut self, dut: &mut D, vector: TestVector) -> Result<VectorOutcome> {
        self.write_a(dut, vector.a);
        self.write_b(dut, vector.b);
        self.start(dut);

        let wait_cycles = self.wait_done(dut, vector)?;
        let got = self.read_result(dut);
        let result = self.check(vector, got)?;

        info!("{vector} -> {result:04x} ({wait_cycles} cycles)");
        Ok(VectorOutcome {
            vector,
            result,
            wait_cycles,
        })
    }

    /// Reset once, then apply every vector in order. The first failure ends
    /// the run.
    pub fn run_suite<D, I>(&mut self, dut: &mut D, vectors: I) -> Result<SuiteReport>
    where
        D: Dut,
        I: IntoIterator<Item = TestVector>,
    {
        self.reset(dut);

        let start_cycles = self.clock.cycles();
        let mut outcomes = Vec::new();
        for vector in vectors {
            outcomes.push(self.run_vector(dut, vector)?);
        }

        let cycles = self.clock.cycles() - start_cycles;
        Ok(SuiteReport {
            outcomes,
            cycles,
            sim_time_ns: cycles * self.clock.period_ns(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelConfig, Mul8Model};

    /// Records `uio_in` as seen on each rising edge.
    #[derive(Default)]
    struct Probe {
        clk: u8,
        last_clk: u8,
        rst_n: u8,
        ena: u8,
        uio_in: u8,
        latched: Vec<u8>,
        resets: u32,
    }

    impl Dut for Probe {
        fn set_clk(&mut self, level: u8) {
            self.clk = level;
        }
        fn set_rst_n(&mut self, level: u8) {
            self.rst_n = level;
        }
        fn set_ena(&mut self, level: u8) {
            self.ena = level;
        }
        fn set_ui_in(&mut self, _value: u8) {}
        fn set_uio_in(&mut self, value: u8) {
            self.uio_in = value;
        }
        fn uio_in(&self) -> u8 {
            self.uio_in
        }
        fn uo_out(&self) -> u8 {
            0
        }
        fn uio_out(&self) -> u8 {
            0
        }
        fn eval(&mut self) {
            if self.clk == 1 && self.last_clk == 0 {
                if self.rst_n == 0 {
                    self.resets += 1;
                }
                self.latched.push(self.uio_in);
            }
            self.last_clk = self.clk;
        }
    }

    #[test]
    fn test_pulse_is_one_cycle_wide() {
        let mut tb = Testbench::default();
        let mut probe = Probe {
            uio_in: 1 << OUT_SEL,
            ..Default::default()
        };

        tb.pulse(&mut probe, START);

        assert_eq!(probe.latched, vec![(1 << OUT_SEL) | (1 << START), 1 << OUT_SEL]);
        assert_eq!(tb.clock().cycles(), 2);
    }

    #[test]
    fn test_reset_sequence() {
        let mut tb = Testbench::default();
        let mut probe = Probe::default();

        tb.reset(&mut probe);

        assert_eq!(probe.resets, 2);
        assert_eq!(probe.rst_n, 1);
        assert_eq!(probe.ena, 1);
        assert_eq!(tb.clock().cycles(), 3);
    }

    #[test]
    fn test_timeout_reports_operands() {
        let mut tb = Testbench::default();
        let mut probe = Probe::default();

        let err = tb
            .wait_done(&mut probe, TestVector::new(3, 4))
            .unwrap_err();

        assert_eq!(
            err,
            TbError::Timeout {
                a: 3,
                b: 4,
                cycles: 64
            }
        );
        assert_eq!(tb.clock().cycles(), 64);
        assert_eq!(err.to_string(), "Timeout: A=3 B=4 (done not seen within 64 cycles)");
    }

    #[test]
    fn test_mismatch_formats_hex() {
        let tb = Testbench::default();
        let err = tb.check(TestVector::new(0xAA, 0x0F), 0x09F7).unwrap_err();
        assert_eq!(err.to_string(), "A=aa B=0f expect=09f6 got=09f7");
        assert_eq!(tb.check(TestVector::new(0xAA, 0x0F), 0x09F6), Ok(0x09F6));
    }

    #[test]
    fn test_clock_time() {
        let mut tb = Testbench::default();
        let mut model = Mul8Model::new(ModelConfig::default());
        tb.step_n(&mut model, 5);
        assert_eq!(tb.clock().now_ns(), 100);
        assert!((tb.clock().frequency_mhz() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_run_vector_nominal_latency() {
        let mut tb = Testbench::default();
        let mut model = Mul8Model::new(ModelConfig::default());
        tb.reset(&mut model);

        let outcome = tb.run_vector(&mut model, TestVector::new(0x7F, 0x80)).unwrap();

        assert_eq!(outcome.result, 0x3F80);
        assert_eq!(outcome.wait_cycles, 7);
    }
}
