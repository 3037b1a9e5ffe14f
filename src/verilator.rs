//! Verilator binding for the `tt_um_mul8` RTL.
//!
//! The RTL lives outside this crate and `rtl/` is not checked in. Building
//! with `--features verilator` fails until `rtl/tt_um_mul8.v` is supplied,
//! because `#[verilog]` reads the port list from it at compile time. No test
//! in this crate runs against this backend.

use camino::Utf8Path;
use eyre::Result;
use marlin::{
    verilator::{VerilatorRuntime, VerilatorRuntimeOptions},
    verilog::prelude::*,
};

use crate::dut::Dut;

#[verilog(src = "rtl/tt_um_mul8.v", name = "tt_um_mul8")]
pub struct Mul8Rtl;

pub fn create_mul8_runtime() -> Result<VerilatorRuntime> {
    let include_paths = [Utf8Path::new("rtl")];
    let src_files = [Utf8Path::new("rtl/tt_um_mul8.v")];

    VerilatorRuntime::new(
        Utf8Path::new("artifacts"),
        &src_files,
        &include_paths,
        [],
        VerilatorRuntimeOptions::default_logging(),
    )
    .map_err(|e| eyre::eyre!("Failed to create runtime: {}", e))
}

impl<'ctx> Dut for Mul8Rtl<'ctx> {
    fn set_clk(&mut self, level: u8) {
        self.clk = level;
    }

    fn set_rst_n(&mut self, level: u8) {
        self.rst_n = level;
    }

    fn set_ena(&mut self, level: u8) {
        self.ena = level;
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
        self.uio_out
    }

    fn eval(&mut self) {
        Mul8Rtl::eval(self);
    }
}
