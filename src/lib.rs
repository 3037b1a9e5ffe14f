pub mod driver;
pub mod dut;
pub mod error;
pub mod model;
pub mod vectors;
#[cfg(feature = "verilator")]
pub mod verilator;

pub use driver::*;
pub use dut::{Dut, DONE_BIT, LOAD_A, LOAD_B, OUT_SEL, START};
pub use error::TbError;
pub use model::{Mul8Model, ModelConfig};
pub use vectors::{expected_product, TestVector, DEFAULT_VECTORS};
#[cfg(feature = "verilator")]
pub use verilator::{create_mul8_runtime, Mul8Rtl};
