use clap::{Parser, ValueEnum};
use eyre::Result;
use mul8_tb::{
    vectors, Dut, ModelConfig, Mul8Model, SuiteReport, TbConfig, TestVector, Testbench,
    DEFAULT_VECTORS,
};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Backend {
    /// in-crate model of the pin contract
    Model,
    /// Verilator build of rtl/tt_um_mul8.v (needs the `verilator` feature)
    Verilator,
}

// Stimulus-and-check testbench for the 8x8 multiplier core
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// device to drive
    #[arg(long, value_enum, default_value_t = Backend::Model)]
    backend: Backend,

    /// fractional bits of the product, must match the RTL parameter
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=15))]
    frac_bits: u32,

    /// clock edges to wait for done after start
    #[arg(long, default_value_t = 64)]
    timeout: u32,

    /// clock period in ns
    #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u64).range(1..))]
    period_ns: u64,

    /// model latency in cycles (model backend only)
    #[arg(long, default_value_t = 8)]
    latency: u32,

    /// operand pair `A,B` (decimal or 0x hex); replaces the default vectors
    #[arg(long = "vector", value_name = "A,B")]
    vectors: Vec<TestVector>,

    /// sweep every operand pair
    #[arg(long, conflicts_with = "vectors")]
    exhaustive: bool,
}

impl Args {
    fn tb_config(&self) -> TbConfig {
        TbConfig {
            frac_bits: self.frac_bits,
            timeout_cycles: self.timeout,
            clock_period_ns: self.period_ns,
            ..TbConfig::default()
        }
    }

    fn test_vectors(&self) -> Vec<TestVector> {
        if self.exhaustive {
            vectors::exhaustive().collect()
        } else if self.vectors.is_empty() {
            DEFAULT_VECTORS.to_vec()
        } else {
            self.vectors.clone()
        }
    }
}

fn run<D: Dut>(dut: &mut D, args: &Args) -> Result<SuiteReport> {
    let mut tb = Testbench::new(args.tb_config());
    println!(
        "⏱️  Clock: {} ns ({:.1} MHz)",
        tb.clock().period_ns(),
        tb.clock().frequency_mhz()
    );
    Ok(tb.run_suite(dut, args.test_vectors())?)
}

/// Per-vector lines, skipped for the exhaustive sweep.
fn outcome_lines(report: &SuiteReport, args: &Args) -> Vec<String> {
    if args.exhaustive {
        return Vec::new();
    }
    report
        .outcomes
        .iter()
        .map(|outcome| {
            format!(
                "✅ {} -> {:04x} ({} cycles)",
                outcome.vector, outcome.result, outcome.wait_cycles
            )
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    println!("🚀 8x8 multiplier testbench starting ({:?} backend)...", args.backend);

    let report = match args.backend {
        Backend::Model => {
            let mut model = Mul8Model::new(ModelConfig {
                latency: args.latency,
                frac_bits: args.frac_bits,
            });
            run(&mut model, &args)?
        }
        #[cfg(feature = "verilator")]
        Backend::Verilator => {
            let runtime = mul8_tb::create_mul8_runtime()?;
            let mut rtl = runtime
                .create_model_simple::<mul8_tb::Mul8Rtl>()
                .map_err(|e| eyre::eyre!("Failed to create multiplier model: {:?}", e))?;
            run(&mut rtl, &args)?
        }
        #[cfg(not(feature = "verilator"))]
        Backend::Verilator => {
            eyre::bail!("built without the `verilator` feature; rebuild with --features verilator")
        }
    };

    for line in outcome_lines(&report, &args) {
        println!("{line}");
    }
    println!(
        "🎉 {} vectors passed in {} cycles ({} ns simulated, worst done latency {} cycles)",
        report.outcomes.len(),
        report.cycles,
        report.sim_time_ns,
        report.max_wait_cycles()
    );
    Ok(())
}
