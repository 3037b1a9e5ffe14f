use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TbError {
    #[error("Timeout: A={a} B={b} (done not seen within {cycles} cycles)")]
    Timeout { a: u8, b: u8, cycles: u32 },

    #[error("A={a:02x} B={b:02x} expect={expected:04x} got={got:04x}")]
    Mismatch {
        a: u8,
        b: u8,
        expected: u16,
        got: u16,
    },
}

pub type Result<T> = std::result::Result<T, TbError>;
