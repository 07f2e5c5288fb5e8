pub mod assembler;
pub mod error;
pub mod naming;
pub mod writer;
