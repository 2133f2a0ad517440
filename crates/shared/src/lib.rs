//! Wire contract and presentation mapping shared by the analysis client and its front ends.

pub mod domain;
pub mod error;
pub mod protocol;
