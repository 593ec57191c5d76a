//! Library half of the `wikicite` command: the batch pipeline and input
//! helpers, kept out of `main.rs` so they can be tested directly.

pub mod input;
pub mod pipeline;
