#[allow(clippy::module_inception)]
mod inventory;

pub use inventory::*;
