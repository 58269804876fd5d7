#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod account;
pub mod inventory;
pub mod journal;
mod ledger;
pub mod mapping;
pub mod migrate;
pub mod period;
pub mod posting;
pub mod report;

pub use ledger::*;

pub mod primitives {
    pub use toko_types::primitives::*;
}

pub use primitives::*;
