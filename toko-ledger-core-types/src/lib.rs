#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![cfg_attr(feature = "fail-on-warnings", deny(clippy::all))]

pub mod account;
pub mod inventory;
pub mod journal;
pub mod mapping;
pub mod period;
pub mod primitives;

mod id;
