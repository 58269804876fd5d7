//! Inputs for posting business events and manual journals, plus the
//! pure planning rules that turn an event into balanced lines. The
//! transactional orchestration lives on [`TokoLedger`](crate::TokoLedger).
pub mod error;
mod event;
pub(crate) mod plan;

pub use event::*;
