//! The simulate-then-submit deposit pipeline
//!
//! Sequencing is structural: the allowance check happens before the dry
//! run, and [`TransactionSubmitter`] only accepts a [`SimulatedTx`], the
//! proof token produced by a successful [`SimulationGate`] pass. A request
//! whose simulation failed cannot reach submission by construction.

pub mod allowance;
pub mod flow;
pub mod gate;
pub mod submitter;

pub use allowance::AllowanceManager;
pub use flow::{DepositFlow, FlowConfig};
pub use gate::{SimulatedTx, SimulationGate};
pub use submitter::TransactionSubmitter;
