//! Chain access for the depositor pipeline
//!
//! This crate owns the seam between the pipeline and the network: the
//! [`ChainClient`] trait covering every remote call the pipeline and the
//! seeder need, a live HTTP implementation over an alloy provider with a
//! local signing identity, and the boundary that converts heterogeneous
//! transport errors into one tagged failure type.

pub mod abi;
pub mod client;
pub mod failure;
pub mod http;
pub mod testing;

pub use client::ChainClient;
pub use http::HttpChain;
