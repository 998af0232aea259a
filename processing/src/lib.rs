pub mod error;
pub mod executable_utils;
pub mod model;
pub mod processor;
pub mod recommendations;
pub mod scorers;
pub mod snapshot;
pub mod statistics;
pub mod storage;

pub use processor::RiskEngine;
