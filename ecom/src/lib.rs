//! Shop-facing adapter for the order risk engine: the JSON dataset format
//! that seeds the in-memory stores used by the `assessor` and `statistics`
//! binaries.

pub mod dataset;

pub use dataset::Dataset;
