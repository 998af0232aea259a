
pub mod processor_tests;
pub mod statistics_tests;
