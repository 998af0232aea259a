pub mod cancellation_tests;
