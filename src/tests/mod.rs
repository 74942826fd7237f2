//! tests/mod.rs

mod support;

mod contact_tests;
mod event_bus_tests;
mod storage_tests;
