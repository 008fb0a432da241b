#![allow(dead_code, unused_imports)]

pub mod test_server;

pub use test_server::{TEST_SECRET, TestServer};
