//! Common test utilities and mock implementations

#![allow(dead_code)]


pub use mock_interface::{MockClock, MockError, MockInterface, Operation};
pub use test_utils::{assert_float_eq, create_mock_driver};
