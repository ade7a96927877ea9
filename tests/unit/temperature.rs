//! Unit tests for temperature sensor functionality

use crate::common::{assert_float_eq, create_mock_driver};
use gy521::SampleOutcome;

#[test]
fn test_temperature_zero_raw() {
    let (mut driver, interface, _clock) = create_mock_driver();

    // raw 0 is the datasheet offset: 36.53°C
    interface.set_temperature_data(0);
    driver.read_temperature().unwrap();

    assert_float_eq(driver.temperature(), 36.53, 0.001);
}

#[test]
fn test_temperature_conversion() {
    let (mut driver, interface, _clock) = create_mock_driver();

    // 340 LSB per °C
    interface.set_temperature_data(-340);
    driver.read_temperature().unwrap();
    assert_float_eq(driver.temperature(), 35.53, 0.001);

    interface.set_temperature_data(5000);
    driver.read_temperature().unwrap();
    assert_float_eq(driver.temperature(), 51.2359, 0.001);
}

#[test]
fn test_temperature_transaction_shape() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.read_temperature().unwrap();

    let ops = interface.operations();
    assert_eq!(ops.len(), 2);
    assert_eq!(
        ops[0],
        crate::common::Operation::Write {
            address: 0x68,
            bytes: vec![0x41]
        }
    );
    assert_eq!(
        ops[1],
        crate::common::Operation::Read {
            address: 0x68,
            len: 2
        }
    );
}

#[test]
fn test_temperature_read_is_never_throttled() {
    let (mut driver, interface, _clock) = create_mock_driver();

    // Full read marks the throttle at t = 0
    driver.read().unwrap();

    interface.set_temperature_data(680);
    assert_eq!(driver.read_temperature().unwrap(), SampleOutcome::Fresh);
    assert_eq!(driver.read_temperature().unwrap(), SampleOutcome::Fresh);
    assert_float_eq(driver.temperature(), 38.53, 0.001);

    // And it does not mark the throttle either
    assert_eq!(driver.read().unwrap(), SampleOutcome::Throttled);
}

#[test]
fn test_temperature_read_leaves_motion_state() {
    let (mut driver, interface, clock) = create_mock_driver();

    interface.set_accel_data(0, 8192, 8192);
    driver.read().unwrap();
    let orientation = driver.orientation();
    let accel = driver.acceleration();

    clock.advance_ms(20);
    interface.set_accel_data(0, 0, 0);
    interface.set_temperature_data(1000);
    driver.read_temperature().unwrap();

    assert_eq!(driver.orientation(), orientation);
    assert_eq!(driver.acceleration(), accel);
    assert_eq!(driver.raw().temperature, 1000);
}
