//! Unit tests for error handling and recovery

use crate::common::{MockError, Operation, create_mock_driver};
use gy521::{Error, SampleOutcome, Status};

#[test]
fn test_register_select_failure() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.fail_next_write();

    let result = driver.read();

    assert_eq!(result, Err(Error::Write(MockError::Nack)));
    assert_eq!(driver.last_status(), Status::WriteError);
    assert_eq!(driver.last_status().code(), -2);

    // No read is attempted after a failed register select
    let ops = interface.operations();
    assert_eq!(ops.len(), 1);
    assert!(matches!(ops[0], Operation::Write { .. }));
}

#[test]
fn test_read_failure() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.fail_next_read();

    assert_eq!(driver.read(), Err(Error::Read(MockError::Bus)));
    assert_eq!(driver.last_status(), Status::ReadError);
    assert_eq!(driver.last_status().code(), -1);
}

#[test]
fn test_short_read() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.set_accel_data(100, 200, 300);
    interface.short_next_read(6);

    assert_eq!(
        driver.read(),
        Err(Error::ShortRead {
            expected: 14,
            received: 6
        })
    );
    assert_eq!(driver.last_status(), Status::ReadError);
    // Partial data is discarded
    assert_eq!(driver.raw().accel.x, 0);
}

#[test]
fn test_failed_read_leaves_state_untouched() {
    let (mut driver, interface, clock) = create_mock_driver();

    interface.set_accel_data(0, 8192, 8192);
    interface.set_gyro_data(131, 0, 0);
    driver.read().unwrap();
    let raw = driver.raw();
    let accel = driver.acceleration();
    let orientation = driver.orientation();

    clock.advance_ms(20);
    interface.set_accel_data(1000, 1000, 1000);
    interface.fail_next_read();
    assert!(driver.read().is_err());

    assert_eq!(driver.raw(), raw);
    assert_eq!(driver.acceleration(), accel);
    assert_eq!(driver.orientation(), orientation);
}

#[test]
fn test_failed_read_does_not_mark_throttle() {
    let (mut driver, interface, _clock) = create_mock_driver();

    interface.fail_next_read();
    assert!(driver.read().is_err());

    // Same instant, but the failed attempt did not count as a sample
    assert_eq!(driver.read().unwrap(), SampleOutcome::Fresh);
    assert_eq!(driver.last_status(), Status::Ok);
}

#[test]
fn test_recovery_after_multiple_failures() {
    let (mut driver, interface, _clock) = create_mock_driver();

    for _ in 0..3 {
        interface.fail_next_read();
        assert!(driver.read_accel().is_err());
        assert!(driver.last_status().is_error());
    }

    interface.set_accel_data(0, 0, 16384);
    assert_eq!(driver.read_accel().unwrap(), SampleOutcome::Fresh);
    assert!((driver.acceleration().z - 1.0).abs() < 1e-6);
}

#[test]
fn test_status_overwritten_by_next_operation() {
    let (mut driver, interface, _clock) = create_mock_driver();

    interface.fail_next_write();
    assert!(driver.read_temperature().is_err());
    assert_eq!(driver.last_status(), Status::WriteError);

    driver.read_temperature().unwrap();
    assert_eq!(driver.last_status(), Status::Ok);
}

#[test]
fn test_bus_loss_keeps_fused_state() {
    let (mut driver, interface, clock) = create_mock_driver();

    interface.set_accel_data(0, 8192, 8192);
    interface.set_gyro_data(1310, -655, 262);
    driver.read().unwrap();
    clock.advance_ms(20);
    driver.read().unwrap();

    let orientation = driver.orientation();
    let gyro_angles = driver.gyro_angles();
    assert!(gyro_angles.x != 0.0);

    clock.advance_ms(20);
    interface.set_nack_all(true);

    assert_eq!(driver.read(), Err(Error::Write(MockError::Nack)));
    assert_eq!(driver.last_status().code(), -2);
    assert_eq!(driver.orientation(), orientation);
    assert_eq!(driver.gyro_angles(), gyro_angles);
}
