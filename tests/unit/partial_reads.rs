//! Unit tests for accelerometer-only and gyroscope-only reads

use crate::common::{Operation, assert_float_eq, create_mock_driver};
use gy521::SampleOutcome;

#[test]
fn test_accel_read_transaction() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.read_accel().unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Write {
                address: 0x68,
                bytes: vec![0x3B]
            },
            Operation::Read {
                address: 0x68,
                len: 6
            },
        ]
    );
}

#[test]
fn test_gyro_read_transaction() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.read_gyro().unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Write {
                address: 0x68,
                bytes: vec![0x43]
            },
            Operation::Read {
                address: 0x68,
                len: 6
            },
        ]
    );
}

#[test]
fn test_accel_read_updates_tilt_only() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.set_accel_data(0, 8192, 8192);
    interface.set_gyro_data(131, 131, 131);
    interface.set_temperature_data(340);

    driver.read_accel().unwrap();

    assert_float_eq(driver.acceleration().y, 0.5, 1e-6);
    assert_float_eq(driver.tilt().y, 45.0, 1e-3);

    // Gyro, temperature and orientation are untouched
    assert_eq!(driver.raw().gyro.x, 0);
    assert_eq!(driver.raw().temperature, 0);
    assert_eq!(driver.angular_rate().x, 0.0);
    assert_eq!(driver.roll(), 0.0);
    assert_eq!(driver.pitch(), 0.0);
}

#[test]
fn test_gyro_read_fuses_with_stale_tilt() {
    let (mut driver, interface, clock) = create_mock_driver();

    interface.set_accel_data(0, 8192, 8192);
    driver.read_accel().unwrap();

    // Accelerometer changes but only the gyro is read
    clock.advance_ms(20);
    interface.set_accel_data(0, 0, 16384);
    interface.set_gyro_data(0, 0, 0);
    assert_eq!(driver.read_gyro().unwrap(), SampleOutcome::Fresh);

    assert_float_eq(driver.roll(), 0.04 * 45.0, 1e-3);
    assert_float_eq(driver.acceleration().y, 0.5, 1e-6);
}

#[test]
fn test_gyro_read_integrates() {
    let (mut driver, interface, clock) = create_mock_driver();
    interface.set_gyro_data(0, 0, 1310);

    // First angular sample has no previous timestamp
    driver.read_gyro().unwrap();
    assert_eq!(driver.gyro_angles().z, 0.0);

    clock.advance_ms(500);
    driver.read_gyro().unwrap();
    assert_float_eq(driver.gyro_angles().z, 5.0, 1e-3);
    assert_float_eq(driver.yaw(), 5.0, 1e-3);
}

#[test]
fn test_accel_read_does_not_touch_integration_timestamp() {
    let (mut driver, interface, clock) = create_mock_driver();
    interface.set_gyro_data(0, 0, 131);

    driver.read_gyro().unwrap();
    clock.advance_ms(300);
    driver.read_accel().unwrap();
    clock.advance_ms(700);
    driver.read_gyro().unwrap();

    // dt spans both intervals: 1 s at 1°/s
    assert_float_eq(driver.yaw(), 1.0, 1e-3);
}

#[test]
fn test_partial_reads_share_the_throttle() {
    let (mut driver, _interface, clock) = create_mock_driver();

    assert_eq!(driver.read_accel().unwrap(), SampleOutcome::Fresh);
    clock.advance_ms(1);
    assert_eq!(driver.read_gyro().unwrap(), SampleOutcome::Throttled);
    assert_eq!(driver.read().unwrap(), SampleOutcome::Throttled);
}
