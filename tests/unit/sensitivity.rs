//! Unit tests for accelerometer and gyroscope range selection

use crate::common::{MockError, Operation, assert_float_eq, create_mock_driver};
use gy521::{AccelSensitivity, Error, GyroSensitivity, Status};

#[test]
fn test_power_on_defaults() {
    let (driver, _interface, _clock) = create_mock_driver();

    assert_eq!(driver.accel_sensitivity(), AccelSensitivity::G2);
    assert_eq!(driver.gyro_sensitivity(), GyroSensitivity::Dps250);
    assert_float_eq(driver.accel_scale(), 1.0 / 16384.0, 1e-9);
    assert_float_eq(driver.gyro_scale(), 1.0 / 131.0, 1e-9);
}

#[test]
fn test_set_accel_sensitivity() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.set_accel_sensitivity(2).unwrap();

    assert_eq!(interface.get_register(0x1C), 0x10);
    assert_eq!(driver.accel_sensitivity(), AccelSensitivity::G8);
    assert_float_eq(driver.accel_scale(), 4.0 / 16384.0, 1e-9);
}

#[test]
fn test_accel_scale_applies_to_reads() {
    let (mut driver, interface, clock) = create_mock_driver();
    interface.set_accel_data(16384, 0, 0);

    for code in 0..4u8 {
        driver.set_accel_sensitivity(code).unwrap();
        driver.read_accel().unwrap();
        assert_float_eq(driver.acceleration().x, f32::from(1u8 << code), 1e-5);
        clock.advance_ms(10);
    }
}

#[test]
fn test_redundant_set_writes_once() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.set_accel_sensitivity(2).unwrap();
    driver.set_accel_sensitivity(2).unwrap();
    assert_eq!(interface.register_write_count(0x1C), 1);

    driver.set_gyro_sensitivity(GyroSensitivity::Dps500).unwrap();
    driver.set_gyro_sensitivity(GyroSensitivity::Dps500).unwrap();
    assert_eq!(interface.register_write_count(0x1B), 1);
}

#[test]
fn test_set_default_range_skips_write() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.set_accel_sensitivity(AccelSensitivity::G2).unwrap();

    assert_eq!(interface.register_write_count(0x1C), 0);
    assert_eq!(driver.last_status(), Status::Ok);
}

#[test]
fn test_set_preserves_other_bits() {
    let (mut driver, interface, _clock) = create_mock_driver();
    // Self-test bits and DLPF bits set
    interface.set_register(0x1C, 0xE7);

    driver.set_accel_sensitivity(1).unwrap();

    assert_eq!(interface.get_register(0x1C), 0xEF);
}

#[test]
fn test_out_of_range_code_clamps() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.set_accel_sensitivity(9).unwrap();
    driver.set_gyro_sensitivity(200).unwrap();

    assert_eq!(driver.accel_sensitivity(), AccelSensitivity::G16);
    assert_eq!(driver.gyro_sensitivity(), GyroSensitivity::Dps2000);
    assert_eq!(interface.get_register(0x1C), 0x18);
    assert_eq!(interface.get_register(0x1B), 0x18);
}

#[test]
fn test_gyro_scale_applies_to_reads() {
    let (mut driver, interface, _clock) = create_mock_driver();

    driver.set_gyro_sensitivity(3).unwrap();
    assert_float_eq(driver.gyro_scale(), 8.0 / 131.0, 1e-9);

    interface.set_gyro_data(131, -131, 0);
    driver.read_gyro().unwrap();
    assert_float_eq(driver.angular_rate().x, 8.0, 1e-4);
    assert_float_eq(driver.angular_rate().y, -8.0, 1e-4);
}

#[test]
fn test_read_sensitivity_updates_cache_only() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.set_register(0x1C, 0x08);
    interface.set_register(0x1B, 0x18);

    assert_eq!(driver.read_accel_sensitivity().unwrap(), AccelSensitivity::G4);
    assert_eq!(driver.read_gyro_sensitivity().unwrap(), GyroSensitivity::Dps2000);

    assert_eq!(driver.accel_sensitivity(), AccelSensitivity::G4);
    assert_eq!(driver.gyro_sensitivity(), GyroSensitivity::Dps2000);
    // Conversion factors only follow the setters
    assert_float_eq(driver.accel_scale(), 1.0 / 16384.0, 1e-9);
    assert_float_eq(driver.gyro_scale(), 1.0 / 131.0, 1e-9);
}

#[test]
fn test_read_sensitivity_failure() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.fail_next_read();

    assert_eq!(
        driver.read_gyro_sensitivity(),
        Err(Error::Read(MockError::Bus))
    );
    assert_eq!(driver.last_status(), Status::ReadError);
    assert_eq!(driver.gyro_sensitivity(), GyroSensitivity::Dps250);
}

#[test]
fn test_failed_set_keeps_scale() {
    let (mut driver, interface, _clock) = create_mock_driver();

    interface.fail_next_read();
    assert!(driver.set_accel_sensitivity(3).is_err());
    assert_eq!(driver.accel_sensitivity(), AccelSensitivity::G2);
    assert_float_eq(driver.accel_scale(), 1.0 / 16384.0, 1e-9);

    interface.fail_next_write();
    assert_eq!(
        driver.set_gyro_sensitivity(3),
        Err(Error::Write(MockError::Nack))
    );
    assert_eq!(driver.gyro_sensitivity(), GyroSensitivity::Dps250);
    assert_eq!(interface.get_register(0x1B), 0x00);
}

#[test]
fn test_range_change_transactions() {
    let (mut driver, interface, _clock) = create_mock_driver();
    // Gyro self-test X and the reserved low bits must survive the update
    interface.set_register(0x1B, 0x85);

    driver.set_gyro_sensitivity(GyroSensitivity::Dps1000).unwrap();

    assert_eq!(
        interface.operations(),
        vec![
            Operation::Write {
                address: 0x68,
                bytes: vec![0x1B]
            },
            Operation::Read {
                address: 0x68,
                len: 1
            },
            Operation::Write {
                address: 0x68,
                bytes: vec![0x1B, 0x95]
            },
        ]
    );
}

#[test]
fn test_read_sensitivity_ignores_self_test_bits() {
    let (mut driver, interface, _clock) = create_mock_driver();
    interface.set_register(0x1C, 0xE7 | 0x08);
    interface.set_register(0x1B, 0xE7);

    assert_eq!(driver.read_accel_sensitivity().unwrap(), AccelSensitivity::G4);
    assert_eq!(driver.read_gyro_sensitivity().unwrap(), GyroSensitivity::Dps250);
}
