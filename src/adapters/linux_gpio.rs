//! Linux sysfs GPIO backend.
//!
//! Exports the four configured lines, sets actuators as outputs driven
//! low and the sensor as an input, and wraps them in a [`GpioHardware`]
//! whose release hook unexports every line again.

use linux_embedded_hal::SysfsPin;
use log::{info, warn};
use sysfs_gpio::Direction;

use crate::config::LineMapping;
use crate::error::HardwareError;

use super::hardware::GpioHardware;

pub type LinuxHardware = GpioHardware<SysfsPin, SysfsPin>;

/// Claim and configure every line in `mapping`.
///
/// On failure, lines claimed so far are unexported before the error is
/// returned.
pub fn open(mapping: &LineMapping) -> Result<LinuxHardware, HardwareError> {
    let mut claimed: Vec<u64> = Vec::with_capacity(4);

    match configure(mapping, &mut claimed) {
        Ok(hw) => {
            info!(
                "GPIO lines: indicator={} pump={} valve={} sensor={}",
                mapping.indicator, mapping.pump, mapping.valve, mapping.sensor
            );
            let lines = claimed;
            Ok(hw.with_release(move || unexport_all(&lines)))
        }
        Err(e) => {
            unexport_all(&claimed);
            Err(e)
        }
    }
}

fn configure(mapping: &LineMapping, claimed: &mut Vec<u64>) -> Result<LinuxHardware, HardwareError> {
    let indicator = claim(mapping.indicator, Direction::Low, claimed)?;
    let pump = claim(mapping.pump, Direction::Low, claimed)?;
    let valve = claim(mapping.valve, Direction::Low, claimed)?;
    let sensor = claim(mapping.sensor, Direction::In, claimed)?;
    GpioHardware::initialize(indicator, pump, valve, sensor)
}

fn claim(line: u32, direction: Direction, claimed: &mut Vec<u64>) -> Result<SysfsPin, HardwareError> {
    let number = u64::from(line);
    let pin = SysfsPin::new(number);
    pin.export().map_err(|e| setup_error(line, &e))?;
    claimed.push(number);
    pin.set_direction(direction).map_err(|e| setup_error(line, &e))?;
    Ok(pin)
}

fn setup_error(line: u32, err: &sysfs_gpio::Error) -> HardwareError {
    HardwareError::Setup {
        line,
        detail: err.to_string(),
    }
}

fn unexport_all(lines: &[u64]) {
    for &number in lines {
        if let Err(e) = sysfs_gpio::Pin::new(number).unexport() {
            warn!("unexport of line {} failed: {}", number, e);
        }
    }
}
