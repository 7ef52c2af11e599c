//! Hardware adapter: bridges embedded-hal pins to the [`LinePort`].
//!
//! Owns the three actuator outputs and the sensor input.  Construction is
//! initialisation: every output is driven low before the controller is
//! handed out.  Release is scoped: `Drop` calls [`GpioHardware::shutdown`]
//! unless it already ran, so lines go dark and are handed back to the OS
//! on every exit path, unwinding included.
//!
//! Generic over the embedded-hal 1.0 digital traits; the Linux backend in
//! [`linux_gpio`](super::linux_gpio) supplies sysfs pins, tests supply mocks.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{info, warn};

use crate::app::model::ActuatorLine;
use crate::app::ports::LinePort;
use crate::error::HardwareError;

/// Hook run once when the controller releases its lines.
pub type ReleaseHook = Box<dyn FnOnce() + Send>;

/// Concrete controller combining all dispenser lines behind [`LinePort`].
pub struct GpioHardware<O: OutputPin, I: InputPin> {
    indicator: O,
    pump: O,
    valve: O,
    sensor: I,
    release: Option<ReleaseHook>,
    released: bool,
}

impl<O: OutputPin, I: InputPin> GpioHardware<O, I> {
    /// Take ownership of configured pins and drive every output to off.
    pub fn initialize(indicator: O, pump: O, valve: O, sensor: I) -> Result<Self, HardwareError> {
        let mut hw = Self {
            indicator,
            pump,
            valve,
            sensor,
            release: None,
            released: false,
        };
        hw.all_off()?;
        info!("GPIO initialized successfully");
        Ok(hw)
    }

    /// Attach a hook that returns the lines to the OS on shutdown.
    pub fn with_release(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.release = Some(Box::new(hook));
        self
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Drive all outputs low and release the lines.  Idempotent.
    pub fn shutdown(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = self.all_off() {
            warn!("GPIO shutdown: {}", e);
        }
        if let Some(hook) = self.release.take() {
            hook();
        }
        self.released = true;
        info!("GPIO cleaned up");
    }

    fn output(&mut self, line: ActuatorLine) -> &mut O {
        match line {
            ActuatorLine::Indicator => &mut self.indicator,
            ActuatorLine::Pump => &mut self.pump,
            ActuatorLine::Valve => &mut self.valve,
        }
    }
}

impl<O: OutputPin, I: InputPin> LinePort for GpioHardware<O, I> {
    fn set_line(&mut self, line: ActuatorLine, active: bool) -> Result<(), HardwareError> {
        if self.released {
            return Err(HardwareError::Released);
        }
        let pin = self.output(line);
        let result = if active { pin.set_high() } else { pin.set_low() };
        result.map_err(|e| HardwareError::Write {
            role: line,
            detail: format!("{e:?}"),
        })
    }

    fn read_sensor(&mut self) -> Result<bool, HardwareError> {
        if self.released {
            return Err(HardwareError::Released);
        }
        self.sensor.is_high().map_err(|e| HardwareError::Read {
            detail: format!("{e:?}"),
        })
    }

    fn all_off(&mut self) -> Result<(), HardwareError> {
        let mut first_err = None;
        for line in ActuatorLine::ALL {
            let pin = self.output(line);
            if let Err(e) = pin.set_low() {
                warn!("{} off failed: {:?}", line, e);
                first_err.get_or_insert(HardwareError::Write {
                    role: line,
                    detail: format!("{e:?}"),
                });
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

impl<O: OutputPin, I: InputPin> Drop for GpioHardware<O, I> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
