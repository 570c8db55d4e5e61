//! Board composition root
//!
//! One `Board` per process holds the shared device handles. Each handle
//! is attached on first use and lives for the process lifetime; every
//! sensor object borrows the same `RefCell`-wrapped instance. There is
//! no teardown and no mutual exclusion: full-scale and sensitivity
//! settings on the IMU are last-writer-wins across all consumers.

use core::cell::{OnceCell, RefCell};

use sensebit_core::config::{ConfigStorage, ConfigStore};
use sensebit_core::traits::{AnalogPin, ImuDriver};

use crate::accelerometer::Accelerometer;
use crate::compass::Compass;
use crate::error::Error;
use crate::gyro::Gyro;
use crate::light::LightSensor;
use crate::temperature::Temperature;

/// A lazily-attached shared device handle.
///
/// The attach closure runs exactly once, on first access; later
/// accesses return the cached handle.
pub struct Lazy<T, F> {
    attach: F,
    handle: OnceCell<RefCell<T>>,
}

impl<T, F: Fn() -> T> Lazy<T, F> {
    pub const fn new(attach: F) -> Self {
        Self {
            attach,
            handle: OnceCell::new(),
        }
    }

    /// The shared handle, attaching the device if this is the first use.
    pub fn get(&self) -> &RefCell<T> {
        self.handle.get_or_init(|| RefCell::new((self.attach)()))
    }
}

/// The board's shared devices: IMU, light pin, temperature pin and the
/// persisted configuration document.
pub struct Board<I, L, T, S, FI, FL, FT> {
    imu: Lazy<I, FI>,
    light: Lazy<L, FL>,
    temperature: Lazy<T, FT>,
    config: RefCell<ConfigStore<S>>,
}

impl<I, L, T, S, FI, FL, FT> Board<I, L, T, S, FI, FL, FT>
where
    I: ImuDriver,
    L: AnalogPin,
    T: AnalogPin,
    S: ConfigStorage,
    FI: Fn() -> I,
    FL: Fn() -> L,
    FT: Fn() -> T,
{
    /// Build the composition root from the device attach closures and
    /// the configuration storage. No device is touched yet.
    pub fn new(imu: FI, light: FL, temperature: FT, storage: S) -> Self {
        Self {
            imu: Lazy::new(imu),
            light: Lazy::new(light),
            temperature: Lazy::new(temperature),
            config: RefCell::new(ConfigStore::new(storage)),
        }
    }

    /// The shared IMU handle.
    pub fn imu(&self) -> &RefCell<I> {
        self.imu.get()
    }

    /// The shared light-sensor pin.
    pub fn light_pin(&self) -> &RefCell<L> {
        self.light.get()
    }

    /// The shared temperature pin.
    pub fn temperature_pin(&self) -> &RefCell<T> {
        self.temperature.get()
    }

    /// The shared configuration store.
    pub fn config(&self) -> &RefCell<ConfigStore<S>> {
        &self.config
    }

    /// An accelerometer over the shared IMU, with default range/unit.
    pub fn accelerometer(&self) -> Result<Accelerometer<'_, I>, Error> {
        Accelerometer::new(self.imu())
    }

    /// A gyro over the shared IMU, with default range/unit.
    pub fn gyro(&self) -> Result<Gyro<'_, I>, Error> {
        Gyro::new(self.imu())
    }

    /// A compass over the shared IMU, restoring persisted calibration.
    pub fn compass(&self) -> Compass<'_, I, S> {
        Compass::new(self.imu(), self.config())
    }

    /// The ambient-light sensor.
    pub fn light_sensor(&self) -> LightSensor<'_, L> {
        LightSensor::new(self.light_pin())
    }

    /// The thermistor temperature sensor.
    pub fn temperature(&self) -> Temperature<'_, T> {
        Temperature::new(self.temperature_pin())
    }
}
