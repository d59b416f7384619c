//! Periodic interlock loop over the device registry.
//!
//! Single cooperative loop, one process-wide tick: delay the base
//! interval, then visit every registered device in registration order
//! with a short stagger so the external sources are not hit
//! back-to-back. Estimation failures degrade to the sentinel reading
//! inside the device and can never abort the traversal; a `Fault`
//! device stays registered but is skipped.
//!
//! Timing goes through [`embedded_hal::delay::DelayNs`] so the cadence
//! is testable; [`Sleep`] is the host provider.

use embedded_hal::delay::DelayNs;
use log::error;

use crate::device::{Device, State};
use crate::interface::{AnalogSource, ConfigStore, TimingDevice};

/// Base tick interval.
pub const TICK_MS: u32 = 100;
/// Stagger between devices within one tick.
pub const STAGGER_US: u32 = 1000;

/// Ordered collection of the managed devices.
///
/// Owned by the process supervisor; entries are appended at device
/// initialization and never removed for the process lifetime.
#[derive(Default)]
pub struct Registry<A, T, C>(Vec<Device<A, T, C>>);

impl<A, T, C> Registry<A, T, C> {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn register(&mut self, device: Device<A, T, C>) {
        self.0.push(device);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Device<A, T, C>> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, Device<A, T, C>> {
        self.0.iter_mut()
    }

    pub fn get(&self, index: usize) -> Option<&Device<A, T, C>> {
        self.0.get(index)
    }
}

/// The interlock monitor. Borrows the registry for the process
/// lifetime and drives all periodic behavior.
pub struct Monitor<'a, A, T, C, D> {
    registry: &'a mut Registry<A, T, C>,
    delay: D,
}

impl<'a, A, T, C, D> Monitor<'a, A, T, C, D>
where
    A: AnalogSource,
    T: TimingDevice,
    C: ConfigStore,
    D: DelayNs,
{
    pub fn new(registry: &'a mut Registry<A, T, C>, delay: D) -> Self {
        Self { registry, delay }
    }

    /// One pass over the registry in registration order.
    pub fn tick(&mut self) {
        self.delay.delay_ms(TICK_MS);
        for dev in self.registry.iter_mut() {
            self.delay.delay_us(STAGGER_US);
            if dev.state() != State::Running {
                continue;
            }
            let power = dev.calculate_anode_power();
            if power > dev.power_limit() {
                error!(
                    "{}: anode power limit exceeded ({power} > {} kW)",
                    dev.name(),
                    dev.power_limit()
                );
                dev.trip();
            }
        }
    }

    /// Run the loop for the process lifetime.
    pub fn run(mut self) -> ! {
        loop {
            self.tick()
        }
    }
}

/// Host delay provider backed by `std::thread::sleep`.
#[derive(Copy, Clone, Debug, Default)]
pub struct Sleep;

impl DelayNs for Sleep {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(core::time::Duration::from_nanos(ns.into()));
    }
}
