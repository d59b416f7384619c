//! One managed amplifier: lifecycle, estimation command, interlock
//! shutdown.

use log::{debug, error, info, warn};
use serde::Serialize;

use crate::channel::{resolve_scale, Channel, Scales};
use crate::estimator::{self, ComputeError, PowerEstimate, Samples, INVALID_POWER};
use crate::interface::{AnalogSource, ConfigStore, TimingDevice};
use crate::settings::Settings;
use crate::telemetry::Report;

/// Number of enable outputs on the timing device that gate RF drive.
pub const ENABLE_OUTPUTS: u8 = 12;

/// Configuration-store key of the persisted interlock limit.
pub const POWER_LIMIT_KEY: &str = "power_limit";

/// Lifecycle state of one device record. Only `Running` devices are
/// estimated by the monitor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum State {
    Init,
    Running,
    Fault,
}

/// Estimation failure classes. Both degrade to the same sentinel
/// reading; the class only matters for reporting.
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum EstimateError {
    /// An external sample read did not succeed.
    #[error("reading {} failed", .0.name())]
    Fetch(Channel),
    /// The power model hit a domain edge or a singularity.
    #[error("power model failed: {0}")]
    Compute(#[from] ComputeError),
}

/// Outcome of one authorized pulse-off invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    /// Enable outputs that could not be disabled, out of
    /// [`ENABLE_OUTPUTS`] attempts.
    pub failed: u8,
}

impl ShutdownReport {
    pub fn all_off(&self) -> bool {
        self.failed == 0
    }
}

/// One managed amplifier instance.
///
/// Owns its capability handles, the scale coefficients resolved at
/// configuration, and the last estimate. Created per configured device
/// at process startup and registered with the
/// [`Registry`](crate::monitor::Registry) for the process lifetime.
pub struct Device<A, T, C> {
    name: heapless::String<64>,
    settings: Settings,
    adc: A,
    timer: T,
    store: C,
    // Bound at startup with the other proxies; no writes go through it yet.
    _dac: A,
    scales: Scales,
    samples: Samples,
    estimate: PowerEstimate,
    power_limit: f64,
    state: State,
}

impl<A, T, C> Device<A, T, C> {
    pub fn new(name: &str, settings: Settings, adc: A, dac: A, timer: T, store: C) -> Self {
        let mut n = heapless::String::new();
        for c in name.chars() {
            if n.push(c).is_err() {
                warn!("device name {name:?} truncated to {n:?}");
                break;
            }
        }
        Self {
            name: n,
            power_limit: *settings.power_limit,
            settings,
            adc,
            timer,
            store,
            _dac: dac,
            scales: Scales::default(),
            samples: Samples::default(),
            estimate: PowerEstimate::INVALID,
            state: State::Init,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> State {
        self.state
    }

    /// Read-only anode power attribute, quality-tagged.
    pub fn estimate(&self) -> &PowerEstimate {
        &self.estimate
    }

    /// Scaled samples of the last successful acquisition, mirrored for
    /// inspection.
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    pub fn power_limit(&self) -> f64 {
        self.power_limit
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    /// Finalized report of the exposed attribute surface.
    pub fn report(&self) -> Report {
        Report {
            anode_power: self.estimate.anode_power,
            rf_power: self.estimate.rf_power,
            quality: self.estimate.quality,
            power_limit: self.power_limit,
            state: self.state,
            samples: self.samples,
        }
    }
}

impl<A, T, C> Device<A, T, C>
where
    A: AnalogSource,
    T: TimingDevice,
    C: ConfigStore,
{
    /// Load the persisted limit and resolve the channel scales, then
    /// promote to `Running`.
    ///
    /// A configuration-store failure leaves the device in `Fault`: the
    /// record stays registered but the monitor never estimates it.
    /// Scale resolution cannot fail, it degrades to unscaled readings.
    pub fn configure(&mut self) {
        self.state = State::Init;
        let stored = match self.store.get(POWER_LIMIT_KEY) {
            Ok(v) => v,
            Err(e) => {
                error!("{}: configuration failed: {e:?}", self.name);
                self.state = State::Fault;
                return;
            }
        };
        self.power_limit = stored.unwrap_or(*self.settings.power_limit);
        for ch in Channel::ALL {
            self.scales[ch] = resolve_scale(&mut self.adc, self.settings.binding(ch));
        }
        self.state = State::Running;
        info!("{}: initialized", self.name);
    }

    /// Write the interlock limit and persist it.
    ///
    /// The in-memory limit changes even if persistence fails; the next
    /// restart then falls back to the stored or default value.
    pub fn set_power_limit(&mut self, value: f64) {
        self.power_limit = value;
        if let Err(e) = self.store.set(POWER_LIMIT_KEY, value) {
            warn!("{}: storing power limit failed: {e:?}", self.name);
        }
    }

    fn acquire(&mut self) -> Result<Samples, EstimateError> {
        let mut samples = Samples::default();
        for ch in Channel::ALL {
            let binding = self.settings.binding(ch);
            match self.adc.read(binding) {
                Ok(raw) => samples.set(ch, raw * self.scales[ch]),
                Err(e) => {
                    debug!("{}: {} ({binding}): {e:?}", self.name, ch.name());
                    return Err(EstimateError::Fetch(ch));
                }
            }
        }
        Ok(samples)
    }

    fn try_estimate(&mut self) -> Result<PowerEstimate, EstimateError> {
        let samples = self.acquire()?;
        self.samples = samples;
        Ok(estimator::estimate(&samples)?)
    }

    /// Refresh the estimate from fresh samples.
    ///
    /// Always yields a well-formed value: the anode power on success,
    /// the sentinel on either failure class. Neither failure class
    /// propagates; both are logged with their distinct message.
    pub fn calculate_anode_power(&mut self) -> f64 {
        match self.try_estimate() {
            Ok(est) => {
                self.estimate = est;
                est.anode_power
            }
            Err(e) => {
                warn!("{}: {e}", self.name);
                self.estimate = PowerEstimate::INVALID;
                INVALID_POWER
            }
        }
    }

    /// Disable all RF enable outputs on the timing device.
    ///
    /// An unauthorized call performs no writes and reports nothing.
    /// An authorized call attempts every output independently and
    /// reports the aggregate outcome exactly once.
    pub fn pulse_off(&mut self, token: &str) -> Option<ShutdownReport> {
        if token != self.settings.secret.as_str() {
            return None;
        }
        let mut failed = 0;
        for index in 0..ENABLE_OUTPUTS {
            if let Err(e) = self.timer.set_channel_enable(index, false) {
                failed += 1;
                warn!("{}: disabling output {index} failed: {e:?}", self.name);
            }
        }
        if failed > 0 {
            error!(
                "{}: pulse off incomplete, {failed} of {ENABLE_OUTPUTS} outputs not disabled",
                self.name
            );
        } else {
            info!("{}: pulse switched off", self.name);
        }
        Some(ShutdownReport { failed })
    }

    /// Shutdown with the device's own configured authorization. Used by
    /// the interlock path on a limit breach.
    pub fn trip(&mut self) -> Option<ShutdownReport> {
        let token = self.settings.secret.clone();
        self.pulse_off(token.as_str())
    }
}
