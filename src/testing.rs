//! Scriptable adapters and float helpers for the test suite.
//!
//! The mocks are cheap `Rc<RefCell<_>>` handles so a test keeps a view
//! into the adapter state it moved into a device.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::interface::{AnalogSource, AttributeInfo, ConfigStore, TimingDevice};

pub fn isclose(a: f64, b: f64, rtol: f64, atol: f64) -> bool {
    (a - b).abs() <= a.abs().max(b.abs()) * rtol + atol
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError(pub &'static str);

#[derive(Default)]
pub struct AdcState {
    /// Sample value per attribute name.
    pub values: HashMap<String, f64>,
    /// `display_unit` metadata per attribute name.
    pub units: HashMap<String, String>,
    /// Attribute names whose reads fail.
    pub fail_reads: Vec<String>,
    /// Fail every metadata query.
    pub fail_info: bool,
    pub reads: usize,
}

#[derive(Clone, Default)]
pub struct MockAdc(pub Rc<RefCell<AdcState>>);

impl AnalogSource for MockAdc {
    type Error = MockError;

    fn attribute_info(&mut self, name: &str) -> Result<AttributeInfo, MockError> {
        let state = self.0.borrow();
        if state.fail_info {
            return Err(MockError("attribute_info"));
        }
        let mut info = AttributeInfo::default();
        if let Some(unit) = state.units.get(name) {
            info.display_unit.push_str(unit).ok();
        }
        Ok(info)
    }

    fn read(&mut self, name: &str) -> Result<f64, MockError> {
        let mut state = self.0.borrow_mut();
        state.reads += 1;
        if state.fail_reads.iter().any(|n| n == name) {
            return Err(MockError("read"));
        }
        state.values.get(name).copied().ok_or(MockError("no such channel"))
    }
}

#[derive(Default)]
pub struct TimerState {
    /// Outputs disabled so far, in write order.
    pub disabled: Vec<u8>,
    /// Total enable writes attempted.
    pub writes: usize,
    /// Outputs whose writes fail.
    pub fail_indices: Vec<u8>,
}

#[derive(Clone, Default)]
pub struct MockTimer(pub Rc<RefCell<TimerState>>);

impl TimingDevice for MockTimer {
    type Error = MockError;

    fn set_channel_enable(&mut self, index: u8, enabled: bool) -> Result<(), MockError> {
        let mut state = self.0.borrow_mut();
        state.writes += 1;
        if state.fail_indices.contains(&index) {
            return Err(MockError("set_channel_enable"));
        }
        if !enabled {
            state.disabled.push(index);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct StoreState {
    pub values: HashMap<String, f64>,
    /// Fail every access.
    pub fail: bool,
}

#[derive(Clone, Default)]
pub struct MockStore(pub Rc<RefCell<StoreState>>);

impl ConfigStore for MockStore {
    type Error = MockError;

    fn get(&mut self, key: &str) -> Result<Option<f64>, MockError> {
        let state = self.0.borrow();
        if state.fail {
            return Err(MockError("get"));
        }
        Ok(state.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: f64) -> Result<(), MockError> {
        let mut state = self.0.borrow_mut();
        if state.fail {
            return Err(MockError("set"));
        }
        state.values.insert(key.into(), value);
        Ok(())
    }
}

/// Delay provider that only accumulates the requested nanoseconds.
#[derive(Clone, Default)]
pub struct MockDelay(pub Rc<RefCell<u64>>);

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.0.borrow_mut() += u64::from(ns);
    }
}
