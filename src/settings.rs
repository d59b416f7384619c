//! Per-device settings: proxy addresses, channel bindings, interlock
//! limit.
//!
//! Addresses and bindings are static configuration consumed once at
//! device startup. `power_limit` is the one run-time setting: the
//! attribute layer reads and writes it by tree path (`/power_limit`),
//! and the device persists writes through its configuration store.

use heapless::String;
use miniconf::{Leaf, Tree};

use crate::channel::Channel;

/// Default interlock limit, kW.
pub const DEFAULT_POWER_LIMIT: f64 = 50.0;

#[derive(Clone, Debug, Tree)]
pub struct Settings {
    /// Timing device address.
    pub timer: Leaf<String<64>>,
    /// Analog source address.
    pub adc: Leaf<String<64>>,
    /// Output source address. Bound at startup, currently not written.
    pub dac: Leaf<String<64>>,

    /// Attribute name of the anode current channel.
    pub ia: Leaf<String<32>>,
    /// Attribute name of the anode supply voltage channel.
    pub ea: Leaf<String<32>>,
    /// Attribute name of the anode RF voltage amplitude channel.
    pub ua: Leaf<String<32>>,
    /// Attribute name of the cathode current channel.
    pub ic: Leaf<String<32>>,
    /// Attribute name of the screen grid current channel.
    pub iscr: Leaf<String<32>>,
    /// Attribute name of the grid drive voltage channel.
    pub ug1: Leaf<String<32>>,

    /// Anode power interlock limit, kW.
    pub power_limit: Leaf<f64>,
    /// Authorization token required by the pulse-off command.
    pub secret: Leaf<String<32>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timer: Leaf(String::try_from("binp/nbi/timing").unwrap()),
            adc: Leaf(String::try_from("binp/nbi/adc0").unwrap()),
            dac: Leaf(String::try_from("binp/nbi/dac0").unwrap()),
            ia: Leaf(String::try_from(Channel::Ia.default_binding()).unwrap()),
            ea: Leaf(String::try_from(Channel::Ea.default_binding()).unwrap()),
            ua: Leaf(String::try_from(Channel::Ua.default_binding()).unwrap()),
            ic: Leaf(String::try_from(Channel::Ic.default_binding()).unwrap()),
            iscr: Leaf(String::try_from(Channel::Iscr.default_binding()).unwrap()),
            ug1: Leaf(String::try_from(Channel::Ug1.default_binding()).unwrap()),
            power_limit: Leaf(DEFAULT_POWER_LIMIT),
            secret: Leaf(String::try_from("topsecret").unwrap()),
        }
    }
}

impl Settings {
    /// Attribute binding of a logical channel on the analog source.
    pub fn binding(&self, ch: Channel) -> &str {
        match ch {
            Channel::Ia => self.ia.as_str(),
            Channel::Ea => self.ea.as_str(),
            Channel::Ua => self.ua.as_str(),
            Channel::Ic => self.ic.as_str(),
            Channel::Iscr => self.iscr.as_str(),
            Channel::Ug1 => self.ug1.as_str(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings() {
        let s = Settings::default();
        for ch in Channel::ALL {
            assert_eq!(s.binding(ch), ch.default_binding());
        }
        assert_eq!(*s.power_limit, DEFAULT_POWER_LIMIT);
    }

    #[test]
    fn limit_by_path() {
        let mut s = Settings::default();
        miniconf::json::set(&mut s, "/power_limit", b"25.5").unwrap();
        assert_eq!(*s.power_limit, 25.5);

        let mut buf = [0u8; 32];
        let len = miniconf::json::get(&s, "/power_limit", &mut buf).unwrap();
        assert_eq!(&buf[..len], b"25.5");
    }

    #[test]
    fn binding_by_path() {
        let mut s = Settings::default();
        miniconf::json::set(&mut s, "/ug1", b"\"adc7\"").unwrap();
        assert_eq!(s.binding(Channel::Ug1), "adc7");
    }
}
