//! Industrial I/O style channel contract.
//!
//! A measurement framework talks to a converter through per-channel "info"
//! requests: read the raw code, read the scale, read the sampling frequency.
//! This module defines the shape of those requests and their answers. The
//! framework side (channel registration, sysfs plumbing) lives elsewhere;
//! drivers only implement [`IioDevice`].

use async_trait::async_trait;
use std::fmt;

/// Kind of information requested for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanInfo {
    /// Unscaled conversion result
    Raw,
    /// Conversion result already in base units
    Processed,
    /// Multiplier from raw code to base units
    Scale,
    /// Offset added to raw code before scaling
    Offset,
    /// Conversion rate in Hz
    SampFreq,
}

impl ChanInfo {
    /// Attribute name suffix used when exposing this info.
    pub fn attribute_suffix(self) -> &'static str {
        match self {
            ChanInfo::Raw => "raw",
            ChanInfo::Processed => "input",
            ChanInfo::Scale => "scale",
            ChanInfo::Offset => "offset",
            ChanInfo::SampFreq => "sampling_frequency",
        }
    }
}

/// Physical quantity measured by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanType {
    Voltage,
}

impl ChanType {
    fn attribute_stem(self) -> &'static str {
        match self {
            ChanType::Voltage => "voltage",
        }
    }
}

/// How a value pair is to be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFormat {
    Int,
    IntPlusMicro,
    IntPlusNano,
}

/// Value returned for an info request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IioValue {
    /// Plain integer
    Int(i32),
    /// Integer part plus millionths
    IntPlusMicro(i32, i32),
    /// Integer part plus billionths
    IntPlusNano(i32, i32),
}

impl IioValue {
    pub fn format(&self) -> ValueFormat {
        match self {
            IioValue::Int(_) => ValueFormat::Int,
            IioValue::IntPlusMicro(..) => ValueFormat::IntPlusMicro,
            IioValue::IntPlusNano(..) => ValueFormat::IntPlusNano,
        }
    }
}

impl fmt::Display for IioValue {
    // A negative fractional part carries the sign for the whole value, so
    // -0.5 is encoded as (0, -500000).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            IioValue::Int(val) => write!(f, "{}", val),
            IioValue::IntPlusMicro(int, frac) if frac < 0 => {
                write!(f, "-{}.{:06}", int.unsigned_abs(), frac.unsigned_abs())
            }
            IioValue::IntPlusMicro(int, frac) => write!(f, "{}.{:06}", int, frac),
            IioValue::IntPlusNano(int, frac) if frac < 0 => {
                write!(f, "-{}.{:09}", int.unsigned_abs(), frac.unsigned_abs())
            }
            IioValue::IntPlusNano(int, frac) => write!(f, "{}.{:09}", int, frac),
        }
    }
}

/// Static description of one channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub chan_type: ChanType,
    pub indexed: bool,
    pub channel: u32,
    /// Info exposed once per channel
    pub info_mask_separate: &'static [ChanInfo],
    /// Info exposed once for all channels of the same type
    pub info_mask_shared_by_type: &'static [ChanInfo],
}

impl ChannelSpec {
    /// An indexed voltage input.
    pub const fn voltage(
        channel: u32,
        separate: &'static [ChanInfo],
        shared_by_type: &'static [ChanInfo],
    ) -> Self {
        Self {
            chan_type: ChanType::Voltage,
            indexed: true,
            channel,
            info_mask_separate: separate,
            info_mask_shared_by_type: shared_by_type,
        }
    }

    pub fn supports(&self, info: ChanInfo) -> bool {
        self.info_mask_separate.contains(&info) || self.info_mask_shared_by_type.contains(&info)
    }

    /// Attribute name for `info`, e.g. `in_voltage0_raw`.
    ///
    /// Returns `None` when the channel does not expose `info`.
    pub fn attribute_name(&self, info: ChanInfo) -> Option<String> {
        let stem = self.chan_type.attribute_stem();
        let suffix = info.attribute_suffix();
        if self.info_mask_separate.contains(&info) {
            if self.indexed {
                Some(format!("in_{}{}_{}", stem, self.channel, suffix))
            } else {
                Some(format!("in_{}_{}", stem, suffix))
            }
        } else if self.info_mask_shared_by_type.contains(&info) {
            Some(format!("in_{}_{}", stem, suffix))
        } else {
            None
        }
    }
}

/// Every attribute exposed by `channels`, with shared attributes listed once.
pub fn attributes(channels: &[ChannelSpec]) -> Vec<(String, &ChannelSpec, ChanInfo)> {
    let mut out: Vec<(String, &ChannelSpec, ChanInfo)> = Vec::new();
    for chan in channels {
        let infos = chan
            .info_mask_separate
            .iter()
            .chain(chan.info_mask_shared_by_type.iter());
        for &info in infos {
            if let Some(name) = chan.attribute_name(info) {
                if !out.iter().any(|(existing, _, _)| *existing == name) {
                    out.push((name, chan, info));
                }
            }
        }
    }
    out
}

/// Driver side of the channel contract.
#[async_trait]
pub trait IioDevice: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Device name as shown to the framework.
    fn name(&self) -> &str;

    /// Channels this device exposes.
    fn channels(&self) -> &[ChannelSpec];

    /// Serve a read request for `info` on `chan`.
    async fn read_info(&self, chan: &ChannelSpec, info: ChanInfo) -> Result<IioValue, Self::Error>;

    /// Serve a write request for `info` on `chan`.
    fn write_info(&self, chan: &ChannelSpec, info: ChanInfo, value: IioValue)
        -> Result<(), Self::Error>;

    /// Format the framework should use when parsing a write to `info`.
    fn write_info_format(&self, chan: &ChannelSpec, info: ChanInfo)
        -> Result<ValueFormat, Self::Error>;

    /// Device-level attributes beyond the per-channel ones, as name/value.
    fn extra_attributes(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const CHAN: ChannelSpec =
        ChannelSpec::voltage(0, &[ChanInfo::Raw, ChanInfo::Scale], &[ChanInfo::SampFreq]);

    #[test_case(IioValue::Int(5500), "5500"; "int")]
    #[test_case(IioValue::Int(-1948), "-1948"; "negative_int")]
    #[test_case(IioValue::IntPlusNano(0, 805_664), "0.000805664"; "nano")]
    #[test_case(IioValue::IntPlusNano(0, -805_664), "-0.000805664"; "negative_nano")]
    #[test_case(IioValue::IntPlusMicro(5500, 0), "5500.000000"; "micro")]
    #[test_case(IioValue::IntPlusMicro(-2, -500_000), "-2.500000"; "negative_micro")]
    fn display(value: IioValue, expect: &str) {
        assert_eq!(value.to_string(), expect);
    }

    #[test]
    fn test_value_format() {
        assert_eq!(IioValue::Int(1).format(), ValueFormat::Int);
        assert_eq!(IioValue::IntPlusNano(0, 1).format(), ValueFormat::IntPlusNano);
        assert_eq!(IioValue::IntPlusMicro(0, 1).format(), ValueFormat::IntPlusMicro);
    }

    #[test]
    fn test_attribute_names() {
        assert_eq!(CHAN.attribute_name(ChanInfo::Raw).as_deref(), Some("in_voltage0_raw"));
        assert_eq!(CHAN.attribute_name(ChanInfo::Scale).as_deref(), Some("in_voltage0_scale"));
        assert_eq!(
            CHAN.attribute_name(ChanInfo::SampFreq).as_deref(),
            Some("in_voltage_sampling_frequency")
        );
        assert_eq!(CHAN.attribute_name(ChanInfo::Offset), None);
        assert!(CHAN.supports(ChanInfo::SampFreq));
        assert!(!CHAN.supports(ChanInfo::Processed));
    }

    #[test]
    fn test_shared_attributes_listed_once() {
        let channels = [
            CHAN.clone(),
            ChannelSpec::voltage(1, &[ChanInfo::Raw], &[ChanInfo::SampFreq]),
        ];
        let names: Vec<String> = attributes(&channels)
            .into_iter()
            .map(|(name, _, _)| name)
            .collect();
        assert_eq!(
            names,
            vec![
                "in_voltage0_raw",
                "in_voltage0_scale",
                "in_voltage_sampling_frequency",
                "in_voltage1_raw",
            ]
        );
    }
}
