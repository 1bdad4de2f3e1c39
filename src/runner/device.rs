//! Device specifiers: `gpu`, `gpu:0`, `gpu:0,1`, `cpu`

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Parsed device: a kind plus optional card ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSpec {
    pub kind: String,
    pub ids: Vec<u32>,
}

impl DeviceSpec {
    pub fn parse(device: &str) -> Result<Self> {
        let invalid = || Error::InvalidDevice(device.to_string());
        let (kind, ids) = match device.split_once(':') {
            Some((kind, ids)) => (kind, Some(ids)),
            None => (device, None),
        };
        let kind = kind.trim();
        if kind.is_empty() {
            return Err(invalid());
        }
        let ids = match ids {
            None => Vec::new(),
            Some(ids) => ids
                .split(',')
                .map(|id| id.trim().parse::<u32>().map_err(|_| invalid()))
                .collect::<Result<Vec<_>>>()?,
        };
        Ok(Self {
            kind: kind.to_lowercase(),
            ids,
        })
    }

    pub fn is_gpu(&self) -> bool {
        self.kind == "gpu"
    }

    /// More than one card: needs a distributed launch
    pub fn is_multi_card(&self) -> bool {
        self.ids.len() > 1
    }

    /// Comma-separated card ids, e.g. `0,1`
    pub fn id_list(&self) -> String {
        self.ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl FromStr for DeviceSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DeviceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ids.is_empty() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{}:{}", self.kind, self.id_list())
        }
    }
}
