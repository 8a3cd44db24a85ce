//! Linux power monitor backed by `/sys/class/power_supply`.
use std::fs;
use std::path::{Path, PathBuf};

use thermo_traits::{BoxError, PowerMonitor, PowerStatus};
use tracing::{debug, trace};

use crate::error::{HwError, Result};

pub const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

pub struct SysfsPowerMonitor {
    supply: PathBuf,
}

impl SysfsPowerMonitor {
    /// Pick the first `BAT*` supply that exposes a `status` file.
    pub fn discover() -> Result<Self> {
        Self::discover_in(Path::new(POWER_SUPPLY_ROOT))
    }

    pub fn discover_in(root: &Path) -> Result<Self> {
        if !root.exists() {
            return Err(HwError::NotSupported(format!(
                "{} does not exist",
                root.display()
            )));
        }

        let mut candidates = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            let name = entry.file_name();
            if name.to_string_lossy().starts_with("BAT") && entry.path().join("status").exists()
            {
                candidates.push(entry.path());
            }
        }
        // read_dir order is unspecified; BAT0 before BAT1
        candidates.sort();

        match candidates.into_iter().next() {
            Some(supply) => {
                debug!(supply = %supply.display(), "using battery supply");
                Ok(Self { supply })
            }
            None => Err(HwError::NotSupported(format!(
                "no BAT* supply with a status file under {}",
                root.display()
            ))),
        }
    }

    pub fn supply(&self) -> &Path {
        &self.supply
    }

    fn read_status(&self) -> Result<PowerStatus> {
        let status = fs::read_to_string(self.supply.join("status"))?;
        let charging = parse_charging(status.trim())?;

        // capacity is optional on some firmware
        let battery_percent = match fs::read_to_string(self.supply.join("capacity")) {
            Ok(s) => Some(parse_capacity(s.trim())?),
            Err(_) => None,
        };

        trace!(charging, ?battery_percent, "sysfs power poll");
        Ok(PowerStatus {
            charging,
            battery_percent,
        })
    }
}

/// "Full" counts as charging: the charger is still attached.
fn parse_charging(status: &str) -> Result<bool> {
    match status {
        "Charging" | "Full" => Ok(true),
        "Discharging" | "Not charging" | "Unknown" => Ok(false),
        other => Err(HwError::Parse {
            what: "battery status",
            value: other.to_string(),
        }),
    }
}

fn parse_capacity(s: &str) -> Result<u8> {
    s.parse::<u8>()
        .ok()
        .filter(|v| *v <= 100)
        .ok_or_else(|| HwError::Parse {
            what: "battery capacity",
            value: s.to_string(),
        })
}

impl PowerMonitor for SysfsPowerMonitor {
    fn poll(&mut self) -> std::result::Result<PowerStatus, BoxError> {
        Ok(self.read_status()?)
    }
}
