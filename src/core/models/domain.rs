//! Log domains
//!
//! A domain scopes pattern rules and causal-adjacency relationships.
//! Declaration order doubles as the tie-break priority for events that share
//! a timestamp: upstream causes sort before their downstream effects.

use serde::{Deserialize, Serialize};

/// Log category an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    /// BIOS/UEFI, POST, microcode, machine checks, watchdogs
    Firmware,
    /// Temperature sensors, fans, throttling, thermal trips
    Thermal,
    /// Voltage regulators and rail monitoring
    Vrm,
    /// DIMMs, ECC, allocation failures
    Memory,
    /// Links, sockets, DNS, TLS
    Network,
    /// Userland services and processes
    Application,
    /// Terminal power events: shutdown, reset, brown-out, PSU loss
    Power,
}

impl Domain {
    /// Every domain, in tie-break priority order
    pub const ALL: [Self; 7] = [
        Self::Firmware,
        Self::Thermal,
        Self::Vrm,
        Self::Memory,
        Self::Network,
        Self::Application,
        Self::Power,
    ];

    /// Position used to order events that share a timestamp (lower first)
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Firmware => 0,
            Self::Thermal => 1,
            Self::Vrm => 2,
            Self::Memory => 3,
            Self::Network => 4,
            Self::Application => 5,
            Self::Power => 6,
        }
    }

    /// Lowercase identifier as used in catalogs and config files
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Firmware => "firmware",
            Self::Thermal => "thermal",
            Self::Vrm => "vrm",
            Self::Memory => "memory",
            Self::Network => "network",
            Self::Application => "application",
            Self::Power => "power",
        }
    }

    /// Name of the failure cascade rooted in this domain
    #[must_use]
    pub const fn cascade_label(self) -> &'static str {
        match self {
            Self::Firmware => "firmware cascade",
            Self::Thermal => "thermal cascade",
            Self::Vrm => "power delivery cascade",
            Self::Memory => "memory cascade",
            Self::Network => "network cascade",
            Self::Application => "application failure",
            Self::Power => "power loss",
        }
    }

    /// Follow-up actions for a chain rooted in this domain
    #[must_use]
    pub fn recommendations(self) -> Vec<String> {
        let items: &[&str] = match self {
            Self::Firmware => &[
                "Check firmware and microcode revisions against the vendor advisory list",
                "Review POST and machine-check records for the affected boot",
            ],
            Self::Thermal => &[
                "Inspect cooling: fan health, airflow, heatsink seating",
                "Compare sensor readings against the platform thermal limits",
            ],
            Self::Vrm => &[
                "Inspect voltage regulator telemetry around the first fault",
                "Verify PSU rails and load balance under peak draw",
            ],
            Self::Memory => &[
                "Run a memory diagnostic on the reporting DIMM slot",
                "Track correctable ECC counts for a degrading module",
            ],
            Self::Network => &[
                "Check link partner logs and cabling for the affected port",
                "Verify DNS and TLS configuration on the failing endpoint",
            ],
            Self::Application => &[
                "Review the crashing service's own logs and core dumps",
                "Correlate with recent deployments or configuration changes",
            ],
            Self::Power => &[
                "Review PSU and facility power events for the interval",
                "Confirm protection thresholds that triggered the shutdown",
            ],
        };
        items.iter().map(|s| (*s).to_string()).collect()
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Domain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "firmware" => Ok(Self::Firmware),
            "thermal" => Ok(Self::Thermal),
            "vrm" => Ok(Self::Vrm),
            "memory" => Ok(Self::Memory),
            "network" => Ok(Self::Network),
            "application" | "app" => Ok(Self::Application),
            "power" => Ok(Self::Power),
            _ => Err(format!(
                "Invalid domain: {s}. Use: firmware, thermal, vrm, memory, network, application, power"
            )),
        }
    }
}
