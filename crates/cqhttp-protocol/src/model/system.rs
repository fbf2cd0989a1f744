//! Gateway-level entities: version, status and assorted utilities.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Version of the gateway implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppVersion {
    pub app_name: String,
    pub app_version: String,
    /// OneBot protocol version, e.g. `v11`.
    pub protocol_version: String,
    /// Implementation-specific extras (`runtime_os`, `coolq_edition`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Health of the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppStatus {
    /// Whether the bot account is online. `None` means unknown.
    pub online: Option<bool>,
    /// Overall health.
    pub good: bool,
    #[serde(default)]
    pub app_initialized: Option<bool>,
    #[serde(default)]
    pub app_enabled: Option<bool>,
    #[serde(default)]
    pub plugins_good: Option<bool>,
    #[serde(default)]
    pub app_good: Option<bool>,
    #[serde(default)]
    pub stat: Option<Statistics>,
}

/// Traffic counters reported with [`AppStatus`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Statistics {
    #[serde(alias = "PacketReceived")]
    pub packet_received: u64,
    #[serde(alias = "PacketSent")]
    pub packet_sent: u64,
    #[serde(alias = "PacketLost")]
    pub packet_lost: u64,
    #[serde(alias = "MessageReceived")]
    pub message_received: u64,
    #[serde(alias = "MessageSent")]
    pub message_sent: u64,
    #[serde(alias = "DisconnectTimes")]
    pub disconnect_times: u64,
    #[serde(alias = "LostTimes")]
    pub lost_times: u64,
    #[serde(alias = "LastMessageTime")]
    pub last_message_time: i64,
}

/// Safety rating of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlSafety {
    /// `1` safe, `2` unknown, `3` dangerous.
    pub level: i32,
}

impl UrlSafety {
    pub fn is_safe(&self) -> bool {
        self.level == 1
    }

    pub fn is_dangerous(&self) -> bool {
        self.level == 3
    }
}

/// One selectable online-device label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVariant {
    pub model_show: String,
    #[serde(default)]
    pub need_pay: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_version_keeps_extras() {
        let version: AppVersion = serde_json::from_value(json!({
            "app_name": "go-cqhttp",
            "app_version": "v1.0.0",
            "protocol_version": "v11",
            "runtime_os": "linux"
        }))
        .unwrap();
        assert_eq!(version.app_name, "go-cqhttp");
        assert_eq!(version.extra["runtime_os"], "linux");
    }

    #[test]
    fn test_status_statistics_aliases() {
        let status: AppStatus = serde_json::from_value(json!({
            "online": true,
            "good": true,
            "stat": { "PacketReceived": 10, "message_sent": 3 }
        }))
        .unwrap();
        let stat = status.stat.unwrap();
        assert_eq!(stat.packet_received, 10);
        assert_eq!(stat.message_sent, 3);
    }
}
