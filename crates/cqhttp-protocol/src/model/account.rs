//! Account-level entities: the bot itself, friends and strangers.

use serde::{Deserialize, Serialize};

/// The logged-in bot account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bot {
    pub user_id: i64,
    pub nickname: String,
}

/// QiDian (enterprise QQ) account details.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QiDianAccount {
    /// Parent account ID.
    pub master_id: i64,
    /// User name.
    #[serde(default)]
    pub ext_name: String,
    /// Account creation time.
    #[serde(default)]
    pub create_time: i64,
}

/// Public profile of an arbitrary user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stranger {
    pub user_id: i64,
    pub nickname: String,
    /// `male`, `female` or `unknown`.
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub age: i32,
    /// QID identity card.
    #[serde(default)]
    pub qid: String,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub login_days: i32,
}

/// A (possibly unidirectional) friend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Friend {
    pub user_id: i64,
    pub nickname: String,
    #[serde(default)]
    pub remark: String,
    /// How a unidirectional friend was added.
    #[serde(default)]
    pub source: Option<String>,
}

/// VIP membership details of a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VipInfo {
    pub user_id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub level: i64,
    #[serde(default)]
    pub level_speed: f64,
    /// e.g. `普通会员` or `超级会员`.
    #[serde(default)]
    pub vip_level: String,
    #[serde(default)]
    pub vip_growth_speed: i64,
    #[serde(default)]
    pub vip_growth_total: i64,
}

/// A client logged into the bot account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub app_id: i64,
    pub device_name: String,
    #[serde(default)]
    pub device_kind: String,
}
