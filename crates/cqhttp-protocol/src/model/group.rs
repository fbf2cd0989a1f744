//! Group-level entities.

use serde::{Deserialize, Serialize};

/// Role of a member inside a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum MemberRole {
    /// Regular member.
    #[default]
    Member,
    /// Administrator.
    Admin,
    /// Owner.
    Owner,
}

impl MemberRole {
    /// Parses the wire form; anything unrecognised is a plain member.
    pub fn parse(role: &str) -> Self {
        match role {
            "owner" => Self::Owner,
            "admin" => Self::Admin,
            _ => Self::Member,
        }
    }
}

/// Group descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub group_id: i64,
    pub group_name: String,
    #[serde(default)]
    pub group_memo: String,
    #[serde(default)]
    pub group_create_time: u64,
    #[serde(default)]
    pub group_level: u32,
    #[serde(default)]
    pub member_count: i32,
    #[serde(default)]
    pub max_member_count: i32,
}

/// Group member descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub group_id: i64,
    pub user_id: i64,
    pub nickname: String,
    /// Group card; empty when unset.
    #[serde(default)]
    pub card: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub age: i32,
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub join_time: i64,
    #[serde(default)]
    pub last_sent_time: i64,
    #[serde(default)]
    pub level: String,
    /// `owner`, `admin` or `member`.
    #[serde(default)]
    pub role: String,
    /// Whether the member has a bad record.
    #[serde(default)]
    pub unfriendly: bool,
    #[serde(default)]
    pub title: String,
    /// `-1` means the title never expires.
    #[serde(default)]
    pub title_expire_time: i64,
    #[serde(default)]
    pub card_changeable: bool,
    /// End of the current mute, `0` when not muted.
    #[serde(default)]
    pub shut_up_timestamp: i64,
}

impl Member {
    /// Typed view of [`role`](Self::role).
    pub fn member_role(&self) -> MemberRole {
        MemberRole::parse(&self.role)
    }

    /// Card if set, otherwise nickname.
    pub fn display_name(&self) -> &str {
        if self.card.is_empty() {
            &self.nickname
        } else {
            &self.card
        }
    }
}

/// Group honor board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Honor {
    pub group_id: i64,
    #[serde(default)]
    pub current_talkative: Option<CurrentTalkative>,
    #[serde(default)]
    pub talkative_list: Vec<HonorMember>,
    #[serde(default)]
    pub performer_list: Vec<HonorMember>,
    #[serde(default)]
    pub legend_list: Vec<HonorMember>,
    #[serde(default)]
    pub strong_newbie_list: Vec<HonorMember>,
    #[serde(default)]
    pub emotion_list: Vec<HonorMember>,
}

/// Current holder of the dragon-king (most talkative) title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTalkative {
    pub user_id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    /// Consecutive days held.
    #[serde(default)]
    pub day_count: i32,
}

/// One entry of an honor list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HonorMember {
    pub user_id: i64,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub description: String,
}

/// Pending group system notifications.
///
/// Gateways report an empty list as `null`, hence the options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSystemMessage {
    #[serde(default)]
    pub invited_requests: Option<Vec<InvitedRequest>>,
    #[serde(default)]
    pub join_requests: Option<Vec<JoinRequest>>,
}

/// Invitation of the bot into a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitedRequest {
    pub request_id: i64,
    pub invitor_uin: i64,
    #[serde(default)]
    pub invitor_nick: String,
    pub group_id: i64,
    #[serde(default)]
    pub group_name: String,
    /// Whether the request has been handled.
    #[serde(default)]
    pub checked: bool,
    /// Handler account, `0` if unhandled.
    #[serde(default)]
    pub actor: i64,
}

/// Request of a user to join a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    pub request_id: i64,
    pub requester_uin: i64,
    #[serde(default)]
    pub requester_nick: String,
    /// Verification message.
    #[serde(default)]
    pub message: String,
    pub group_id: i64,
    #[serde(default)]
    pub group_name: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default)]
    pub actor: i64,
}

/// Remaining @all quota.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtAllRemain {
    pub can_at_all: bool,
    #[serde(default)]
    pub remain_at_all_count_for_group: i32,
    #[serde(default)]
    pub remain_at_all_count_for_uin: i32,
}

/// An essence (pinned) group message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EssenceMessage {
    pub sender_id: i64,
    #[serde(default)]
    pub sender_nick: String,
    #[serde(default)]
    pub sender_time: i64,
    #[serde(default)]
    pub operator_id: i64,
    #[serde(default)]
    pub operator_nick: String,
    #[serde(default)]
    pub operator_time: i64,
    pub message_id: i64,
}
