//! Data models for the CQHTTP protocol.
//!
//! Entities are plain serde types; parsing the `data` field of a reply into
//! one of them is the only validation the client performs.

pub mod account;
pub mod envelope;
pub mod file;
pub mod group;
pub mod message;
pub mod segment;
pub mod system;
pub mod types;

pub use account::{Bot, Device, Friend, QiDianAccount, Stranger, VipInfo};
pub use envelope::ApiResponse;
pub use file::{
    GroupFile, GroupFileSystem, GroupFileTree, GroupFolder, ImageFile, Ocr, Point, TextDetection,
};
pub use group::{
    AtAllRemain, CurrentTalkative, EssenceMessage, Group, GroupSystemMessage, Honor, HonorMember,
    InvitedRequest, JoinRequest, Member, MemberRole,
};
pub use message::{
    BotMessage, ForwardEntry, ForwardMessages, ForwardNode, ForwardedMessage, Message,
    MessageContent,
};
pub use segment::{ForwardData, NodeData, RawSegment, Segment};
pub use system::{AppStatus, AppVersion, ModelVariant, Statistics, UrlSafety};
pub use types::{Anonymous, Sender};
