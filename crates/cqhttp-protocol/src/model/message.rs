//! Message content, forward nodes and message entities.
//!
//! Outbound content is either plain text or a chain of [`Segment`]s; both
//! collapse to one wire string through [`MessageContent::render`]. Forward
//! batches are lists of [`ForwardEntry`], each either an already-raw
//! mapping or a structured [`ForwardNode`].

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use cqhttp_core::Params;

use super::segment::Segment;
use super::types::Sender;

// ============================================================================
// MessageContent
// ============================================================================

/// Outbound or fetched message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    /// A ready wire string (may already contain CQ codes).
    Text(String),
    /// A composed chain of segments.
    Chain(Vec<Segment>),
}

impl MessageContent {
    /// Renders the content as the wire string.
    ///
    /// Text passes through unchanged; a chain is the in-order concatenation
    /// of each segment's CQ code.
    pub fn render(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Chain(chain) => chain.iter().map(Segment::to_cq_code).collect(),
        }
    }

    /// Concatenates the plain text segments, ignoring everything else.
    pub fn plain_text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Chain(chain) => chain.iter().filter_map(Segment::as_text).collect(),
        }
    }
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<Vec<Segment>> for MessageContent {
    fn from(chain: Vec<Segment>) -> Self {
        MessageContent::Chain(chain)
    }
}

impl From<Segment> for MessageContent {
    fn from(segment: Segment) -> Self {
        MessageContent::Chain(vec![segment])
    }
}

impl FromIterator<Segment> for MessageContent {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        MessageContent::Chain(iter.into_iter().collect())
    }
}

// ============================================================================
// Forward nodes
// ============================================================================

/// One message inside a forwarded-message batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardNode {
    /// Re-forward an existing message.
    Reference {
        /// ID of the message to include.
        id: i64,
    },
    /// A synthetic message attributed to any sender.
    Custom {
        /// Displayed sender name.
        name: String,
        /// Displayed sender account.
        uin: i64,
        /// Node body, rendered to its wire string when sent.
        content: MessageContent,
    },
}

impl ForwardNode {
    /// Node that re-forwards message `id`.
    pub fn reference(id: i64) -> Self {
        ForwardNode::Reference { id }
    }

    /// Node with custom sender and content.
    pub fn custom(name: impl Into<String>, uin: i64, content: impl Into<MessageContent>) -> Self {
        ForwardNode::Custom {
            name: name.into(),
            uin,
            content: content.into(),
        }
    }

    /// Converts the node to its raw `{"type": "node", "data": {...}}` form.
    pub fn to_mapping(&self) -> Params {
        let data = match self {
            ForwardNode::Reference { id } => json!({ "id": id }),
            ForwardNode::Custom { name, uin, content } => json!({
                "name": name,
                "uin": uin,
                "content": content.render(),
            }),
        };
        let mut node = Params::new();
        node.insert("type".into(), Value::from("node"));
        node.insert("data".into(), data);
        node
    }
}

/// One element of a forward batch as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ForwardEntry {
    /// Already in wire form; sent unchanged.
    Raw(Params),
    /// Structured node; converted with [`ForwardNode::to_mapping`].
    Node(ForwardNode),
}

impl ForwardEntry {
    /// Returns the wire form of this entry.
    pub fn into_mapping(self) -> Params {
        match self {
            ForwardEntry::Raw(raw) => raw,
            ForwardEntry::Node(node) => node.to_mapping(),
        }
    }
}

impl From<ForwardNode> for ForwardEntry {
    fn from(node: ForwardNode) -> Self {
        ForwardEntry::Node(node)
    }
}

impl From<Params> for ForwardEntry {
    fn from(raw: Params) -> Self {
        ForwardEntry::Raw(raw)
    }
}

// ============================================================================
// Message entities
// ============================================================================

/// Receipt for a sent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotMessage {
    /// ID of the sent message.
    pub message_id: i64,
    /// Forward ID, returned by forward sends.
    #[serde(default)]
    pub forward_id: Option<String>,
}

/// A message fetched by ID or from history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub real_id: Option<i64>,
    /// Sequence number inside the group, used to page history.
    #[serde(default)]
    pub message_seq: Option<i64>,
    /// `private` or `group`.
    #[serde(default)]
    pub message_type: Option<String>,
    /// Whether the message came from a group.
    #[serde(default)]
    pub group: bool,
    #[serde(default)]
    pub group_id: Option<i64>,
    #[serde(default)]
    pub sender: Sender,
    /// Unix timestamp.
    #[serde(default)]
    pub time: i64,
    #[serde(default)]
    pub message: MessageContent,
    #[serde(default)]
    pub raw_message: Option<String>,
}

/// Content of a forwarded-message batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardMessages {
    pub messages: Vec<ForwardedMessage>,
}

/// One message inside a fetched forward batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardedMessage {
    pub content: MessageContent,
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub time: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_text_passes_through() {
        let content = MessageContent::from("[CQ:face,id=1] raw");
        assert_eq!(content.render(), "[CQ:face,id=1] raw");
    }

    #[test]
    fn test_render_chain_in_order() {
        let content: MessageContent = vec![
            Segment::at(10001000),
            Segment::text(" see [this]"),
            Segment::face(178),
        ]
        .into();
        assert_eq!(
            content.render(),
            "[CQ:at,qq=10001000] see &#91;this&#93;[CQ:face,id=178]"
        );
        assert_eq!(content.plain_text(), " see [this]");
    }

    #[test]
    fn test_forward_node_mapping() {
        let node = ForwardNode::reference(123);
        assert_eq!(
            Value::Object(node.to_mapping()),
            json!({ "type": "node", "data": { "id": 123 } })
        );

        let node = ForwardNode::custom("Alice", 10001, vec![Segment::text("hi"), Segment::face(1)]);
        assert_eq!(
            Value::Object(node.to_mapping()),
            json!({
                "type": "node",
                "data": { "name": "Alice", "uin": 10001, "content": "hi[CQ:face,id=1]" }
            })
        );
    }

    #[test]
    fn test_raw_forward_entry_is_untouched() {
        let raw = json!({ "type": "node", "data": { "id": 7, "extra": true } });
        let Value::Object(map) = raw.clone() else {
            unreachable!()
        };
        assert_eq!(Value::Object(ForwardEntry::from(map).into_mapping()), raw);
    }

    #[test]
    fn test_message_accepts_string_and_array_content() {
        let msg: Message = serde_json::from_value(json!({
            "message_id": 9,
            "message": "plain",
            "sender": { "user_id": 1, "nickname": "a" },
            "time": 1700000000
        }))
        .unwrap();
        assert_eq!(msg.message, MessageContent::Text("plain".into()));
        assert_eq!(msg.sender.user_id, Some(1));

        let msg: Message = serde_json::from_value(json!({
            "message_id": 10,
            "message": [{ "type": "text", "data": { "text": "x" } }]
        }))
        .unwrap();
        assert_eq!(msg.message, MessageContent::Chain(vec![Segment::text("x")]));
    }
}
