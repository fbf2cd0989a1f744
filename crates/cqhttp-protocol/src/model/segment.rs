//! Message chain segments and their CQ-code rendering.
//!
//! A message sent through the HTTP API is a single string in which every
//! non-text unit is written as a CQ code:
//!
//! - `text` → the text itself, escaped
//! - `face` → `[CQ:face,id=178]`
//! - `image` → `[CQ:image,file=http://...]`
//! - `at` → `[CQ:at,qq=10001000]`
//!
//! ```rust,ignore
//! use cqhttp_protocol::model::Segment;
//!
//! let chain = vec![Segment::at(10001000), Segment::text(" hello "), Segment::face(178)];
//! let wire: String = chain.iter().map(Segment::to_cq_code).collect();
//! assert_eq!(wire, "[CQ:at,qq=10001000] hello [CQ:face,id=178]");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::message::MessageContent;

/// One unit of composed message content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Segment {
    /// Plain text.
    Text(TextData),
    /// Built-in QQ face.
    Face(FaceData),
    /// Image.
    Image(MediaData),
    /// Voice record.
    Record(MediaData),
    /// Short video.
    Video(MediaData),
    /// Mention of a member, or of everyone.
    At(AtData),
    /// Rock-paper-scissors magic emoji.
    Rps(EmptyData),
    /// Dice magic emoji.
    Dice(EmptyData),
    /// Window shake.
    Shake(EmptyData),
    /// Poke.
    Poke(PokeData),
    /// Send anonymously.
    Anonymous(AnonymousData),
    /// Link share card.
    Share(ShareData),
    /// Friend or group recommendation card.
    Contact(ContactData),
    /// Location card.
    Location(LocationData),
    /// Music share card.
    Music(MusicData),
    /// Quote of an earlier message.
    Reply(ReplyData),
    /// Text-to-speech.
    Tts(TextData),
    /// Raw XML card.
    Xml(RichData),
    /// Raw JSON card.
    Json(RichData),
    /// Forwarded-message reference (receive only).
    Forward(ForwardData),
    /// Forward node.
    Node(NodeData),
    /// Any segment this client does not model, kept as received.
    #[serde(untagged)]
    Unknown(RawSegment),
}

/// Text payload (`text`, `tts`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextData {
    /// The text content.
    pub text: String,
}

/// Face payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceData {
    /// Face ID.
    pub id: String,
}

/// Payload shared by image, record and video segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaData {
    /// File name, path, URL or `base64://` payload.
    pub file: String,
    /// Image: `flash` or `show`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Download URL (filled in by the gateway on receipt).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Record: voice changer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<bool>,
    /// Whether the gateway may use a cached copy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    /// Whether the gateway downloads through its proxy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<bool>,
    /// Download timeout in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

/// Mention payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtData {
    /// QQ number, or `all`.
    pub qq: String,
}

/// Payload for segments that carry nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyData {}

/// Poke payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokeData {
    /// Poke type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Poke ID.
    pub id: String,
}

/// Anonymous payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnonymousData {
    /// Send normally if anonymity is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore: Option<bool>,
}

/// Link share payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareData {
    /// Target URL.
    pub url: String,
    /// Card title.
    pub title: String,
    /// Card description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Card image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Recommendation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactData {
    /// `qq` or `group`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Recommended account or group.
    pub id: String,
}

/// Location payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    /// Latitude.
    pub lat: String,
    /// Longitude.
    pub lon: String,
    /// Card title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Card description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Music share payload.
///
/// Platform shares (`qq`, `163`, `xm`) carry only `id`; `custom` carries the
/// link fields instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicData {
    /// `qq`, `163`, `xm` or `custom`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Reply payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplyData {
    /// Quoted message ID.
    pub id: String,
}

/// Raw card payload (`xml`, `json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichData {
    /// Card source.
    pub data: String,
}

/// Forward reference payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForwardData {
    /// Forward ID, resolvable with `get_forward_msg`.
    pub id: String,
}

/// Forward node payload.
///
/// Either `id` alone, or the sender fields plus `content`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Referenced message ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Displayed sender name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Displayed sender account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    /// Node content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<MessageContent>,
}

/// A segment of a type not listed in [`Segment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    /// Segment type as sent by the gateway.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Map<String, Value>,
}

// ============================================================================
// Constructors
// ============================================================================

impl Segment {
    /// Plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Segment::Text(TextData { text: text.into() })
    }

    /// Built-in face by ID.
    pub fn face(id: i32) -> Self {
        Segment::Face(FaceData { id: id.to_string() })
    }

    /// Image from a file name, path, URL or base64 payload.
    pub fn image(file: impl Into<String>) -> Self {
        Segment::Image(MediaData {
            file: file.into(),
            ..Default::default()
        })
    }

    /// Flash image (viewable once).
    pub fn flash_image(file: impl Into<String>) -> Self {
        Segment::Image(MediaData {
            file: file.into(),
            kind: Some("flash".to_string()),
            ..Default::default()
        })
    }

    /// Voice record.
    pub fn record(file: impl Into<String>) -> Self {
        Segment::Record(MediaData {
            file: file.into(),
            ..Default::default()
        })
    }

    /// Short video.
    pub fn video(file: impl Into<String>) -> Self {
        Segment::Video(MediaData {
            file: file.into(),
            ..Default::default()
        })
    }

    /// Mention one member.
    pub fn at(qq: i64) -> Self {
        Segment::At(AtData { qq: qq.to_string() })
    }

    /// Mention everyone.
    pub fn at_all() -> Self {
        Segment::At(AtData {
            qq: "all".to_string(),
        })
    }

    pub fn rps() -> Self {
        Segment::Rps(EmptyData {})
    }

    pub fn dice() -> Self {
        Segment::Dice(EmptyData {})
    }

    pub fn shake() -> Self {
        Segment::Shake(EmptyData {})
    }

    /// Poke of the given type and ID.
    pub fn poke(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Segment::Poke(PokeData {
            kind: kind.into(),
            id: id.into(),
        })
    }

    /// Send the message anonymously.
    pub fn anonymous(ignore: bool) -> Self {
        Segment::Anonymous(AnonymousData {
            ignore: Some(ignore),
        })
    }

    /// Link share card.
    pub fn share(url: impl Into<String>, title: impl Into<String>) -> Self {
        Segment::Share(ShareData {
            url: url.into(),
            title: title.into(),
            content: None,
            image: None,
        })
    }

    /// Friend recommendation card.
    pub fn contact_qq(id: i64) -> Self {
        Segment::Contact(ContactData {
            kind: "qq".to_string(),
            id: id.to_string(),
        })
    }

    /// Group recommendation card.
    pub fn contact_group(id: i64) -> Self {
        Segment::Contact(ContactData {
            kind: "group".to_string(),
            id: id.to_string(),
        })
    }

    /// Location card.
    pub fn location(lat: f64, lon: f64) -> Self {
        Segment::Location(LocationData {
            lat: lat.to_string(),
            lon: lon.to_string(),
            title: None,
            content: None,
        })
    }

    /// Platform music share (`qq`, `163`, `xm`).
    pub fn music(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Segment::Music(MusicData {
            kind: kind.into(),
            id: Some(id.into()),
            url: None,
            audio: None,
            title: None,
            content: None,
            image: None,
        })
    }

    /// Custom music share card.
    pub fn music_custom(
        url: impl Into<String>,
        audio: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Segment::Music(MusicData {
            kind: "custom".to_string(),
            id: None,
            url: Some(url.into()),
            audio: Some(audio.into()),
            title: Some(title.into()),
            content: None,
            image: None,
        })
    }

    /// Quote an earlier message.
    pub fn reply(id: i64) -> Self {
        Segment::Reply(ReplyData { id: id.to_string() })
    }

    /// Text-to-speech.
    pub fn tts(text: impl Into<String>) -> Self {
        Segment::Tts(TextData { text: text.into() })
    }

    pub fn xml(data: impl Into<String>) -> Self {
        Segment::Xml(RichData { data: data.into() })
    }

    pub fn json(data: impl Into<String>) -> Self {
        Segment::Json(RichData { data: data.into() })
    }

    /// Returns the text if this is a plain text segment.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Segment::Text(data) => Some(&data.text),
            _ => None,
        }
    }
}

// ============================================================================
// CQ Code Rendering
// ============================================================================

/// Incremental writer for one `[CQ:kind,key=value,...]` code.
struct CqCode(String);

impl CqCode {
    fn new(kind: &str) -> Self {
        Self(format!("[CQ:{kind}"))
    }

    fn param(mut self, key: &str, value: &str) -> Self {
        self.0.push(',');
        self.0.push_str(key);
        self.0.push('=');
        self.0.push_str(&escape_cq_value(value));
        self
    }

    fn opt(self, key: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    fn flag(self, key: &str, value: Option<bool>) -> Self {
        self.opt(key, value.map(|on| if on { "1" } else { "0" }))
    }

    fn finish(mut self) -> String {
        self.0.push(']');
        self.0
    }
}

impl Segment {
    /// Renders this segment in its wire string form.
    pub fn to_cq_code(&self) -> String {
        match self {
            Segment::Text(data) => escape_cq_text(&data.text),
            Segment::Face(data) => CqCode::new("face").param("id", &data.id).finish(),
            Segment::Image(data) => media("image", data),
            Segment::Record(data) => media("record", data),
            Segment::Video(data) => media("video", data),
            Segment::At(data) => CqCode::new("at").param("qq", &data.qq).finish(),
            Segment::Rps(_) => CqCode::new("rps").finish(),
            Segment::Dice(_) => CqCode::new("dice").finish(),
            Segment::Shake(_) => CqCode::new("shake").finish(),
            Segment::Poke(data) => CqCode::new("poke")
                .param("type", &data.kind)
                .param("id", &data.id)
                .finish(),
            Segment::Anonymous(data) => CqCode::new("anonymous")
                .flag("ignore", data.ignore)
                .finish(),
            Segment::Share(data) => CqCode::new("share")
                .param("url", &data.url)
                .param("title", &data.title)
                .opt("content", data.content.as_deref())
                .opt("image", data.image.as_deref())
                .finish(),
            Segment::Contact(data) => CqCode::new("contact")
                .param("type", &data.kind)
                .param("id", &data.id)
                .finish(),
            Segment::Location(data) => CqCode::new("location")
                .param("lat", &data.lat)
                .param("lon", &data.lon)
                .opt("title", data.title.as_deref())
                .opt("content", data.content.as_deref())
                .finish(),
            Segment::Music(data) => CqCode::new("music")
                .param("type", &data.kind)
                .opt("id", data.id.as_deref())
                .opt("url", data.url.as_deref())
                .opt("audio", data.audio.as_deref())
                .opt("title", data.title.as_deref())
                .opt("content", data.content.as_deref())
                .opt("image", data.image.as_deref())
                .finish(),
            Segment::Reply(data) => CqCode::new("reply").param("id", &data.id).finish(),
            Segment::Tts(data) => CqCode::new("tts").param("text", &data.text).finish(),
            Segment::Xml(data) => CqCode::new("xml").param("data", &data.data).finish(),
            Segment::Json(data) => CqCode::new("json").param("data", &data.data).finish(),
            Segment::Forward(data) => CqCode::new("forward").param("id", &data.id).finish(),
            Segment::Node(data) => {
                let content = data.content.as_ref().map(MessageContent::render);
                CqCode::new("node")
                    .opt("id", data.id.as_deref())
                    .opt("name", data.name.as_deref())
                    .opt("uin", data.uin.as_deref())
                    .opt("user_id", data.user_id.as_deref())
                    .opt("nickname", data.nickname.as_deref())
                    .opt("content", content.as_deref())
                    .finish()
            }
            Segment::Unknown(raw) => raw
                .data
                .iter()
                .fold(CqCode::new(&raw.kind), |code, (key, value)| match value {
                    Value::Null => code,
                    Value::String(text) => code.param(key, text),
                    other => code.param(key, &other.to_string()),
                })
                .finish(),
        }
    }
}

fn media(kind: &str, data: &MediaData) -> String {
    let timeout = data.timeout.map(|t| t.to_string());
    CqCode::new(kind)
        .param("file", &data.file)
        .opt("type", data.kind.as_deref())
        .flag("magic", data.magic)
        .flag("cache", data.cache)
        .flag("proxy", data.proxy)
        .opt("timeout", timeout.as_deref())
        .finish()
}

// ============================================================================
// CQ Code Escaping
// ============================================================================

/// Escapes plain text: `&` → `&amp;`, `[` → `&#91;`, `]` → `&#93;`.
pub fn escape_cq_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('[', "&#91;")
        .replace(']', "&#93;")
}

/// Escapes a CQ parameter value; additionally `,` → `&#44;`.
pub fn escape_cq_value(value: &str) -> String {
    escape_cq_text(value).replace(',', "&#44;")
}
