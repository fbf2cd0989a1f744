//! The CQHTTP action client.
//!
//! [`CqhttpProtocol`] exposes one method per bot action. Every method builds
//! a parameter map, posts it to `{base_url}/{endpoint}` and interprets the
//! envelope the same way:
//!
//! 1. transport failure → [`ActionError::Transport`]
//! 2. undecodable body → [`ActionError::Decode`]
//! 3. `status != "ok"` → [`ActionError::Rejected`]
//! 4. `data` parsed into the result type, or [`ActionError::Validation`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use cqhttp_core::HttpClientConfig;
//! use cqhttp_protocol::CqhttpProtocol;
//!
//! let client = CqhttpProtocol::new(&HttpClientConfig::new("http://127.0.0.1:5700"))?;
//! let receipt = client.send_group_message(123, "hi", None).await?;
//! client.mute(123, 456, Some(600)).await?;
//! ```

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, warn};

use cqhttp_core::{
    ActionError, ActionResult, BoxedFetcher, Fetcher, HttpClientConfig, Params, TransportResult,
    endpoint_url,
};
use cqhttp_transport::Fetch;

use crate::model::envelope::is_truthy;
use crate::model::{
    Anonymous, ApiResponse, AppStatus, AppVersion, AtAllRemain, Bot, BotMessage, Device,
    EssenceMessage, ForwardEntry, ForwardMessages, Friend, Group, GroupFileSystem, GroupFileTree,
    GroupSystemMessage, Honor, ImageFile, Member, Message, MessageContent, ModelVariant, Ocr,
    QiDianAccount, Stranger, UrlSafety, VipInfo,
};

/// Default mute length in seconds.
pub const DEFAULT_MUTE_DURATION: i64 = 30 * 60;

/// Special title duration meaning "never expires".
pub const PERMANENT_TITLE: i64 = -1;

/// Accepted `sub_type` values of a group request.
pub const GROUP_REQUEST_SUB_TYPES: [&str; 2] = ["add", "invite"];

// =============================================================================
// CqhttpProtocol
// =============================================================================

/// Client for the CQHTTP gateway.
///
/// Holds the base URL and a [`Fetcher`]. Both are fixed at construction, so
/// the client can be shared freely across tasks.
#[derive(Clone)]
pub struct CqhttpProtocol {
    base_url: String,
    fetcher: BoxedFetcher,
}

impl std::fmt::Debug for CqhttpProtocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CqhttpProtocol")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl CqhttpProtocol {
    /// Creates a client backed by the reqwest transport.
    pub fn new(config: &HttpClientConfig) -> TransportResult<Self> {
        let fetch = Fetch::new(config)?;
        Ok(Self::with_fetcher(config.base_url.clone(), Arc::new(fetch)))
    }

    /// Creates a client over any transport.
    pub fn with_fetcher(base_url: impl Into<String>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            base_url: base_url.into(),
            fetcher,
        }
    }

    /// The gateway base URL, e.g. `http://127.0.0.1:5700`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Posts `params` to `action` and unwraps the envelope into `data`.
    async fn request(&self, action: &str, params: Params) -> ActionResult<Value> {
        let url = endpoint_url(&self.base_url, action);
        debug!(action = %action, params = ?params, "Calling gateway action");

        let payload = (!params.is_empty()).then(|| Value::Object(params));
        let Some(body) = self.fetcher.http_post(&url, payload.as_ref()).await? else {
            warn!(action = %action, "Gateway reply could not be decoded");
            return Err(ActionError::Decode {
                action: action.to_string(),
            });
        };

        let response = ApiResponse::from_value(body);
        if !response.is_ok() {
            warn!(
                action = %action,
                status = %response.status,
                retcode = ?response.retcode,
                message = ?response.message,
                "Gateway rejected action"
            );
        }
        response.into_data(action)
    }

    /// Runs a `can_send_*` probe: ok status and a truthy `data.yes`.
    async fn probe(&self, action: &str) -> ActionResult<bool> {
        let data = self.request(action, Params::new()).await?;
        Ok(data.get("yes").is_some_and(is_truthy))
    }
}

// =============================================================================
// Result parsing
// =============================================================================

fn parse_entity<T: DeserializeOwned>(action: &str, data: Value) -> ActionResult<T> {
    serde_json::from_value(data).map_err(|e| ActionError::validation(action, e))
}

/// Parses every element of an array, preserving order. `null` is an empty list.
fn parse_list<T: DeserializeOwned>(action: &str, data: Value) -> ActionResult<Vec<T>> {
    match data {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value(item)
                    .map_err(|e| ActionError::validation(action, format!("element {index}: {e}")))
            })
            .collect(),
        Value::Null => Ok(Vec::new()),
        other => Err(ActionError::validation(
            action,
            format!("expected an array, got {other}"),
        )),
    }
}

fn take_field(action: &str, data: Value, field: &str) -> ActionResult<Value> {
    match data {
        Value::Object(mut map) => map
            .remove(field)
            .ok_or_else(|| ActionError::validation(action, format!("missing field `{field}`"))),
        _ => Err(ActionError::validation(
            action,
            format!("missing field `{field}`"),
        )),
    }
}

// =============================================================================
// Action macro
// =============================================================================

/// Generates an action method.
///
/// Required arguments are listed in `(...)`. Arguments with a protocol
/// default go in `[name: Type = default]` and become `Option<Type>`; the key
/// is always sent. The result form follows `->`:
///
/// - nothing: `ActionResult<()>`
/// - `T`: `data` parsed as `T`
/// - `[T]`: `data` parsed as `Vec<T>`
/// - `T, field = "f"` / `[T], field = "f"`: same, on `data.f`
macro_rules! impl_action {
    (@params ($($arg:ident),*) [$($opt:ident = $default:expr),*]) => {{
        #[allow(unused_mut)]
        let mut params = Params::new();
        $(params.insert(stringify!($arg).to_string(), json!($arg));)*
        $(params.insert(stringify!($opt).to_string(), json!($opt.unwrap_or($default)));)*
        params
    }};
    // Vec<T> from a field of data
    ($(#[$meta:meta])* $name:ident => $endpoint:literal,
        ($($arg:ident: $typ:ty),*) $([$($opt:ident: $otyp:ty = $default:expr),*])?
        -> [$ret:ty], field = $field:literal) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* $($($opt: Option<$otyp>,)*)?) -> ActionResult<Vec<$ret>> {
            let params = impl_action!(@params ($($arg),*) [$($($opt = $default),*)?]);
            let data = self.request($endpoint, params).await?;
            parse_list($endpoint, take_field($endpoint, data, $field)?)
        }
    };
    // Vec<T> from data
    ($(#[$meta:meta])* $name:ident => $endpoint:literal,
        ($($arg:ident: $typ:ty),*) $([$($opt:ident: $otyp:ty = $default:expr),*])?
        -> [$ret:ty]) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* $($($opt: Option<$otyp>,)*)?) -> ActionResult<Vec<$ret>> {
            let params = impl_action!(@params ($($arg),*) [$($($opt = $default),*)?]);
            let data = self.request($endpoint, params).await?;
            parse_list($endpoint, data)
        }
    };
    // T from a field of data
    ($(#[$meta:meta])* $name:ident => $endpoint:literal,
        ($($arg:ident: $typ:ty),*) $([$($opt:ident: $otyp:ty = $default:expr),*])?
        -> $ret:ty, field = $field:literal) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* $($($opt: Option<$otyp>,)*)?) -> ActionResult<$ret> {
            let params = impl_action!(@params ($($arg),*) [$($($opt = $default),*)?]);
            let data = self.request($endpoint, params).await?;
            parse_entity($endpoint, take_field($endpoint, data, $field)?)
        }
    };
    // T from data
    ($(#[$meta:meta])* $name:ident => $endpoint:literal,
        ($($arg:ident: $typ:ty),*) $([$($opt:ident: $otyp:ty = $default:expr),*])?
        -> $ret:ty) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* $($($opt: Option<$otyp>,)*)?) -> ActionResult<$ret> {
            let params = impl_action!(@params ($($arg),*) [$($($opt = $default),*)?]);
            let data = self.request($endpoint, params).await?;
            parse_entity($endpoint, data)
        }
    };
    // No result
    ($(#[$meta:meta])* $name:ident => $endpoint:literal,
        ($($arg:ident: $typ:ty),*) $([$($opt:ident: $otyp:ty = $default:expr),*])?) => {
        $(#[$meta])*
        pub async fn $name(&self, $($arg: $typ,)* $($($opt: Option<$otyp>,)*)?) -> ActionResult<()> {
            let params = impl_action!(@params ($($arg),*) [$($($opt = $default),*)?]);
            self.request($endpoint, params).await?;
            Ok(())
        }
    };
}

// =============================================================================
// Message actions
// =============================================================================

impl CqhttpProtocol {
    /// Sends a private message.
    ///
    /// `group_id` is the group through which a temporary session is opened;
    /// it is sent as `null` when absent.
    pub async fn send_friend_message(
        &self,
        user_id: i64,
        message: impl Into<MessageContent>,
        group_id: Option<i64>,
        auto_escape: Option<bool>,
    ) -> ActionResult<BotMessage> {
        let message = message.into().render();
        let params = impl_action!(@params (user_id, group_id, message) [auto_escape = false]);
        let data = self.request("send_private_msg", params).await?;
        parse_entity("send_private_msg", data)
    }

    /// Sends a group message.
    ///
    /// A segment chain is rendered to CQ codes; text is sent unchanged.
    pub async fn send_group_message(
        &self,
        group_id: i64,
        message: impl Into<MessageContent>,
        auto_escape: Option<bool>,
    ) -> ActionResult<BotMessage> {
        let message = message.into().render();
        let params = impl_action!(@params (group_id, message) [auto_escape = false]);
        let data = self.request("send_group_msg", params).await?;
        parse_entity("send_group_msg", data)
    }

    /// Sends a forwarded-message batch to a group.
    ///
    /// Structured nodes are converted to `{"type": "node", ...}` mappings;
    /// raw mappings pass through unchanged.
    pub async fn send_group_forward_message<I>(
        &self,
        group_id: i64,
        messages: I,
    ) -> ActionResult<BotMessage>
    where
        I: IntoIterator,
        I::Item: Into<ForwardEntry>,
    {
        let messages: Vec<Value> = messages
            .into_iter()
            .map(|entry| Value::Object(entry.into().into_mapping()))
            .collect();
        let params = impl_action!(@params (group_id, messages) []);
        let data = self.request("send_group_forward_msg", params).await?;
        parse_entity("send_group_forward_msg", data)
    }

    impl_action!(
        /// Recalls a message.
        recall => "delete_msg", (message_id: i64)
    );

    impl_action!(
        /// Fetches a message by ID.
        get_message => "get_msg", (message_id: i64) -> Message
    );

    impl_action!(
        /// Fetches the content of a forwarded message.
        get_forward_message => "get_forward_msg", (message_id: &str) -> ForwardMessages
    );

    impl_action!(
        /// Resolves a cached image by file name.
        get_image => "get_image", (file: &str) -> ImageFile
    );
}

// =============================================================================
// Group administration
// =============================================================================

impl CqhttpProtocol {
    impl_action!(
        /// Removes a member from a group.
        kick => "set_group_kick",
        (group_id: i64, user_id: i64) [reject_add_request: bool = false]
    );

    impl_action!(
        /// Mutes a member for `duration` seconds (default 30 minutes).
        ///
        /// A duration of `0` lifts the mute.
        mute => "set_group_ban",
        (group_id: i64, user_id: i64) [duration: i64 = DEFAULT_MUTE_DURATION]
    );

    /// Lifts a member's mute. Same as [`mute`](Self::mute) with duration `0`.
    pub async fn unmute(&self, group_id: i64, user_id: i64) -> ActionResult<()> {
        self.mute(group_id, user_id, Some(0)).await
    }

    /// Mutes an anonymous member, identified by `flag`.
    pub async fn mute_anonymous(
        &self,
        group_id: i64,
        flag: &str,
        duration: Option<i64>,
        anonymous: Option<&Anonymous>,
    ) -> ActionResult<()> {
        let params = impl_action!(
            @params (group_id, flag, anonymous) [duration = DEFAULT_MUTE_DURATION]
        );
        self.request("set_group_anonymous_ban", params).await?;
        Ok(())
    }

    impl_action!(
        /// Toggles whole-group mute.
        mute_all => "set_group_whole_ban",
        (group_id: i64) [enable: bool = true]
    );

    impl_action!(
        /// Grants or revokes admin rights.
        set_group_admin => "set_group_admin",
        (group_id: i64, user_id: i64) [enable: bool = true]
    );

    impl_action!(
        /// Toggles anonymous chat in a group.
        set_group_anonymous => "set_group_anonymous",
        (group_id: i64) [enable: bool = true]
    );

    impl_action!(
        /// Sets a member's group card. An empty card clears it.
        set_group_card => "set_group_card",
        (group_id: i64, user_id: i64) [card: &str = ""]
    );

    impl_action!(
        /// Renames a group.
        set_group_name => "set_group_name", (group_id: i64, group_name: &str)
    );

    impl_action!(
        /// Leaves a group, or dismisses it when `is_dismiss` and the bot owns it.
        leave => "set_group_leave",
        (group_id: i64) [is_dismiss: bool = false]
    );

    impl_action!(
        /// Sets a member's special title.
        ///
        /// `duration` is in seconds; `-1` (the default) never expires.
        set_group_special_title => "set_group_special_title",
        (group_id: i64, user_id: i64) [special_title: &str = "", duration: i64 = PERMANENT_TITLE]
    );

    impl_action!(
        /// Sets a group's avatar.
        ///
        /// `cache` is `1` to allow a cached copy of `file`, `0` otherwise.
        set_group_portrait => "set_group_portrait", (group_id: i64, file: &str, cache: i32)
    );

    impl_action!(
        /// Publishes a group announcement.
        send_group_notice => "_send_group_notice", (group_id: i64, content: &str)
    );

    impl_action!(
        /// Marks a message as essence.
        set_essence_message => "set_essence_msg", (message_id: i64)
    );

    impl_action!(
        /// Removes a message from the essence list.
        delete_essence_message => "delete_essence_msg", (message_id: i64)
    );
}

// =============================================================================
// Requests
// =============================================================================

impl CqhttpProtocol {
    impl_action!(
        /// Handles a friend request.
        set_friend_request => "set_friend_add_request",
        (flag: &str) [approve: bool = true, remark: &str = ""]
    );

    /// Handles a group join request or invitation.
    ///
    /// `sub_type` must be `add` or `invite`; anything else fails with
    /// [`ActionError::InvalidArgument`] before any request is made.
    pub async fn set_group_request(
        &self,
        flag: &str,
        sub_type: &str,
        approve: Option<bool>,
        reason: Option<&str>,
    ) -> ActionResult<()> {
        const ACTION: &str = "set_group_add_request";
        if !GROUP_REQUEST_SUB_TYPES.contains(&sub_type) {
            warn!(action = ACTION, sub_type = %sub_type, "Rejected invalid sub_type locally");
            return Err(ActionError::invalid_argument(
                ACTION,
                format!("sub_type must be `add` or `invite`, got `{sub_type}`"),
            ));
        }
        let params = impl_action!(@params (flag, sub_type) [approve = true, reason = ""]);
        self.request(ACTION, params).await?;
        Ok(())
    }
}

// =============================================================================
// Accounts
// =============================================================================

impl CqhttpProtocol {
    impl_action!(
        /// The logged-in bot account.
        get_login_info => "get_login_info", () -> Bot
    );

    impl_action!(
        /// QiDian account details of the bot.
        get_qidian_account_info => "qidian_get_account_info", () -> QiDianAccount
    );

    impl_action!(
        /// Public profile of any user.
        get_stranger_info => "get_stranger_info",
        (user_id: i64) [no_cache: bool = false] -> Stranger
    );

    impl_action!(
        /// VIP membership of a user.
        get_vip_info => "_get_vip_info", (user_id: i64) -> VipInfo
    );

    impl_action!(
        /// All friends, in gateway order.
        get_friend_list => "get_friend_list", () -> [Friend]
    );

    impl_action!(
        delete_friend => "delete_friend", (friend_id: i64)
    );

    impl_action!(
        /// Users who added the bot without being added back.
        get_unidirectional_friend_list => "get_unidirectional_friend_list", () -> [Friend]
    );

    impl_action!(
        delete_unidirectional_friend => "delete_unidirectional_friend", (user_id: i64)
    );

    impl_action!(
        /// Clients currently logged into the bot account.
        get_online_clients => "get_online_clients",
        () [no_cache: bool = false] -> [Device], field = "clients"
    );

    impl_action!(
        /// Device labels available for `model`.
        get_model_show => "_get_model_show", (model: &str) -> [ModelVariant], field = "variants"
    );

    impl_action!(
        /// Sets the online-device label.
        set_model_show => "_set_model_show", (model: &str, model_show: &str)
    );
}

// =============================================================================
// Groups
// =============================================================================

impl CqhttpProtocol {
    impl_action!(
        get_group_info => "get_group_info",
        (group_id: i64) [no_cache: bool = false] -> Group
    );

    impl_action!(
        /// All groups the bot is in, in gateway order.
        get_group_list => "get_group_list", () -> [Group]
    );

    impl_action!(
        get_group_member_info => "get_group_member_info",
        (group_id: i64, user_id: i64) [no_cache: bool = false] -> Member
    );

    impl_action!(
        /// All members of a group, in gateway order.
        get_group_member_list => "get_group_member_list", (group_id: i64) -> [Member]
    );

    /// Honor board of a group.
    ///
    /// `kind` is one of `talkative`, `performer`, `legend`, `strong_newbie`,
    /// `emotion` or `all`.
    pub async fn get_group_honor_info(&self, group_id: i64, kind: &str) -> ActionResult<Honor> {
        let mut params = impl_action!(@params (group_id) []);
        params.insert("type".to_string(), json!(kind));
        let data = self.request("get_group_honor_info", params).await?;
        parse_entity("get_group_honor_info", data)
    }

    impl_action!(
        /// Pending invitations and join requests.
        get_group_system_message => "get_group_system_msg", () -> GroupSystemMessage
    );

    impl_action!(
        get_group_at_all_remain => "get_group_at_all_remain", (group_id: i64) -> AtAllRemain
    );

    impl_action!(
        /// History of a group, up to 19 messages before `message_seq`.
        ///
        /// A sequence of `0` starts from the latest message.
        get_group_message_history => "get_group_msg_history",
        (group_id: i64) [message_seq: i64 = 0] -> [Message], field = "messages"
    );

    impl_action!(
        get_essence_message_list => "get_essence_msg_list", (group_id: i64) -> [EssenceMessage]
    );
}

// =============================================================================
// Group files
// =============================================================================

impl CqhttpProtocol {
    impl_action!(
        /// Uploads a local file (path on the gateway host) to a group.
        upload_group_file => "upload_group_file",
        (group_id: i64, file: &str, name: &str) [folder: &str = ""]
    );

    impl_action!(
        /// Storage summary of a group's file area.
        get_group_file_system_info => "get_group_file_system_info",
        (group_id: i64) -> GroupFileSystem
    );

    impl_action!(
        get_group_root_files => "get_group_root_files", (group_id: i64) -> GroupFileTree
    );

    impl_action!(
        get_group_files_by_folder => "get_group_files_by_folder",
        (group_id: i64, folder_id: &str) -> GroupFileTree
    );

    impl_action!(
        /// Download URL of a group file.
        get_group_file_url => "get_group_file_url",
        (group_id: i64, file_id: &str, busid: i32) -> String, field = "url"
    );
}

// =============================================================================
// Gateway
// =============================================================================

impl CqhttpProtocol {
    /// Whether the gateway can send images.
    pub async fn can_send_image(&self) -> ActionResult<bool> {
        self.probe("can_send_image").await
    }

    /// Whether the gateway can send voice records.
    pub async fn can_send_record(&self) -> ActionResult<bool> {
        self.probe("can_send_record").await
    }

    impl_action!(
        get_version_info => "get_version_info", () -> AppVersion
    );

    impl_action!(
        get_status => "get_status", () -> AppStatus
    );

    impl_action!(
        /// Restarts the gateway after `delay` milliseconds.
        restart_api => "set_restart", () [delay: i64 = 0]
    );

    impl_action!(
        /// Reloads the gateway's event filter from `file`.
        reload_event_filter => "reload_event_filter", (file: &str)
    );

    impl_action!(
        /// Downloads `url` into the gateway's cache and returns the local path.
        ///
        /// `headers` uses `\r\n` between entries.
        download_file => "download_file",
        (url: &str) [thread_count: i32 = 1, headers: &str = ""] -> String, field = "file"
    );

    impl_action!(
        ocr_image => "ocr_image", (image: &str) -> Ocr
    );

    impl_action!(
        check_url_safety => "check_url_safety", (url: &str) -> UrlSafety
    );
}
