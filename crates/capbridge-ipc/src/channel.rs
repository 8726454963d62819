//! The closed catalogue of channels crossing the renderer boundary.
//!
//! [`Channel`] lists every renderer-to-host endpoint and [`PushChannel`]
//! every host-to-renderer event. Nothing outside these enums can be
//! registered, invoked, or pushed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// How a channel is called.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelMode {
    /// The caller awaits a reply.
    RequestResponse,
    /// No reply; failures stay on the host.
    FireAndForget,
}

macro_rules! channels {
    ($( $variant:ident => $id:literal, $mode:ident, $arity:literal; )*) => {
        /// A renderer-to-host endpoint.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Channel {
            $( $variant, )*
        }

        impl Channel {
            /// Every channel, in catalogue order.
            pub const ALL: &'static [Channel] = &[ $( Channel::$variant, )* ];

            /// Wire identifier, `domain:action`.
            pub const fn id(self) -> &'static str {
                match self {
                    $( Channel::$variant => $id, )*
                }
            }

            pub const fn mode(self) -> ChannelMode {
                match self {
                    $( Channel::$variant => ChannelMode::$mode, )*
                }
            }

            /// Number of positional arguments.
            pub const fn arity(self) -> usize {
                match self {
                    $( Channel::$variant => $arity, )*
                }
            }

            pub fn from_id(id: &str) -> Option<Channel> {
                match id {
                    $( $id => Some(Channel::$variant), )*
                    _ => None,
                }
            }
        }
    };
}

channels! {
    WindowMinimize => "window:minimize", FireAndForget, 0;
    WindowMaximize => "window:maximize", FireAndForget, 0;
    WindowClose => "window:close", FireAndForget, 0;
    WindowIsMaximized => "window:isMaximized", RequestResponse, 0;
    WindowSetTitleBarOverlay => "window:setTitleBarOverlay", RequestResponse, 1;

    StorageGet => "storage:get", RequestResponse, 1;
    StorageSet => "storage:set", RequestResponse, 2;
    StorageDelete => "storage:delete", RequestResponse, 1;
    StorageHas => "storage:has", RequestResponse, 1;

    SystemGetVersion => "system:getVersion", RequestResponse, 0;
    SystemGetPlatform => "system:getPlatform", RequestResponse, 0;
    SystemOpenExternal => "system:openExternal", RequestResponse, 1;
    SystemShowItemInFolder => "system:showItemInFolder", RequestResponse, 1;
    SystemReadClipboard => "system:readClipboard", RequestResponse, 0;
    SystemWriteClipboard => "system:writeClipboard", RequestResponse, 1;
    SystemShowOpenDialog => "system:showOpenDialog", RequestResponse, 1;
    SystemShowSaveDialog => "system:showSaveDialog", RequestResponse, 1;
    SystemShowMessageBox => "system:showMessageBox", RequestResponse, 1;
    SystemShowNotification => "system:showNotification", RequestResponse, 1;
    SystemRegisterShortcut => "system:registerShortcut", RequestResponse, 2;
    SystemUnregisterShortcut => "system:unregisterShortcut", RequestResponse, 1;
}

impl Channel {
    /// `window`, `storage` or `system`.
    pub fn namespace(self) -> &'static str {
        self.id().split_once(':').map(|(ns, _)| ns).unwrap_or("")
    }

    /// Method name inside the namespace (`isMaximized`).
    pub fn method(self) -> &'static str {
        self.id().split_once(':').map(|(_, m)| m).unwrap_or("")
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::from_id(s).ok_or_else(|| UnknownChannel(s.to_string()))
    }
}

impl Serialize for Channel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

impl<'de> Deserialize<'de> for Channel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.parse().map_err(serde::de::Error::custom)
    }
}

/// A host-to-renderer event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushChannel {
    /// Payload: `bool`, the new maximized flag.
    #[serde(rename = "window:onMaximizeChange")]
    MaximizeChange,
    /// Payload: the shortcut id as a string.
    #[serde(rename = "system:shortcutTriggered")]
    ShortcutTriggered,
}

impl PushChannel {
    pub const ALL: &'static [PushChannel] =
        &[PushChannel::MaximizeChange, PushChannel::ShortcutTriggered];

    pub const fn id(self) -> &'static str {
        match self {
            PushChannel::MaximizeChange => "window:onMaximizeChange",
            PushChannel::ShortcutTriggered => "system:shortcutTriggered",
        }
    }

    pub fn from_id(id: &str) -> Option<PushChannel> {
        Self::ALL.iter().copied().find(|c| c.id() == id)
    }

    pub fn namespace(self) -> &'static str {
        self.id().split_once(':').map(|(ns, _)| ns).unwrap_or("")
    }

    /// Name of the subscription method exposed to the renderer.
    pub fn subscribe_method(self) -> &'static str {
        match self {
            PushChannel::MaximizeChange => "onMaximizeChange",
            PushChannel::ShortcutTriggered => "onShortcutTriggered",
        }
    }
}

impl fmt::Display for PushChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
