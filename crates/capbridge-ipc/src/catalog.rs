//! Typed view of the channel catalogue.
//!
//! Each channel has a marker type whose associated types fix the argument
//! tuple and the reply. Host handlers and client calls are both generic over
//! these markers, so a mismatch between the two sides is a compile error.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::channel::Channel;

/// A channel whose caller awaits a reply.
pub trait RequestChannel: Send + Sync + 'static {
    const CHANNEL: Channel;
    /// Positional arguments as a tuple; `()` for none.
    type Args: Serialize + DeserializeOwned + Send + 'static;
    type Output: Serialize + DeserializeOwned + Send + 'static;

    /// Reply `value` for `output`. `None` leaves the field out of the reply,
    /// which the renderer reads as `undefined`.
    fn encode_output(output: Self::Output) -> Result<Option<Value>, serde_json::Error> {
        serde_json::to_value(output).map(Some)
    }

    fn decode_output(value: Option<Value>) -> Result<Self::Output, serde_json::Error> {
        serde_json::from_value(value.unwrap_or(Value::Null))
    }
}

/// A fire-and-forget channel.
pub trait ListenerChannel: Send + Sync + 'static {
    const CHANNEL: Channel;
    type Args: Serialize + DeserializeOwned + Send + 'static;
}

macro_rules! request {
    ($(#[$meta:meta])* $name:ident: $channel:ident, $args:ty => $out:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::catalog::RequestChannel for $name {
            const CHANNEL: $crate::channel::Channel = $crate::channel::Channel::$channel;
            type Args = $args;
            type Output = $out;
        }
    };
}

/// A request channel whose reply may carry no value at all. Absence is
/// kept apart from a JSON `null`.
macro_rules! optional_request {
    ($(#[$meta:meta])* $name:ident: $channel:ident, $args:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::catalog::RequestChannel for $name {
            const CHANNEL: $crate::channel::Channel = $crate::channel::Channel::$channel;
            type Args = $args;
            type Output = Option<serde_json::Value>;

            fn encode_output(
                output: Self::Output,
            ) -> Result<Option<serde_json::Value>, serde_json::Error> {
                Ok(output)
            }

            fn decode_output(
                value: Option<serde_json::Value>,
            ) -> Result<Self::Output, serde_json::Error> {
                Ok(value)
            }
        }
    };
}

macro_rules! listener {
    ($(#[$meta:meta])* $name:ident: $channel:ident, $args:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name;

        impl $crate::catalog::ListenerChannel for $name {
            const CHANNEL: $crate::channel::Channel = $crate::channel::Channel::$channel;
            type Args = $args;
        }
    };
}

pub mod window {
    use capbridge_common::TitleBarOverlay;

    listener!(Minimize: WindowMinimize, ());
    listener!(
        /// Toggles between maximized and restored.
        Maximize: WindowMaximize, ()
    );
    listener!(Close: WindowClose, ());
    request!(IsMaximized: WindowIsMaximized, () => bool);
    request!(
        /// Applied on Windows only; acknowledged everywhere.
        SetTitleBarOverlay: WindowSetTitleBarOverlay, (TitleBarOverlay,) => ()
    );
}

pub mod storage {
    use serde_json::Value;

    optional_request!(
        /// `None` when the key is absent; a stored `null` stays `Some(Null)`.
        Get: StorageGet, (String,)
    );
    request!(Set: StorageSet, (String, Value) => ());
    request!(Delete: StorageDelete, (String,) => ());
    request!(Has: StorageHas, (String,) => bool);
}

pub mod system {
    use capbridge_common::{
        MessageBoxOptions, MessageBoxResult, NotificationOptions, OpenDialogOptions,
        OpenDialogResult, Platform, SaveDialogOptions, SaveDialogResult,
    };

    request!(GetVersion: SystemGetVersion, () => String);
    request!(GetPlatform: SystemGetPlatform, () => Platform);
    request!(OpenExternal: SystemOpenExternal, (String,) => ());
    request!(ShowItemInFolder: SystemShowItemInFolder, (String,) => ());
    request!(ReadClipboard: SystemReadClipboard, () => String);
    request!(WriteClipboard: SystemWriteClipboard, (String,) => ());
    request!(ShowOpenDialog: SystemShowOpenDialog, (OpenDialogOptions,) => OpenDialogResult);
    request!(ShowSaveDialog: SystemShowSaveDialog, (SaveDialogOptions,) => SaveDialogResult);
    request!(ShowMessageBox: SystemShowMessageBox, (MessageBoxOptions,) => MessageBoxResult);
    request!(ShowNotification: SystemShowNotification, (NotificationOptions,) => ());
    request!(
        /// `(accelerator, id)`; `false` when the OS or another id holds it.
        RegisterShortcut: SystemRegisterShortcut, (String, String) => bool
    );
    request!(UnregisterShortcut: SystemUnregisterShortcut, (String,) => ());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ChannelMode;

    fn request_mode<C: RequestChannel>() -> ChannelMode {
        C::CHANNEL.mode()
    }

    fn listener_mode<C: ListenerChannel>() -> ChannelMode {
        C::CHANNEL.mode()
    }

    #[test]
    fn markers_match_catalogue_modes() {
        assert_eq!(listener_mode::<window::Minimize>(), ChannelMode::FireAndForget);
        assert_eq!(listener_mode::<window::Maximize>(), ChannelMode::FireAndForget);
        assert_eq!(listener_mode::<window::Close>(), ChannelMode::FireAndForget);

        assert_eq!(request_mode::<window::IsMaximized>(), ChannelMode::RequestResponse);
        assert_eq!(request_mode::<window::SetTitleBarOverlay>(), ChannelMode::RequestResponse);
        assert_eq!(request_mode::<storage::Get>(), ChannelMode::RequestResponse);
        assert_eq!(request_mode::<storage::Set>(), ChannelMode::RequestResponse);
        assert_eq!(request_mode::<system::RegisterShortcut>(), ChannelMode::RequestResponse);
        assert_eq!(request_mode::<system::ShowMessageBox>(), ChannelMode::RequestResponse);
    }

    #[test]
    fn storage_get_keeps_null_apart_from_absent() {
        use serde_json::json;

        assert_eq!(storage::Get::encode_output(None).unwrap(), None);
        assert_eq!(storage::Get::encode_output(Some(Value::Null)).unwrap(), Some(Value::Null));
        assert_eq!(storage::Get::decode_output(None).unwrap(), None);
        assert_eq!(storage::Get::decode_output(Some(Value::Null)).unwrap(), Some(Value::Null));
        assert_eq!(
            storage::Get::decode_output(Some(json!({"a": 1}))).unwrap(),
            Some(json!({"a": 1}))
        );

        // Other channels still send unit replies as `null`.
        assert_eq!(storage::Set::encode_output(()).unwrap(), Some(Value::Null));
        assert!(storage::Has::decode_output(Some(json!(true))).unwrap());
    }

    #[test]
    fn arity_matches_argument_tuples() {
        assert_eq!(storage::Set::CHANNEL.arity(), 2);
        assert_eq!(system::RegisterShortcut::CHANNEL.arity(), 2);
        assert_eq!(storage::Get::CHANNEL.arity(), 1);
        assert_eq!(system::GetVersion::CHANNEL.arity(), 0);
    }
}
