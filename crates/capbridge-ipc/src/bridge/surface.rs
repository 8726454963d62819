use crate::channel::{Channel, ChannelMode, PushChannel};

/// What a capability method does when called.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// Returns a promise resolved by the host's reply.
    Invoke(Channel),
    /// Posts and returns nothing.
    Send(Channel),
    /// Registers a callback for a push channel.
    Subscribe(PushChannel),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub name: &'static str,
    pub kind: MethodKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub name: &'static str,
    pub methods: Vec<Method>,
}

pub const NAMESPACES: [&str; 3] = ["window", "storage", "system"];

/// The full method list of the capability object, derived from the channel
/// catalogue. This is the only shape the renderer ever sees.
pub fn api_surface() -> Vec<Namespace> {
    NAMESPACES
        .iter()
        .map(|ns| {
            let calls = Channel::ALL
                .iter()
                .filter(|c| c.namespace() == *ns)
                .map(|c| Method {
                    name: c.method(),
                    kind: match c.mode() {
                        ChannelMode::RequestResponse => MethodKind::Invoke(*c),
                        ChannelMode::FireAndForget => MethodKind::Send(*c),
                    },
                });
            let subscriptions = PushChannel::ALL
                .iter()
                .filter(|p| p.namespace() == *ns)
                .map(|p| Method {
                    name: p.subscribe_method(),
                    kind: MethodKind::Subscribe(*p),
                });
            Namespace {
                name: ns,
                methods: calls.chain(subscriptions).collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(ns: &Namespace) -> Vec<&'static str> {
        ns.methods.iter().map(|m| m.name).collect()
    }

    #[test]
    fn three_namespaces_cover_the_catalogue() {
        let surface = api_surface();
        assert_eq!(surface.len(), 3);
        let total: usize = surface.iter().map(|ns| ns.methods.len()).sum();
        assert_eq!(total, Channel::ALL.len() + PushChannel::ALL.len());
    }

    #[test]
    fn window_namespace() {
        let surface = api_surface();
        assert_eq!(
            names(&surface[0]),
            vec![
                "minimize",
                "maximize",
                "close",
                "isMaximized",
                "setTitleBarOverlay",
                "onMaximizeChange"
            ]
        );
    }

    #[test]
    fn no_generic_passthrough() {
        for ns in api_surface() {
            for method in &ns.methods {
                assert!(
                    !matches!(method.name, "invoke" | "send" | "on" | "postMessage"),
                    "{}.{} looks like a generic primitive",
                    ns.name,
                    method.name
                );
            }
        }
    }
}
