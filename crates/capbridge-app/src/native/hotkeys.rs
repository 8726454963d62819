//! OS global hotkeys through `global-hotkey`.
//!
//! The hotkey manager must live on the main thread, but shortcut channels
//! run on runtime workers. Workers queue commands and wake the event loop;
//! registrations wait (bounded) for the OS answer so a refused key reports
//! `false`.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

use capbridge_common::PlatformError;
use capbridge_platform::{Accelerator, HotkeyBackend, TriggerFn};
use global_hotkey::hotkey::HotKey;
use global_hotkey::{GlobalHotKeyEvent, GlobalHotKeyManager, HotKeyState};
use tokio::runtime::{Handle, RuntimeFlavor};
use tracing::{debug, warn};
use winit::event_loop::EventLoopProxy;

use super::UserEvent;

type Reply = mpsc::Sender<Result<(), String>>;

const ANSWER_TIMEOUT: Duration = Duration::from_secs(5);

enum Command {
    Register {
        hotkey: HotKey,
        trigger: TriggerFn,
        reply: Option<Reply>,
    },
    Unregister(HotKey),
}

/// Commands and armed triggers shared between workers and the main thread.
#[derive(Clone, Default)]
pub struct HotkeyQueue {
    commands: Arc<Mutex<Vec<Command>>>,
    triggers: Arc<Mutex<HashMap<u32, TriggerFn>>>,
}

impl HotkeyQueue {
    fn push(&self, command: Command) {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(command);
        }
    }

    /// Route OS hotkey presses to the armed triggers.
    pub fn install_event_handler(&self) {
        let triggers = self.triggers.clone();
        GlobalHotKeyEvent::set_event_handler(Some(move |event: GlobalHotKeyEvent| {
            if event.state != HotKeyState::Pressed {
                return;
            }
            let trigger = triggers.lock().ok().and_then(|t| t.get(&event.id).cloned());
            if let Some(trigger) = trigger {
                trigger();
            }
        }));
    }

    /// Apply queued commands. Main thread only. With no manager every
    /// registration is answered with a failure.
    pub fn drain(&self, manager: Option<&GlobalHotKeyManager>) {
        let commands = match self.commands.lock() {
            Ok(mut commands) => std::mem::take(&mut *commands),
            Err(_) => return,
        };
        for command in commands {
            match command {
                Command::Register {
                    hotkey,
                    trigger,
                    reply,
                } => {
                    let result = match manager {
                        Some(manager) => manager.register(hotkey).map_err(|e| e.to_string()),
                        None => Err("global hotkeys unavailable".to_string()),
                    };
                    if result.is_ok() {
                        if let Ok(mut triggers) = self.triggers.lock() {
                            triggers.insert(hotkey.id(), trigger);
                        }
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(result);
                    }
                }
                Command::Unregister(hotkey) => {
                    if let Ok(mut triggers) = self.triggers.lock() {
                        triggers.remove(&hotkey.id());
                    }
                    if let Some(Err(e)) = manager.map(|m| m.unregister(hotkey)) {
                        warn!(error = %e, "failed to release hotkey");
                    }
                }
            }
        }
    }
}

/// [`HotkeyBackend`] that forwards to the main-thread manager.
pub struct MainThreadHotkeys {
    queue: HotkeyQueue,
    proxy: EventLoopProxy<UserEvent>,
    main: ThreadId,
    registered: HashSet<u32>,
}

impl MainThreadHotkeys {
    /// Must be created on the main thread.
    pub fn new(queue: HotkeyQueue, proxy: EventLoopProxy<UserEvent>) -> Self {
        Self {
            queue,
            proxy,
            main: thread::current().id(),
            registered: HashSet::new(),
        }
    }

    fn wake(&self) -> Result<(), PlatformError> {
        self.proxy
            .send_event(UserEvent::Hotkeys)
            .map_err(|_| PlatformError::HotkeyError("event loop closed".into()))
    }
}

/// Block for the main thread's answer. On a multi-threaded runtime the
/// worker is handed off first so other tasks keep running.
fn await_answer(answer: &mpsc::Receiver<Result<(), String>>) -> Result<(), PlatformError> {
    let wait = || match answer.recv_timeout(ANSWER_TIMEOUT) {
        Ok(result) => result.map_err(PlatformError::HotkeyError),
        Err(RecvTimeoutError::Timeout) => {
            Err(PlatformError::HotkeyError("event loop did not answer".into()))
        }
        Err(RecvTimeoutError::Disconnected) => {
            Err(PlatformError::HotkeyError("event loop closed".into()))
        }
    };
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            tokio::task::block_in_place(wait)
        }
        _ => wait(),
    }
}

fn to_hotkey(accel: &Accelerator) -> Result<HotKey, PlatformError> {
    accel
        .to_string()
        .parse::<HotKey>()
        .map_err(|e| PlatformError::HotkeyError(format!("{accel}: {e}")))
}

impl HotkeyBackend for MainThreadHotkeys {
    fn register(
        &mut self,
        accel: &Accelerator,
        on_trigger: TriggerFn,
    ) -> Result<(), PlatformError> {
        let hotkey = to_hotkey(accel)?;
        // On the main thread the loop drains right after this call returns;
        // waiting here would deadlock.
        let (reply, answer) = if thread::current().id() == self.main {
            (None, None)
        } else {
            let (tx, rx) = mpsc::channel();
            (Some(tx), Some(rx))
        };

        self.queue.push(Command::Register {
            hotkey,
            trigger: on_trigger,
            reply,
        });
        self.wake()?;

        if let Some(answer) = answer {
            await_answer(&answer)?;
        }
        self.registered.insert(hotkey.id());
        debug!(accelerator = %accel, "OS hotkey registered");
        Ok(())
    }

    fn unregister(&mut self, accel: &Accelerator) -> Result<(), PlatformError> {
        let hotkey = to_hotkey(accel)?;
        self.registered.remove(&hotkey.id());
        self.queue.push(Command::Unregister(hotkey));
        // During shutdown the loop drains explicitly; a closed loop is fine.
        let _ = self.wake();
        Ok(())
    }

    fn is_registered(&self, accel: &Accelerator) -> bool {
        to_hotkey(accel)
            .map(|h| self.registered.contains(&h.id()))
            .unwrap_or(false)
    }
}
