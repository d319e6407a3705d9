use crossbeam_channel::{Receiver, Sender};

use crate::remote_api::{RemoteAction, RemoteCommand, RemoteReply};

mod client;

pub use client::{PatternApi, TransportError};

/// Handle the UI side keeps. Commands go out fire-and-forget; replies are
/// polled once per frame.
pub struct RemoteHandle {
    tx: Sender<RemoteCommand>,
    reply_rx: Receiver<RemoteReply>,
    _worker: std::thread::JoinHandle<()>,
}

impl RemoteHandle {
    pub fn send(&self, cmd: RemoteCommand) {
        let _ = self.tx.try_send(cmd);
    }

    pub fn poll_reply(&self) -> Option<RemoteReply> {
        self.reply_rx.try_recv().ok()
    }
}

impl Drop for RemoteHandle {
    fn drop(&mut self) {
        // let the worker wind down on its own; a hung request must not
        // block quitting the terminal
        let _ = self.tx.try_send(RemoteCommand::Shutdown);
    }
}

/// Spin up the worker thread that owns the HTTP client. Fails fast if the
/// client itself can't be built; after that every failure comes back as a
/// `RemoteReply::Failed` instead of an error.
pub fn start_remote(server_url: &str) -> anyhow::Result<RemoteHandle> {
    let api = PatternApi::new(server_url)?;
    let (tx, rx) = crossbeam_channel::bounded::<RemoteCommand>(64);
    let (reply_tx, reply_rx) = crossbeam_channel::bounded::<RemoteReply>(64);

    let worker = std::thread::spawn(move || worker_loop(api, rx, reply_tx));

    Ok(RemoteHandle {
        tx,
        reply_rx,
        _worker: worker,
    })
}

// One request at a time, in the order they were sent. No retries: the
// operator re-triggers if something failed.
fn worker_loop(api: PatternApi, rx: Receiver<RemoteCommand>, reply_tx: Sender<RemoteReply>) {
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("remote worker could not create a runtime: {e}");
            return;
        }
    };

    while let Ok(cmd) = rx.recv() {
        let reply = match cmd {
            RemoteCommand::Shutdown => break,
            RemoteCommand::SavePattern(pattern) => {
                tracing::info!(name = %pattern.name, replacing = pattern.id.is_some(), "saving pattern");
                match rt.block_on(api.save_pattern(&pattern)) {
                    Ok(id) => RemoteReply::Saved { id },
                    Err(e) => failed(RemoteAction::Save, e),
                }
            }
            RemoteCommand::DeletePattern { id } => {
                tracing::info!(%id, "deleting pattern");
                match rt.block_on(api.delete_pattern(&id)) {
                    Ok(()) => RemoteReply::Deleted { id },
                    Err(e) => failed(RemoteAction::Delete, e),
                }
            }
            RemoteCommand::ExecutePattern {
                pattern_id,
                device_id,
            } => {
                tracing::info!(%pattern_id, %device_id, "executing pattern");
                match rt.block_on(api.execute_pattern(&pattern_id, &device_id)) {
                    Ok(()) => RemoteReply::Executed { pattern_id },
                    Err(e) => failed(RemoteAction::Execute, e),
                }
            }
        };
        let _ = reply_tx.try_send(reply);
    }
}

fn failed(action: RemoteAction, e: TransportError) -> RemoteReply {
    tracing::warn!("remote {} failed: {}", action.label(), e);
    RemoteReply::Failed {
        action,
        message: e.to_string(),
    }
}
