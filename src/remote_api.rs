use crate::pipeline::pattern::Pattern;

/// Which operation a reply is about, for status messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteAction {
    Save,
    Delete,
    Execute,
}

impl RemoteAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::Save => "save",
            Self::Delete => "delete",
            Self::Execute => "execute",
        }
    }
}

/// Work for the remote worker thread. The middle layer never does network
/// IO itself; it hands one of these over the channel and moves on.
#[derive(Clone, Debug)]
pub enum RemoteCommand {
    /// Create (no id yet) or fully replace (id known) a pattern.
    SavePattern(Pattern),
    DeletePattern { id: String },
    /// Kick off sequential playback of a saved pattern on a device.
    ExecutePattern { pattern_id: String, device_id: String },
    Shutdown,
}

/// What comes back, polled once per UI frame.
#[derive(Clone, Debug)]
pub enum RemoteReply {
    Saved { id: String },
    Deleted { id: String },
    Executed { pattern_id: String },
    Failed { action: RemoteAction, message: String },
}
