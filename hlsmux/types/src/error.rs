/*!
    Error types for the hlsmux crate ecosystem.
*/

use std::path::PathBuf;

use crate::{CodecId, StreamType};

/**
    Error type for segmented-muxing sessions.

    Setup-phase errors ([`UnsupportedCodec`](MuxError::UnsupportedCodec),
    [`DuplicateStream`](MuxError::DuplicateStream),
    [`InvalidDescriptor`](MuxError::InvalidDescriptor),
    [`OutputOpenFailed`](MuxError::OutputOpenFailed),
    [`HeaderWriteFailed`](MuxError::HeaderWriteFailed)) are fatal to the
    session. Per-frame errors
    ([`StreamNotRegistered`](MuxError::StreamNotRegistered),
    [`FrameWriteFailed`](MuxError::FrameWriteFailed)) are recoverable —
    the session keeps accepting frames after reporting them.
*/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum MuxError {
    /// The requested codec has no mux support in the underlying writer.
    #[error("codec {codec:?} is not supported by the container writer")]
    UnsupportedCodec { codec: CodecId },

    /// A stream of this kind is already registered for the session.
    #[error("a {kind:?} stream is already registered")]
    DuplicateStream { kind: StreamType },

    /// Stream registration attempted after the container was opened.
    #[error("session is already open; streams must be registered before the header is written")]
    SessionAlreadyOpen,

    /// A stream descriptor carried values the container cannot
    /// represent, e.g. a zero-sized video stream.
    #[error("invalid stream descriptor: {message}")]
    InvalidDescriptor { message: String },

    /// The output path could not be created or opened for writing.
    #[error("failed to open output at {path:?}: {message}")]
    OutputOpenFailed { path: PathBuf, message: String },

    /// The container header could not be serialized. Fatal.
    #[error("failed to write container header: {message}")]
    HeaderWriteFailed { message: String },

    /// A frame arrived for a stream kind that was never registered.
    #[error("no {kind:?} stream is registered")]
    StreamNotRegistered { kind: StreamType },

    /// The writer rejected one packet. The session stays writable.
    #[error("failed to write {kind:?} packet #{sequence}: {message}")]
    FrameWriteFailed {
        kind: StreamType,
        /// 1-based per-stream sequence number of the failed frame.
        sequence: u64,
        message: String,
    },

    /// The trailer write failed. The output resource is still released
    /// and segments written so far remain usable.
    #[error("failed to write container trailer: {message}")]
    TrailerWriteFailed { message: String },

    /// Caller invoked an operation in the wrong lifecycle state.
    /// Always a local, side-effect-free rejection.
    #[error("cannot {operation} while the session is {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
}

impl MuxError {
    /**
        Returns true if this error aborts the session.

        Per-frame errors and call-order mistakes (including a late
        registration attempt) leave the session in its current state;
        everything else transitions it to `Error`.
    */
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            Self::StreamNotRegistered { .. }
                | Self::FrameWriteFailed { .. }
                | Self::TrailerWriteFailed { .. }
                | Self::InvalidState { .. }
                | Self::SessionAlreadyOpen
        )
    }
}

/**
    Result type alias for the hlsmux crate ecosystem.
*/
pub type Result<T> = std::result::Result<T, MuxError>;
