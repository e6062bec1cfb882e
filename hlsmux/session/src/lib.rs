/*!
    Segmented HLS muxing session for the hlsmux crate ecosystem.

    This crate takes encoded access units from a platform encoder and
    repackages them into a continuously-segmented streaming container:
    a manifest plus a rolling sequence of media segments. The container
    writer itself — the thing that serializes bytes into `.m3u8` and
    segment files — is an external collaborator behind the
    [`ContainerWriter`] contract; this crate owns everything around it:
    stream registration, timestamp normalization, packet sequencing, and
    the session lifecycle.

    # Basic Usage

    ```ignore
    use hlsmux_session::{RecordingOptions, Session};
    use hlsmux_types::EncodedFrame;

    let mut session = Session::new(writer_factory);
    session.configure(RecordingOptions::default().with_segment_duration(4))?;
    session.open(location.manifest_path())?;
    session.write_header()?;

    // From the encoder callbacks:
    session.write_frame(&EncodedFrame::video(buffer, pts_micros, keyframe))?;

    session.finalize()?;
    ```

    # Lifecycle

    `Idle → Configured → Opened → Writing → Finalizing → Closed`, with
    an absorbing `Error` state for fatal setup failures. Per-frame write
    failures are non-fatal: they are reported with the stream kind and
    sequence number, and the session keeps accepting frames — dropping
    one frame of a live recording should not kill the recording.

    # Concurrency

    The writer handle is not reentrant. [`SharedSession`] wraps a
    session in a mutex so a video encoder callback and an audio encoder
    callback can feed it concurrently, holding the lock for exactly one
    write each. Register all streams before the producers start.

    # Watching the output

    The [`playlist`] module parses the manifest the writer maintains and
    turns successive snapshots into segment-complete events, for callers
    that upload or announce segments as they appear.
*/

pub use hlsmux_types::{
    AudioStreamDescriptor, CodecId, ContainerPacket, EncodedFrame, MuxError, PixelFormat, Pts,
    Rational, Result, SampleFormat, StreamDescriptor, StreamIndex, StreamType,
    VideoStreamDescriptor,
};

mod config;
mod registry;
mod sequencer;
mod session;
mod writer;

pub mod playlist;

pub use config::{HLS_FORMAT_NAME, OutputLocation, RecordingOptions, SegmenterOptions};
pub use registry::StreamRegistry;
pub use sequencer::PacketSequencer;
pub use session::{Session, SessionState, SessionStats, SharedSession};
pub use writer::{
    ContainerWriter, ContainerWriterFactory, NullWriter, NullWriterFactory, OpenRequest,
    WriterError,
};

// Callers hand frames across threads into a shared session.
static_assertions::assert_impl_all!(SharedSession: Send, Sync);
