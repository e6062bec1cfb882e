/*!
    The segmented-muxing session.

    Owns the stream registry and the exclusive handle to the container
    writer, and drives the strict lifecycle around it:

    ```text
    Idle → Configured → Opened → Writing → Finalizing → Closed
                     (any fatal failure) → Error
    ```

    `Error` is absorbing. Setup failures (registration, open, header)
    land there and release the writer on the way; per-frame failures
    never change state.
*/

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;

use hlsmux_types::{
    AudioStreamDescriptor, CodecId, EncodedFrame, MuxError, Result, StreamDescriptor, StreamIndex,
    StreamType, VideoStreamDescriptor,
};

use crate::config::{HLS_FORMAT_NAME, RecordingOptions};
use crate::registry::StreamRegistry;
use crate::sequencer::PacketSequencer;
use crate::writer::{ContainerWriter, ContainerWriterFactory, OpenRequest};

/**
    Lifecycle state of a [`Session`].
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created; accepts options and stream registration.
    Idle,
    /// Options applied; still accepts stream registration.
    Configured,
    /// Output resource allocated; header not yet written.
    Opened,
    /// Header written; accepts frames.
    Writing,
    /// Trailer being written.
    Finalizing,
    /// Trailer written, writer released. Terminal.
    Closed,
    /// A fatal setup failure occurred. Terminal.
    Error,
}

impl SessionState {
    /**
        Short lowercase name, used in error messages and logs.
    */
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Configured => "configured",
            Self::Opened => "opened",
            Self::Writing => "writing",
            Self::Finalizing => "finalizing",
            Self::Closed => "closed",
            Self::Error => "errored",
        }
    }

    /**
        Returns true for states the session can never leave.
    */
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Error)
    }
}

/**
    Counters for one recording, updated per frame.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Video frames accepted by the writer.
    pub video_frames: u64,
    /// Audio frames accepted by the writer.
    pub audio_frames: u64,
    /// Frames the writer rejected (session kept running).
    pub failed_writes: u64,
    /// Payload bytes accepted by the writer.
    pub bytes_delivered: u64,
}

impl SessionStats {
    fn record_success(&mut self, kind: StreamType, bytes: usize) {
        match kind {
            StreamType::Video => self.video_frames += 1,
            StreamType::Audio => self.audio_frames += 1,
        }
        self.bytes_delivered += bytes as u64;
    }

    fn record_failure(&mut self) {
        self.failed_writes += 1;
    }
}

/**
    One segmented-muxing session.

    Holds the only handle to the container writer; the handle is opened
    at most once (in [`open`](Self::open)) and released at most once (in
    [`finalize`](Self::finalize), or on the way into `Error`). Sessions
    are not shareable by value — wrap one in a [`SharedSession`] to feed
    it from concurrent encoder callbacks.
*/
pub struct Session {
    state: SessionState,
    options: RecordingOptions,
    registry: StreamRegistry,
    sequencer: PacketSequencer,
    factory: Box<dyn ContainerWriterFactory>,
    writer: Option<Box<dyn ContainerWriter>>,
    stats: SessionStats,
}

impl Session {
    /**
        Create an idle session that will open its output through
        `factory`.
    */
    pub fn new(factory: impl ContainerWriterFactory + 'static) -> Self {
        Self {
            state: SessionState::Idle,
            options: RecordingOptions::default(),
            registry: StreamRegistry::new(),
            sequencer: PacketSequencer::new(),
            factory: Box::new(factory),
            writer: None,
            stats: SessionStats::default(),
        }
    }

    /**
        Apply recording options. Only permitted while `Idle`; moves the
        session to `Configured`.
    */
    pub fn apply_options(&mut self, options: RecordingOptions) -> Result<()> {
        if self.state != SessionState::Idle {
            return Err(self.rejected("apply options"));
        }
        self.options = options;
        self.state = SessionState::Configured;
        Ok(())
    }

    /**
        Apply options and register the streams they enable, using the
        platform encoder codecs (H.264 video, AAC audio). Video is
        skipped entirely when the options carry `(0, 0)` dimensions.
    */
    pub fn configure(&mut self, options: RecordingOptions) -> Result<()> {
        self.apply_options(options)?;
        if self.options.video_enabled() {
            self.register_video_stream(VideoStreamDescriptor::new(
                CodecId::H264,
                self.options.video_width,
                self.options.video_height,
            ))?;
        }
        if self.options.audio_enabled() {
            self.register_audio_stream(AudioStreamDescriptor::new(
                CodecId::Aac,
                self.options.audio_sample_rate,
                self.options.audio_channel_count,
            ))?;
        }
        Ok(())
    }

    /**
        Register the video stream. Permitted while `Idle` or
        `Configured`; afterwards rejected with
        [`MuxError::SessionAlreadyOpen`] without touching the session.

        A rejected descriptor — duplicate, unsupported codec, zero
        size — is a setup failure: it aborts the session into the
        `Error` state, like every other setup-phase error.
    */
    pub fn register_video_stream(
        &mut self,
        descriptor: VideoStreamDescriptor,
    ) -> Result<StreamIndex> {
        self.check_registration_window()?;
        if let Err(err) = self.check_codec_support(descriptor.codec) {
            return Err(self.abort_setup(err));
        }
        let index = match self.registry.register_video(descriptor) {
            Ok(index) => index,
            Err(err) => return Err(self.abort_setup(err)),
        };
        tracing::debug!(index = index.0, "registered video stream");
        Ok(index)
    }

    /**
        Register the audio stream. Permitted while `Idle` or
        `Configured`; afterwards rejected with
        [`MuxError::SessionAlreadyOpen`] without touching the session.

        A rejected descriptor aborts the session into the `Error`
        state, like every other setup-phase error.
    */
    pub fn register_audio_stream(
        &mut self,
        descriptor: AudioStreamDescriptor,
    ) -> Result<StreamIndex> {
        self.check_registration_window()?;
        if let Err(err) = self.check_codec_support(descriptor.codec) {
            return Err(self.abort_setup(err));
        }
        let index = match self.registry.register_audio(descriptor) {
            Ok(index) => index,
            Err(err) => return Err(self.abort_setup(err)),
        };
        tracing::debug!(index = index.0, "registered audio stream");
        Ok(index)
    }

    /**
        Allocate the container writer for `path` and open the output
        resource. Only permitted while `Configured`. Failure is fatal.
    */
    pub fn open(&mut self, path: impl AsRef<Path>) -> Result<()> {
        if self.state != SessionState::Configured {
            return Err(self.rejected("open the output"));
        }
        let path = path.as_ref();
        let segmenter = self.options.segmenter();
        let request = OpenRequest {
            format_name: HLS_FORMAT_NAME,
            output_path: path,
            streams: self.registry.descriptors(),
            segmenter: &segmenter,
        };
        match self.factory.open(request) {
            Ok(writer) => {
                self.writer = Some(writer);
                self.state = SessionState::Opened;
                tracing::debug!(path = %path.display(), streams = self.registry.len(), "opened container output");
                Ok(())
            }
            Err(err) => Err(self.abort_setup(MuxError::OutputOpenFailed {
                path: path.to_path_buf(),
                message: err.0,
            })),
        }
    }

    /**
        Serialize the container and stream metadata. Only permitted
        while `Opened`. Failure is fatal and releases the writer; no
        frames may be written afterwards.
    */
    pub fn write_header(&mut self) -> Result<()> {
        if self.state != SessionState::Opened {
            return Err(self.rejected("write the header"));
        }
        let Some(writer) = self.writer.as_mut() else {
            return Err(self.rejected("write the header"));
        };
        match writer.write_header() {
            Ok(()) => {
                self.state = SessionState::Writing;
                tracing::debug!("wrote container header");
                Ok(())
            }
            Err(err) => Err(self.abort_setup(MuxError::HeaderWriteFailed { message: err.0 })),
        }
    }

    /**
        Mux one encoded access unit.

        Resolves the frame's stream, rescales its microsecond timestamp
        into the stream's time base, and submits a zero-copy packet to
        the writer's interleaved-write operation. The frame's buffer is
        never retained past this call, on any path.

        Per-frame failures are non-fatal: the error carries the stream
        kind and 1-based sequence number, and the session stays in
        `Writing`, accepting subsequent frames.
    */
    pub fn write_frame(&mut self, frame: &EncodedFrame<'_>) -> Result<()> {
        if self.state != SessionState::Writing {
            return Err(self.rejected("write a frame"));
        }
        let index = self.registry.resolve(frame.stream_type)?;
        let time_base = self.registry.time_base(index);
        let (packet, sequence) = self.sequencer.prepare(frame, index, time_base);

        let Some(writer) = self.writer.as_mut() else {
            return Err(self.rejected("write a frame"));
        };
        if let Err(err) = writer.write_interleaved(packet) {
            self.stats.record_failure();
            tracing::warn!(
                kind = ?frame.stream_type,
                sequence,
                size = frame.size(),
                error = %err,
                "interleaved write failed, continuing"
            );
            return Err(MuxError::FrameWriteFailed {
                kind: frame.stream_type,
                sequence,
                message: err.0,
            });
        }
        self.stats.record_success(frame.stream_type, frame.size());
        Ok(())
    }

    /**
        Write the trailer, close the manifest, and release the writer.

        Only permitted while `Writing`; anything else — including a
        second call — fails with [`MuxError::InvalidState`] without
        touching the resource. A trailer failure is reported, but the
        writer is still released and the session still reaches `Closed`:
        the segments written so far remain usable.
    */
    pub fn finalize(&mut self) -> Result<()> {
        if self.state != SessionState::Writing {
            return Err(self.rejected("finalize"));
        }
        self.state = SessionState::Finalizing;
        let result = match self.writer.as_mut() {
            Some(writer) => writer.write_trailer(),
            None => Ok(()),
        };
        self.writer = None;
        self.state = SessionState::Closed;
        match result {
            Ok(()) => {
                tracing::debug!(stats = ?self.stats, "wrote container trailer");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "trailer write failed, output released anyway");
                Err(MuxError::TrailerWriteFailed { message: err.0 })
            }
        }
    }

    /**
        Current lifecycle state.
    */
    pub fn state(&self) -> SessionState {
        self.state
    }

    /**
        The options applied to this session.
    */
    pub fn options(&self) -> &RecordingOptions {
        &self.options
    }

    /**
        Descriptors of the registered streams, in index order.
    */
    pub fn streams(&self) -> &[StreamDescriptor] {
        self.registry.descriptors()
    }

    /**
        Frame counters for this recording.
    */
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// Late registration is a call-order mistake, rejected without
    /// touching the session.
    fn check_registration_window(&self) -> Result<()> {
        match self.state {
            SessionState::Idle | SessionState::Configured => Ok(()),
            _ => Err(MuxError::SessionAlreadyOpen),
        }
    }

    fn check_codec_support(&self, codec: CodecId) -> Result<()> {
        if self.factory.supports_codec(codec) {
            Ok(())
        } else {
            Err(MuxError::UnsupportedCodec { codec })
        }
    }

    /// Setup-phase failures abort the session; no partial-session
    /// recovery is attempted.
    fn abort_setup(&mut self, err: MuxError) -> MuxError {
        debug_assert!(err.is_fatal());
        self.writer = None;
        self.state = SessionState::Error;
        err
    }

    fn rejected(&self, operation: &'static str) -> MuxError {
        MuxError::InvalidState {
            operation,
            state: self.state.name(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("streams", &self.registry.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

/**
    Clone-able handle serializing access to one [`Session`].

    The expected caller shape is two independent encoder callbacks — one
    video, one audio — feeding the same session. Each call locks the
    session for the duration of exactly one operation, so a blocked
    writer stalls the opposite producer for at most one frame write.
*/
#[derive(Clone, Debug)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    /**
        Mux one encoded access unit. See [`Session::write_frame`].
    */
    pub fn write_frame(&self, frame: &EncodedFrame<'_>) -> Result<()> {
        self.inner.lock().write_frame(frame)
    }

    /**
        Finalize the recording. See [`Session::finalize`].
    */
    pub fn finalize(&self) -> Result<()> {
        self.inner.lock().finalize()
    }

    /**
        Current lifecycle state.
    */
    pub fn state(&self) -> SessionState {
        self.inner.lock().state()
    }

    /**
        Frame counters for this recording.
    */
    pub fn stats(&self) -> SessionStats {
        self.inner.lock().stats()
    }

    /**
        Run `f` with exclusive access to the session, for setup calls
        before the producers start.
    */
    pub fn with<R>(&self, f: impl FnOnce(&mut Session) -> R) -> R {
        f(&mut self.inner.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::NullWriterFactory;

    fn configured_session() -> Session {
        let mut session = Session::new(NullWriterFactory);
        session.configure(RecordingOptions::default()).unwrap();
        session
    }

    #[test]
    fn lifecycle_happy_path() {
        let mut session = configured_session();
        assert_eq!(session.state(), SessionState::Configured);
        assert_eq!(session.streams().len(), 2);

        session.open("/tmp/out/live.m3u8").unwrap();
        assert_eq!(session.state(), SessionState::Opened);
        session.write_header().unwrap();
        assert_eq!(session.state(), SessionState::Writing);

        let data = [0u8; 64];
        session
            .write_frame(&EncodedFrame::video(&data, 0, true))
            .unwrap();
        session.write_frame(&EncodedFrame::audio(&data, 0)).unwrap();
        session.finalize().unwrap();
        assert_eq!(session.state(), SessionState::Closed);
        assert!(session.state().is_terminal());

        let stats = session.stats();
        assert_eq!(stats.video_frames, 1);
        assert_eq!(stats.audio_frames, 1);
        assert_eq!(stats.bytes_delivered, 128);
        assert_eq!(stats.failed_writes, 0);
    }

    #[test]
    fn options_only_apply_while_idle() {
        let mut session = configured_session();
        let err = session
            .apply_options(RecordingOptions::default())
            .unwrap_err();
        assert!(matches!(err, MuxError::InvalidState { .. }));
    }

    #[test]
    fn video_disabled_registers_audio_only() {
        let mut session = Session::new(NullWriterFactory);
        session
            .configure(RecordingOptions::default().without_video().with_audio(44100, 1))
            .unwrap();
        assert_eq!(session.streams().len(), 1);
        assert_eq!(session.streams()[0].stream_type(), StreamType::Audio);

        session.open("/tmp/out/audio.m3u8").unwrap();
        session.write_header().unwrap();
        let err = session
            .write_frame(&EncodedFrame::video(&[], 0, true))
            .unwrap_err();
        assert_eq!(
            err,
            MuxError::StreamNotRegistered {
                kind: StreamType::Video
            }
        );
        // Recoverable: the session is still writing.
        assert_eq!(session.state(), SessionState::Writing);
        session.write_frame(&EncodedFrame::audio(&[], 0)).unwrap();
    }

    #[test]
    fn registration_closes_at_open() {
        let mut session = configured_session();
        session.open("/tmp/out/live.m3u8").unwrap();
        let err = session
            .register_video_stream(VideoStreamDescriptor::new(CodecId::H264, 640, 480))
            .unwrap_err();
        assert_eq!(err, MuxError::SessionAlreadyOpen);
        assert!(!err.is_fatal());
        assert_eq!(session.state(), SessionState::Opened);
        session.write_header().unwrap();
        assert_eq!(session.state(), SessionState::Writing);
    }

    #[test]
    fn factory_codec_support_is_consulted() {
        struct PickyFactory;
        impl ContainerWriterFactory for PickyFactory {
            fn supports_codec(&self, codec: CodecId) -> bool {
                codec != CodecId::H265
            }
            fn open(
                &mut self,
                _request: OpenRequest<'_>,
            ) -> std::result::Result<Box<dyn ContainerWriter>, crate::writer::WriterError>
            {
                Ok(Box::new(crate::writer::NullWriter::default()))
            }
        }

        let mut session = Session::new(PickyFactory);
        let err = session
            .register_video_stream(VideoStreamDescriptor::new(CodecId::H265, 1280, 720))
            .unwrap_err();
        assert_eq!(
            err,
            MuxError::UnsupportedCodec {
                codec: CodecId::H265
            }
        );
        assert_eq!(session.state(), SessionState::Error);
    }

    #[test]
    fn duplicate_registration_aborts_the_session() {
        let mut session = Session::new(NullWriterFactory);
        session
            .register_audio_stream(AudioStreamDescriptor::new(CodecId::Aac, 44100, 2))
            .unwrap();
        let err = session
            .register_audio_stream(AudioStreamDescriptor::new(CodecId::Aac, 48000, 2))
            .unwrap_err();
        assert_eq!(
            err,
            MuxError::DuplicateStream {
                kind: StreamType::Audio
            }
        );
        assert!(err.is_fatal());
        assert_eq!(session.state(), SessionState::Error);

        let err = session.open("/tmp/out/live.m3u8").unwrap_err();
        assert!(matches!(err, MuxError::InvalidState { .. }));
        assert_eq!(session.state(), SessionState::Error);
    }

    #[test]
    fn invalid_descriptor_aborts_the_session() {
        let mut session = Session::new(NullWriterFactory);
        let err = session
            .register_video_stream(VideoStreamDescriptor::new(CodecId::H264, 0, 720))
            .unwrap_err();
        assert!(matches!(err, MuxError::InvalidDescriptor { .. }));
        assert_eq!(session.state(), SessionState::Error);
    }

    #[test]
    fn frames_before_header_are_rejected() {
        let mut session = configured_session();
        session.open("/tmp/out/live.m3u8").unwrap();
        let err = session
            .write_frame(&EncodedFrame::audio(&[], 0))
            .unwrap_err();
        assert_eq!(
            err,
            MuxError::InvalidState {
                operation: "write a frame",
                state: "opened"
            }
        );
        assert_eq!(session.state(), SessionState::Opened);
    }

    #[test]
    fn double_finalize_is_rejected_without_side_effects() {
        let mut session = configured_session();
        session.open("/tmp/out/live.m3u8").unwrap();
        session.write_header().unwrap();
        session.finalize().unwrap();
        let err = session.finalize().unwrap_err();
        assert_eq!(
            err,
            MuxError::InvalidState {
                operation: "finalize",
                state: "closed"
            }
        );
        assert_eq!(session.state(), SessionState::Closed);
    }

    #[test]
    fn finalize_before_header_is_rejected() {
        let mut session = configured_session();
        session.open("/tmp/out/live.m3u8").unwrap();
        assert!(matches!(
            session.finalize(),
            Err(MuxError::InvalidState { .. })
        ));
        assert_eq!(session.state(), SessionState::Opened);
    }

    #[test]
    fn open_requires_configuration() {
        let mut session = Session::new(NullWriterFactory);
        assert!(matches!(
            session.open("/tmp/out/live.m3u8"),
            Err(MuxError::InvalidState { .. })
        ));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn shared_session_feeds_from_two_producers() {
        let shared = SharedSession::new(configured_session());
        shared.with(|s| {
            s.open("/tmp/out/live.m3u8")?;
            s.write_header()
        })
        .unwrap();

        let video = shared.clone();
        let audio = shared.clone();
        let vt = std::thread::spawn(move || {
            let data = [0u8; 32];
            for i in 0..50i64 {
                video
                    .write_frame(&EncodedFrame::video(&data, i * 33_333, i == 0))
                    .unwrap();
            }
        });
        let at = std::thread::spawn(move || {
            let data = [0u8; 16];
            for i in 0..50i64 {
                audio
                    .write_frame(&EncodedFrame::audio(&data, i * 23_220))
                    .unwrap();
            }
        });
        vt.join().unwrap();
        at.join().unwrap();

        shared.finalize().unwrap();
        let stats = shared.stats();
        assert_eq!(stats.video_frames, 50);
        assert_eq!(stats.audio_frames, 50);
    }
}
