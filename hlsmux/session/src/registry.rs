/*!
    Stream registry.

    Holds the descriptors of the streams a session will mux — at most
    one video and one audio stream — and assigns their container stream
    indices. Indices are 0-based, follow registration order, and stay
    stable for the lifetime of the session.
*/

use hlsmux_types::{
    AudioStreamDescriptor, CodecId, MuxError, Rational, Result, StreamDescriptor, StreamIndex,
    StreamType, VideoStreamDescriptor,
};

/**
    Registry of the elementary streams in one muxing session.

    Registration must be complete before the container header is
    written; the session enforces that boundary.
*/
#[derive(Debug, Default)]
pub struct StreamRegistry {
    streams: Vec<StreamDescriptor>,
    video: Option<StreamIndex>,
    audio: Option<StreamIndex>,
}

impl StreamRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Register the session's video stream and assign its index.

        Fails with [`MuxError::DuplicateStream`] if a video stream is
        already registered, [`MuxError::UnsupportedCodec`] if the codec
        is not a video codec the segmented container can carry, or
        [`MuxError::InvalidDescriptor`] on a zero-sized stream. Callers
        with video disabled (0x0 dimensions) must skip registration
        entirely; the registry never creates a zero-sized stream.
    */
    pub fn register_video(&mut self, descriptor: VideoStreamDescriptor) -> Result<StreamIndex> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(MuxError::InvalidDescriptor {
                message: format!(
                    "video streams must have nonzero dimensions, got {}x{}",
                    descriptor.width, descriptor.height
                ),
            });
        }
        if self.video.is_some() {
            return Err(MuxError::DuplicateStream {
                kind: StreamType::Video,
            });
        }
        if !descriptor.codec.is_video() {
            return Err(MuxError::UnsupportedCodec {
                codec: descriptor.codec,
            });
        }
        check_muxable(descriptor.codec)?;

        let index = self.push(StreamDescriptor::Video(descriptor));
        self.video = Some(index);
        Ok(index)
    }

    /**
        Register the session's audio stream and assign its index.

        Fails with [`MuxError::DuplicateStream`] if an audio stream is
        already registered, or [`MuxError::UnsupportedCodec`] if the
        codec is not an audio codec the segmented container can carry.
    */
    pub fn register_audio(&mut self, descriptor: AudioStreamDescriptor) -> Result<StreamIndex> {
        if self.audio.is_some() {
            return Err(MuxError::DuplicateStream {
                kind: StreamType::Audio,
            });
        }
        if !descriptor.codec.is_audio() {
            return Err(MuxError::UnsupportedCodec {
                codec: descriptor.codec,
            });
        }
        check_muxable(descriptor.codec)?;

        let index = self.push(StreamDescriptor::Audio(descriptor));
        self.audio = Some(index);
        Ok(index)
    }

    /**
        Resolve a stream kind to its registered index.

        Fails with [`MuxError::StreamNotRegistered`] if no stream of
        that kind exists in this session.
    */
    pub fn resolve(&self, kind: StreamType) -> Result<StreamIndex> {
        let index = match kind {
            StreamType::Video => self.video,
            StreamType::Audio => self.audio,
        };
        index.ok_or(MuxError::StreamNotRegistered { kind })
    }

    /**
        The time base assigned to the stream at `index`.
    */
    pub fn time_base(&self, index: StreamIndex) -> Rational {
        self.streams[index.0].time_base()
    }

    /**
        All registered descriptors, in index order.
    */
    pub fn descriptors(&self) -> &[StreamDescriptor] {
        &self.streams
    }

    /**
        Number of registered streams.
    */
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /**
        Returns true if no streams are registered.
    */
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    fn push(&mut self, descriptor: StreamDescriptor) -> StreamIndex {
        let index = StreamIndex(self.streams.len());
        self.streams.push(descriptor);
        index
    }
}

fn check_muxable(codec: CodecId) -> Result<()> {
    if codec.muxes_into_hls() {
        Ok(())
    } else {
        Err(MuxError::UnsupportedCodec { codec })
    }
}
