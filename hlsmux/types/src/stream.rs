/*!
    Stream descriptors and indices.
*/

use crate::{CodecId, PixelFormat, Rational, SampleFormat};

/**
    Type of media stream.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamType {
    /// Video stream
    Video,
    /// Audio stream
    Audio,
}

/**
    Index of a stream within a container.

    Assigned by the stream registry in registration order, 0-based, and
    stable for the lifetime of a session — an index is never reused.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamIndex(pub usize);

/**
    Immutable configuration for one elementary stream.

    Built once at registration time; the time base recorded here is the
    clock packets for this stream are delivered to the container in.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamDescriptor {
    Video(VideoStreamDescriptor),
    Audio(AudioStreamDescriptor),
}

/**
    Descriptor for a video elementary stream.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoStreamDescriptor {
    pub codec: CodecId,
    pub pixel_format: PixelFormat,
    pub width: u32,
    pub height: u32,
    /// Frame-rate time base, 1/30 unless the caller says otherwise.
    pub time_base: Rational,
}

/**
    Descriptor for an audio elementary stream.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioStreamDescriptor {
    pub codec: CodecId,
    pub sample_format: SampleFormat,
    pub sample_rate: u32,
    pub channels: u16,
    /// Sample-rate time base, always 1/sample_rate.
    pub time_base: Rational,
}

impl VideoStreamDescriptor {
    /// Default video frame-rate time base.
    pub const DEFAULT_TIME_BASE: Rational = Rational::new(1, 30);

    /**
        Create a video stream descriptor with the default 1/30 time base.
    */
    pub fn new(codec: CodecId, width: u32, height: u32) -> Self {
        Self {
            codec,
            pixel_format: PixelFormat::default(),
            width,
            height,
            time_base: Self::DEFAULT_TIME_BASE,
        }
    }

    /**
        Override the pixel format.
    */
    pub fn with_pixel_format(mut self, pixel_format: PixelFormat) -> Self {
        self.pixel_format = pixel_format;
        self
    }

    /**
        Override the frame-rate time base.
    */
    pub fn with_time_base(mut self, time_base: Rational) -> Self {
        self.time_base = time_base;
        self
    }
}

impl AudioStreamDescriptor {
    /**
        Create an audio stream descriptor. The time base is derived from
        the sample rate and cannot be overridden.

        # Panics

        Panics if `sample_rate` is zero.
    */
    pub fn new(codec: CodecId, sample_rate: u32, channels: u16) -> Self {
        Self {
            codec,
            sample_format: SampleFormat::default(),
            sample_rate,
            channels,
            time_base: Rational::per_second(sample_rate as i32),
        }
    }

    /**
        Override the sample format.
    */
    pub fn with_sample_format(mut self, sample_format: SampleFormat) -> Self {
        self.sample_format = sample_format;
        self
    }
}

impl StreamDescriptor {
    /**
        The kind of stream this descriptor configures.
    */
    pub fn stream_type(&self) -> StreamType {
        match self {
            Self::Video(_) => StreamType::Video,
            Self::Audio(_) => StreamType::Audio,
        }
    }

    /**
        The codec this stream carries.
    */
    pub fn codec(&self) -> CodecId {
        match self {
            Self::Video(v) => v.codec,
            Self::Audio(a) => a.codec,
        }
    }

    /**
        The time base packets for this stream are stamped in.
    */
    pub fn time_base(&self) -> Rational {
        match self {
            Self::Video(v) => v.time_base,
            Self::Audio(a) => a.time_base,
        }
    }
}
