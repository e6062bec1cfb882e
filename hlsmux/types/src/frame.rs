/*!
    Encoded access units as delivered by a platform encoder.
*/

use crate::{Pts, Rational, StreamType};

/**
    One encoded access unit, borrowed from the encoder callback.

    The data buffer belongs to the caller (typically a hardware codec's
    output buffer) and is only valid for the duration of one
    `write_frame` call. Nothing in the muxing core retains it.

    Timestamps are always in microseconds; [`EncodedFrame::TIME_BASE`]
    is the fixed source clock for every frame regardless of stream kind.
*/
#[derive(Clone, Copy, Debug)]
pub struct EncodedFrame<'a> {
    /// Compressed data, valid only for the current call.
    pub data: &'a [u8],
    /// Presentation timestamp in microseconds.
    pub pts: Pts,
    /// Which registered stream this frame belongs to.
    pub stream_type: StreamType,
    /// Whether this access unit can be decoded independently.
    pub is_keyframe: bool,
    /// Opaque encoder flags, forwarded to the container untouched.
    pub flags: u32,
}

impl<'a> EncodedFrame<'a> {
    /// The clock domain encoders stamp frames in.
    pub const TIME_BASE: Rational = Rational::MICROSECONDS;

    /**
        Create a video frame.
    */
    pub fn video(data: &'a [u8], pts_micros: i64, is_keyframe: bool) -> Self {
        Self {
            data,
            pts: Pts(pts_micros),
            stream_type: StreamType::Video,
            is_keyframe,
            flags: 0,
        }
    }

    /**
        Create an audio frame. Audio access units are always sync points.
    */
    pub fn audio(data: &'a [u8], pts_micros: i64) -> Self {
        Self {
            data,
            pts: Pts(pts_micros),
            stream_type: StreamType::Audio,
            is_keyframe: true,
            flags: 0,
        }
    }

    /**
        Attach opaque encoder flags to forward to the container.
    */
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /**
        Size of the compressed payload in bytes.
    */
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

// Frames only borrow caller data; sharing them across the producer
// threads must stay possible.
static_assertions::assert_impl_all!(EncodedFrame<'static>: Send, Sync);
