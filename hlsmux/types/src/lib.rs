/*!
    Shared types for the hlsmux crate ecosystem.

    This crate defines the vocabulary of the ecosystem — the types that cross
    crate boundaries between encoder callbacks, the muxing session, and
    container writer implementations. It has no dependency on any container
    library, so writer backends and callers can share it cheaply.

    # Core Types

    - [`Rational`] - Rational numbers for time bases
    - [`Pts`] - Timestamps in time_base units, with single-rounding rescale
    - [`EncodedFrame`] - A borrowed encoded access unit from an encoder
    - [`ContainerPacket`] - The zero-copy unit handed to a container writer

    # Stream Configuration

    - [`StreamDescriptor`], [`VideoStreamDescriptor`], [`AudioStreamDescriptor`]
    - [`StreamType`] and [`StreamIndex`]
    - [`CodecId`], [`PixelFormat`], [`SampleFormat`]

    # Error Handling

    - [`MuxError`] and [`Result`]
*/

mod codec;
mod error;
mod format;
mod frame;
mod packet;
mod rational;
mod stream;
mod timestamp;

pub use codec::CodecId;
pub use error::{MuxError, Result};
pub use format::{PixelFormat, SampleFormat};
pub use frame::EncodedFrame;
pub use packet::ContainerPacket;
pub use rational::Rational;
pub use stream::{
    AudioStreamDescriptor, StreamDescriptor, StreamIndex, StreamType, VideoStreamDescriptor,
};
pub use timestamp::Pts;
