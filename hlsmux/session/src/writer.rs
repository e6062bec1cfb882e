/*!
    Container writer contract.

    The entity that actually serializes bytes into a manifest and media
    segments is an external collaborator — an FFmpeg binding, a remote
    process, a test double. The session only depends on the two traits
    here.
*/

use std::path::Path;

use hlsmux_types::{CodecId, ContainerPacket, StreamDescriptor};

use crate::config::SegmenterOptions;

/**
    Error reported by a container writer implementation.

    Carries the backend's own error text; the session wraps it into the
    appropriate [`MuxError`](hlsmux_types::MuxError) variant depending
    on which lifecycle operation failed.
*/
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct WriterError(pub String);

impl WriterError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<std::io::Error> for WriterError {
    fn from(e: std::io::Error) -> Self {
        Self(e.to_string())
    }
}

/**
    Everything a writer needs to allocate its output context: the
    logical format name, where to put the manifest, the streams it will
    receive packets for, and the segmenter knobs.
*/
#[derive(Clone, Copy, Debug)]
pub struct OpenRequest<'a> {
    /// Logical container format, e.g. [`HLS_FORMAT_NAME`](crate::config::HLS_FORMAT_NAME).
    pub format_name: &'a str,
    /// Path of the manifest file the writer produces.
    pub output_path: &'a Path,
    /// Descriptors of every registered stream, in index order.
    pub streams: &'a [StreamDescriptor],
    /// Segment duration and playlist retention.
    pub segmenter: &'a SegmenterOptions,
}

/**
    Factory that opens container writers.

    A session holds one factory and calls [`open`](Self::open) exactly
    once, when it transitions from `Configured` to `Opened`.
*/
pub trait ContainerWriterFactory: Send {
    /**
        Whether the underlying backend can mux this codec. Consulted at
        stream registration time.
    */
    fn supports_codec(&self, codec: CodecId) -> bool {
        let _ = codec;
        true
    }

    /**
        Allocate the output resource and return the writer handle.

        A failure here means the path is not writable or the context
        could not be created; the session treats it as fatal.
    */
    fn open(&mut self, request: OpenRequest<'_>) -> Result<Box<dyn ContainerWriter>, WriterError>;
}

/**
    An open container writer.

    Not reentrant: the session serializes all calls. The writer performs
    its own stable interleaving — it may buffer packets per stream and
    flush them across streams by increasing timestamp. The session in
    turn guarantees that each stream's packets arrive with non-decreasing
    timestamps.

    `write_interleaved` must consume the packet's borrowed data before
    returning; no reference to it may be retained afterwards.
*/
pub trait ContainerWriter: Send {
    /**
        Serialize the container and stream metadata.
    */
    fn write_header(&mut self) -> Result<(), WriterError>;

    /**
        Submit one packet for interleaved writing.
    */
    fn write_interleaved(&mut self, packet: ContainerPacket<'_>) -> Result<(), WriterError>;

    /**
        Write the trailer and close the manifest.

        The session drops the handle right after this call, successful
        or not.
    */
    fn write_trailer(&mut self) -> Result<(), WriterError>;
}

/**
    A writer that accepts and discards everything.

    Useful for dry runs and for exercising the session lifecycle in
    tests without a real container backend.
*/
#[derive(Debug, Default)]
pub struct NullWriter {
    packets: u64,
}

impl NullWriter {
    /**
        Number of packets discarded so far.
    */
    pub fn packets_written(&self) -> u64 {
        self.packets
    }
}

impl ContainerWriter for NullWriter {
    fn write_header(&mut self) -> Result<(), WriterError> {
        Ok(())
    }

    fn write_interleaved(&mut self, _packet: ContainerPacket<'_>) -> Result<(), WriterError> {
        self.packets += 1;
        Ok(())
    }

    fn write_trailer(&mut self) -> Result<(), WriterError> {
        Ok(())
    }
}

/**
    Factory producing [`NullWriter`]s.
*/
#[derive(Debug, Default)]
pub struct NullWriterFactory;

impl ContainerWriterFactory for NullWriterFactory {
    fn open(&mut self, _request: OpenRequest<'_>) -> Result<Box<dyn ContainerWriter>, WriterError> {
        Ok(Box::new(NullWriter::default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hlsmux_types::{Pts, StreamIndex};

    #[test]
    fn null_writer_counts_packets() {
        let mut writer = NullWriter::default();
        writer.write_header().unwrap();
        writer
            .write_interleaved(ContainerPacket {
                stream_index: StreamIndex(0),
                data: &[0u8; 16],
                pts: Pts(0),
                is_keyframe: true,
                flags: 0,
            })
            .unwrap();
        writer.write_trailer().unwrap();
        assert_eq!(writer.packets_written(), 1);
    }

    #[test]
    fn null_factory_opens_anywhere() {
        let mut factory = NullWriterFactory;
        let segmenter = SegmenterOptions::default();
        let mut writer = factory
            .open(OpenRequest {
                format_name: crate::config::HLS_FORMAT_NAME,
                output_path: Path::new("/nonexistent/live.m3u8"),
                streams: &[],
                segmenter: &segmenter,
            })
            .unwrap();
        writer.write_header().unwrap();
    }

    #[test]
    fn writer_error_from_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only fs");
        let err = WriterError::from(io);
        assert!(err.0.contains("read-only fs"));
    }
}
