/*!
    Container packet type.
*/

use crate::{Pts, StreamIndex};

/**
    The unit submitted to the container writer.

    Tags a borrowed data buffer with its resolved stream index and a
    timestamp already rescaled into that stream's own time base. The
    buffer is the caller's encoder buffer — packets are zero-copy and
    exist only for the duration of one interleaved write, which the
    writer contract requires to consume the data before returning.
*/
#[derive(Clone, Copy, Debug)]
pub struct ContainerPacket<'a> {
    /// Index of the stream this packet belongs to.
    pub stream_index: StreamIndex,
    /// Compressed payload, borrowed from the encoder for this call.
    pub data: &'a [u8],
    /// Presentation timestamp in the stream's own time base.
    pub pts: Pts,
    /// Whether the payload is an independently decodable sync sample.
    pub is_keyframe: bool,
    /// Opaque encoder flags, forwarded untouched.
    pub flags: u32,
}

impl ContainerPacket<'_> {
    /**
        Size of the payload in bytes.
    */
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

static_assertions::assert_impl_all!(ContainerPacket<'static>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packet_is_a_tagged_borrow() {
        let data = [1u8, 2, 3];
        let packet = ContainerPacket {
            stream_index: StreamIndex(1),
            data: &data,
            pts: Pts(90),
            is_keyframe: false,
            flags: 0,
        };
        assert_eq!(packet.size(), 3);
        assert_eq!(packet.stream_index, StreamIndex(1));
        assert_eq!(packet.pts, Pts(90));
    }
}
