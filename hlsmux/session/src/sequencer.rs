/*!
    Packet sequencing.

    Turns one encoded access unit into a container packet: resolves the
    rescaled timestamp, keeps per-stream sequence numbers, and enforces
    that each stream's packets leave with non-decreasing timestamps.
*/

use hlsmux_types::{ContainerPacket, EncodedFrame, Pts, Rational, StreamIndex, StreamType};

/**
    Per-stream sequencing state for one session.

    Sequence numbers are 1-based and count every attempted write,
    including ones the writer later rejects — they identify frames in
    error reports and logs.
*/
#[derive(Debug, Default)]
pub struct PacketSequencer {
    video: StreamProgress,
    audio: StreamProgress,
}

#[derive(Debug, Default)]
struct StreamProgress {
    sequence: u64,
    last_pts: Option<Pts>,
}

impl PacketSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Build the container packet for `frame`.

        Rescales the frame's microsecond timestamp into the target
        stream's time base in a single rounding step. If the rescaled
        value would step backwards relative to the previous packet of
        the same stream, it is clamped up to that value so delivery
        stays non-decreasing; two microsecond timestamps landing on the
        same coarse tick is routine and must not reorder anything.

        Returns the packet together with its per-stream sequence number.
        The packet borrows the frame's buffer; nothing is copied.
    */
    pub fn prepare<'a>(
        &mut self,
        frame: &EncodedFrame<'a>,
        stream_index: StreamIndex,
        target_time_base: Rational,
    ) -> (ContainerPacket<'a>, u64) {
        let progress = self.progress_mut(frame.stream_type);
        progress.sequence += 1;

        let mut pts = frame.pts.rescale(EncodedFrame::TIME_BASE, target_time_base);
        if let Some(last) = progress.last_pts {
            if pts < last {
                tracing::debug!(
                    kind = ?frame.stream_type,
                    sequence = progress.sequence,
                    pts = pts.0,
                    clamped_to = last.0,
                    "clamping regressing timestamp"
                );
                pts = last;
            }
        }
        progress.last_pts = Some(pts);

        let packet = ContainerPacket {
            stream_index,
            data: frame.data,
            pts,
            is_keyframe: frame.is_keyframe,
            flags: frame.flags,
        };
        (packet, progress.sequence)
    }

    /**
        Number of frames sequenced so far for `kind`.
    */
    pub fn frames_sequenced(&self, kind: StreamType) -> u64 {
        self.progress(kind).sequence
    }

    fn progress(&self, kind: StreamType) -> &StreamProgress {
        match kind {
            StreamType::Video => &self.video,
            StreamType::Audio => &self.audio,
        }
    }

    fn progress_mut(&mut self, kind: StreamType) -> &mut StreamProgress {
        match kind {
            StreamType::Video => &mut self.video,
            StreamType::Audio => &mut self.audio,
        }
    }
}
