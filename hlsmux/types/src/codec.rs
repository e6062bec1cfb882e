/*!
    Codec identification.
*/

/**
    Codec identifiers.

    This is the subset of codecs that show up on the muxing side of an
    HLS recording pipeline. Hardware encoders on the platforms this
    targets produce H.264 and AAC; the rest are codecs the segmented
    container can carry.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum CodecId {
    // Video codecs
    /// H.264 / AVC
    H264,
    /// H.265 / HEVC
    H265,
    /// MPEG-2 Video
    Mpeg2Video,

    // Audio codecs
    /// AAC (Advanced Audio Coding)
    Aac,
    /// MP3 (MPEG Audio Layer 3)
    Mp3,
    /// AC-3 (Dolby Digital)
    Ac3,
    /// Opus
    Opus,
}

impl CodecId {
    /**
        Returns true if this is a video codec.
    */
    pub const fn is_video(self) -> bool {
        matches!(self, Self::H264 | Self::H265 | Self::Mpeg2Video)
    }

    /**
        Returns true if this is an audio codec.
    */
    pub const fn is_audio(self) -> bool {
        matches!(self, Self::Aac | Self::Mp3 | Self::Ac3 | Self::Opus)
    }

    /**
        Returns true if MPEG-TS based HLS segments can carry this codec.

        Opus has no MPEG-TS mapping in common segmenters.
    */
    pub const fn muxes_into_hls(self) -> bool {
        matches!(
            self,
            Self::H264 | Self::H265 | Self::Mpeg2Video | Self::Aac | Self::Mp3 | Self::Ac3
        )
    }
}
