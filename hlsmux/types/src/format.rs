/*!
    Pixel and sample format types.
*/

/**
    Video pixel formats.

    The subset hardware encoders commonly accept as input. Carried on the
    video stream descriptor so the container can record it; the muxing
    session itself never touches pixel data.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PixelFormat {
    /// Planar YUV 4:2:0, 12bpp (the usual encoder input)
    #[default]
    Yuv420p,
    /// Semi-planar YUV 4:2:0, 12bpp (common hardware surface format)
    Nv12,
    /// Planar YUV 4:2:2, 16bpp
    Yuv422p,
}

/**
    Audio sample formats.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SampleFormat {
    /// Signed 16-bit integer (what platform audio encoders consume)
    #[default]
    S16,
    /// 32-bit floating point, range [-1.0, 1.0]
    F32,
    /// Planar 32-bit floating point
    FltP,
}

impl SampleFormat {
    /**
        Returns the number of bytes per sample.
    */
    pub const fn bytes_per_sample(self) -> usize {
        match self {
            Self::S16 => 2,
            Self::F32 | Self::FltP => 4,
        }
    }
}
