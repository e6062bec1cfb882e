/*!
    Session configuration types.
*/

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Logical container format handed to the writer at open time.
pub const HLS_FORMAT_NAME: &str = "hls";

/**
    Recording configuration, applied while the session is still idle.

    A width and height of `(0, 0)` disables the video stream entirely;
    the session will then register audio only. Defaults match a 720p
    camera feed with mono microphone audio and ten-second segments.
*/
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingOptions {
    /// Video width in pixels, 0 together with height 0 to disable video.
    pub video_width: u32,
    /// Video height in pixels.
    pub video_height: u32,
    /// Audio sample rate in Hz, 0 to disable audio.
    pub audio_sample_rate: u32,
    /// Number of audio channels.
    pub audio_channel_count: u16,
    /// Target duration of each media segment, in seconds.
    pub segment_duration_seconds: u32,
    /// Number of segments kept in the playlist; 0 keeps every segment.
    pub segment_list_size: u32,
}

impl Default for RecordingOptions {
    fn default() -> Self {
        Self {
            video_width: 1280,
            video_height: 720,
            audio_sample_rate: 44100,
            audio_channel_count: 1,
            segment_duration_seconds: 10,
            segment_list_size: 0,
        }
    }
}

impl RecordingOptions {
    /**
        Set the video dimensions. `(0, 0)` disables the video stream.
    */
    pub fn with_video_size(mut self, width: u32, height: u32) -> Self {
        self.video_width = width;
        self.video_height = height;
        self
    }

    /**
        Disable the video stream.
    */
    pub fn without_video(self) -> Self {
        self.with_video_size(0, 0)
    }

    /**
        Set the audio sample rate and channel count.
    */
    pub fn with_audio(mut self, sample_rate: u32, channels: u16) -> Self {
        self.audio_sample_rate = sample_rate;
        self.audio_channel_count = channels;
        self
    }

    /**
        Set the target segment duration in seconds.
    */
    pub fn with_segment_duration(mut self, seconds: u32) -> Self {
        self.segment_duration_seconds = seconds;
        self
    }

    /**
        Set the playlist retention size. 0 keeps every segment.
    */
    pub fn with_segment_list_size(mut self, size: u32) -> Self {
        self.segment_list_size = size;
        self
    }

    /**
        Whether a video stream should be created for these options.
    */
    pub fn video_enabled(&self) -> bool {
        self.video_width > 0 && self.video_height > 0
    }

    /**
        Whether an audio stream should be created for these options.
    */
    pub fn audio_enabled(&self) -> bool {
        self.audio_sample_rate > 0
    }

    /**
        The segmenter options derived from these recording options.
    */
    pub fn segmenter(&self) -> SegmenterOptions {
        SegmenterOptions {
            segment_duration: Duration::from_secs(u64::from(self.segment_duration_seconds)),
            list_size: self.segment_list_size,
        }
    }
}

/**
    Options forwarded verbatim to the container writer's segmenter.

    Segment rotation and playlist retention are entirely the writer's
    responsibility; the session only carries these through.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmenterOptions {
    /// Target duration of each media segment.
    pub segment_duration: Duration,
    /// Number of segments kept in the playlist; 0 keeps all of them.
    pub list_size: u32,
}

impl Default for SegmenterOptions {
    fn default() -> Self {
        RecordingOptions::default().segmenter()
    }
}

/**
    Filesystem layout for one recording.

    Each recording gets its own directory `<root>/<uuid>/` holding the
    manifest and its media segments, with the manifest named after the
    wall-clock start time so consecutive recordings never collide.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputLocation {
    directory: PathBuf,
    manifest: PathBuf,
}

impl OutputLocation {
    /**
        Allocate a location for a new recording under `root`.

        Does not touch the filesystem; the writer creates the directory
        when the output is opened.
    */
    pub fn new(root: impl AsRef<Path>) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis();
        let directory = root.as_ref().join(Uuid::new_v4().to_string());
        let manifest = directory.join(format!("{millis}.m3u8"));
        Self {
            directory,
            manifest,
        }
    }

    /**
        Directory holding the manifest and media segments.
    */
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /**
        Path of the `.m3u8` manifest the writer produces.
    */
    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }
}
