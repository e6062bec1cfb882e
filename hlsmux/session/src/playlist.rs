/*!
    HLS media playlist parsing and segment tracking.

    The container writer rewrites the `.m3u8` manifest every time a
    segment completes. Callers that want to react to that — uploading
    segments, announcing that a stream went live — watch the manifest
    file and feed each new snapshot through a [`PlaylistTracker`], which
    turns the diff into discrete [`SegmentEvent`]s. Correct under the
    writer's rolling retention: segments that fell out of the window are
    accounted for through `#EXT-X-MEDIA-SEQUENCE`.
*/

/**
    A parsed HLS media playlist.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct MediaPlaylist {
    /// `#EXT-X-TARGETDURATION`, if present.
    pub target_duration: Option<u32>,
    /// `#EXT-X-MEDIA-SEQUENCE` — sequence number of the first listed
    /// segment. Defaults to 0 when absent.
    pub media_sequence: u64,
    /// Whether `#EXT-X-ENDLIST` was present.
    pub ended: bool,
    /// The listed segments, oldest first.
    pub segments: Vec<SegmentEntry>,
}

/**
    One segment entry of a media playlist.
*/
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentEntry {
    /// Segment URI as written in the manifest.
    pub uri: String,
    /// Declared duration in seconds (`#EXTINF`).
    pub duration_secs: f64,
}

/**
    Playlist parse failure.
*/
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlaylistError {
    #[error("not a media playlist: missing #EXTM3U header")]
    MissingHeader,
    #[error("malformed {tag} on line {line}: {text:?}")]
    MalformedTag {
        tag: &'static str,
        line: usize,
        text: String,
    },
}

impl MediaPlaylist {
    /**
        Parse a media playlist from manifest text.

        Unknown tags are skipped; segmenters emit plenty of tags this
        tracker has no use for.
    */
    pub fn parse(text: &str) -> Result<Self, PlaylistError> {
        let mut lines = text
            .lines()
            .map(str::trim)
            .enumerate()
            .filter(|(_, line)| !line.is_empty());

        match lines.next() {
            Some((_, "#EXTM3U")) => {}
            _ => return Err(PlaylistError::MissingHeader),
        }

        let mut playlist = Self {
            target_duration: None,
            media_sequence: 0,
            ended: false,
            segments: Vec::new(),
        };
        let mut pending_duration: Option<f64> = None;

        for (index, line) in lines {
            let line_no = index + 1;
            if let Some(value) = line.strip_prefix("#EXT-X-TARGETDURATION:") {
                playlist.target_duration =
                    Some(value.trim().parse().map_err(|_| PlaylistError::MalformedTag {
                        tag: "#EXT-X-TARGETDURATION",
                        line: line_no,
                        text: line.to_owned(),
                    })?);
            } else if let Some(value) = line.strip_prefix("#EXT-X-MEDIA-SEQUENCE:") {
                playlist.media_sequence =
                    value.trim().parse().map_err(|_| PlaylistError::MalformedTag {
                        tag: "#EXT-X-MEDIA-SEQUENCE",
                        line: line_no,
                        text: line.to_owned(),
                    })?;
            } else if let Some(value) = line.strip_prefix("#EXTINF:") {
                let duration = value.split(',').next().unwrap_or("").trim();
                pending_duration =
                    Some(duration.parse().map_err(|_| PlaylistError::MalformedTag {
                        tag: "#EXTINF",
                        line: line_no,
                        text: line.to_owned(),
                    })?);
            } else if line == "#EXT-X-ENDLIST" {
                playlist.ended = true;
            } else if !line.starts_with('#') {
                // URI line; belongs to the preceding #EXTINF.
                playlist.segments.push(SegmentEntry {
                    uri: line.to_owned(),
                    duration_secs: pending_duration.take().unwrap_or(0.0),
                });
            }
        }

        Ok(playlist)
    }
}

/**
    Event produced by comparing successive manifest snapshots.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum SegmentEvent {
    /// A segment not seen in any earlier snapshot finished writing.
    SegmentComplete {
        /// Absolute sequence number of the segment within the recording.
        sequence: u64,
        uri: String,
        duration_secs: f64,
    },
    /// The manifest gained `#EXT-X-ENDLIST`; the recording is over.
    PlaylistEnded,
}

/**
    Stateful diff over manifest snapshots of one recording.
*/
#[derive(Debug, Default)]
pub struct PlaylistTracker {
    next_sequence: u64,
    ended: bool,
}

impl PlaylistTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Record a new manifest snapshot, returning one event per newly
        completed segment (oldest first) plus [`SegmentEvent::PlaylistEnded`]
        the first time the end tag appears.
    */
    pub fn update(&mut self, playlist: &MediaPlaylist) -> Vec<SegmentEvent> {
        let mut events = Vec::new();
        for (offset, segment) in playlist.segments.iter().enumerate() {
            let sequence = playlist.media_sequence + offset as u64;
            if sequence >= self.next_sequence {
                events.push(SegmentEvent::SegmentComplete {
                    sequence,
                    uri: segment.uri.clone(),
                    duration_secs: segment.duration_secs,
                });
                self.next_sequence = sequence + 1;
            }
        }
        if playlist.ended && !self.ended {
            self.ended = true;
            events.push(SegmentEvent::PlaylistEnded);
        }
        events
    }

    /**
        Total number of segments seen so far.
    */
    pub fn segments_seen(&self) -> u64 {
        self.next_sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIVE: &str = "\
#EXTM3U
#EXT-X-VERSION:3
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:0
#EXTINF:10.0,
seg000.ts
#EXTINF:9.5,
seg001.ts
";

    #[test]
    fn parses_a_live_manifest() {
        let playlist = MediaPlaylist::parse(LIVE).unwrap();
        assert_eq!(playlist.target_duration, Some(10));
        assert_eq!(playlist.media_sequence, 0);
        assert!(!playlist.ended);
        assert_eq!(playlist.segments.len(), 2);
        assert_eq!(playlist.segments[0].uri, "seg000.ts");
        assert_eq!(playlist.segments[1].duration_secs, 9.5);
    }

    #[test]
    fn missing_header_is_an_error() {
        assert_eq!(
            MediaPlaylist::parse("#EXT-X-TARGETDURATION:10\n"),
            Err(PlaylistError::MissingHeader)
        );
    }

    #[test]
    fn malformed_extinf_is_an_error() {
        let text = "#EXTM3U\n#EXTINF:abc,\nseg0.ts\n";
        assert!(matches!(
            MediaPlaylist::parse(text),
            Err(PlaylistError::MalformedTag {
                tag: "#EXTINF",
                ..
            })
        ));
    }

    #[test]
    fn ended_manifest() {
        let text = "#EXTM3U\n#EXTINF:4.0,\nseg0.ts\n#EXT-X-ENDLIST\n";
        let playlist = MediaPlaylist::parse(text).unwrap();
        assert!(playlist.ended);
    }

    #[test]
    fn tracker_reports_each_segment_once() {
        let mut tracker = PlaylistTracker::new();
        let first = MediaPlaylist::parse(LIVE).unwrap();
        let events = tracker.update(&first);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            SegmentEvent::SegmentComplete {
                sequence: 0,
                uri: "seg000.ts".into(),
                duration_secs: 10.0
            }
        );

        // Same snapshot again: nothing new.
        assert!(tracker.update(&first).is_empty());
        assert_eq!(tracker.segments_seen(), 2);
    }

    #[test]
    fn tracker_handles_rolling_retention() {
        let mut tracker = PlaylistTracker::new();
        tracker.update(&MediaPlaylist::parse(LIVE).unwrap());

        // The window slid: seg000 fell out, seg002 arrived.
        let rolled = "\
#EXTM3U
#EXT-X-TARGETDURATION:10
#EXT-X-MEDIA-SEQUENCE:1
#EXTINF:9.5,
seg001.ts
#EXTINF:10.0,
seg002.ts
";
        let events = tracker.update(&MediaPlaylist::parse(rolled).unwrap());
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0],
            SegmentEvent::SegmentComplete {
                sequence: 2,
                uri: "seg002.ts".into(),
                duration_secs: 10.0
            }
        );
    }

    #[test]
    fn tracker_reports_end_exactly_once() {
        let mut tracker = PlaylistTracker::new();
        let ended = MediaPlaylist::parse("#EXTM3U\n#EXTINF:4.0,\nseg0.ts\n#EXT-X-ENDLIST\n").unwrap();
        let events = tracker.update(&ended);
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], SegmentEvent::PlaylistEnded);
        assert!(tracker.update(&ended).is_empty());
    }
}
