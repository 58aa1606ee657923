use std::fmt;
use std::sync::Arc;

use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

use crate::connection::MediaStream;

pub type LocalTrack = Arc<dyn TrackLocal + Send + Sync>;

/// Locally captured tracks published under one stream id.
#[derive(Clone)]
pub struct LocalMedia {
    id: String,
    tracks: Vec<LocalTrack>,
}

impl LocalMedia {
    pub fn new(id: impl Into<String>, tracks: Vec<LocalTrack>) -> Self {
        Self {
            id: id.into(),
            tracks,
        }
    }
}

impl MediaStream for LocalMedia {
    type Track = LocalTrack;

    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<LocalTrack> {
        self.tracks.clone()
    }
}

impl fmt::Debug for LocalMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalMedia")
            .field("id", &self.id)
            .field("tracks", &self.tracks.len())
            .finish()
    }
}

/// A remote track together with the stream id the remote side assigned to it.
#[derive(Clone)]
pub struct RemoteMedia {
    id: String,
    track: Arc<TrackRemote>,
}

impl RemoteMedia {
    pub fn new(track: Arc<TrackRemote>) -> Self {
        Self {
            id: track.stream_id(),
            track,
        }
    }

    pub fn track(&self) -> &Arc<TrackRemote> {
        &self.track
    }
}

impl MediaStream for RemoteMedia {
    type Track = Arc<TrackRemote>;

    fn id(&self) -> &str {
        &self.id
    }

    fn tracks(&self) -> Vec<Arc<TrackRemote>> {
        vec![self.track.clone()]
    }
}

impl fmt::Debug for RemoteMedia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteMedia")
            .field("id", &self.id)
            .field("track", &self.track.id())
            .finish()
    }
}
