use crate::error::Result;
use crate::library::Song;
use std::time::Duration;
use tokio::sync::mpsc;

/// What a playback device reports back, asynchronously, about the track it holds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// The loaded track played to the end on its own
    TrackEnded { song_id: String },
    Error(String),
}

pub type DeviceEventSender = mpsc::UnboundedSender<DeviceEvent>;
pub type DeviceEventReceiver = mpsc::UnboundedReceiver<DeviceEvent>;

/// Whatever actually turns a file into sound.
///
/// The engine only tells it which song to play; completion and failures come back
/// as `DeviceEvent`s on the channel handed over in `attach`.
pub trait PlaybackDevice {
    fn attach(&mut self, events: DeviceEventSender);

    /// Stop whatever is loaded and start `song` from the beginning
    fn load_and_play(&mut self, song: &Song) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn resume(&mut self) -> Result<()>;

    fn stop(&mut self) -> Result<()>;

    fn is_playing(&self) -> bool;

    /// Jump within the loaded track; a no-op when nothing is loaded
    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Elapsed time in the loaded track, zero when nothing is loaded
    fn position(&self) -> Duration;

    /// Total length of the loaded track, if the device knows it
    fn duration(&self) -> Option<Duration>;
}

/// Device that plays nothing; handy for headless runs
#[derive(Debug, Default)]
pub struct NullDevice {
    events: Option<DeviceEventSender>,
    loaded: Option<String>,
    playing: bool,
    position: Duration,
}

impl NullDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the loaded track just finished
    pub fn finish_track(&mut self) {
        if let (Some(events), Some(song_id)) = (&self.events, self.loaded.take()) {
            self.playing = false;
            self.position = Duration::ZERO;
            let _ = events.send(DeviceEvent::TrackEnded { song_id });
        }
    }
}

impl PlaybackDevice for NullDevice {
    fn attach(&mut self, events: DeviceEventSender) {
        self.events = Some(events);
    }

    fn load_and_play(&mut self, song: &Song) -> Result<()> {
        self.loaded = Some(song.id().to_string());
        self.playing = true;
        self.position = Duration::ZERO;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        self.playing = self.loaded.is_some();
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.loaded = None;
        self.playing = false;
        self.position = Duration::ZERO;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        if self.loaded.is_some() {
            self.position = position;
        }
        Ok(())
    }

    fn position(&self) -> Duration {
        self.position
    }

    fn duration(&self) -> Option<Duration> {
        None
    }
}
