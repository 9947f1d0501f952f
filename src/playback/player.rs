use super::device::{DeviceEvent, DeviceEventReceiver, PlaybackDevice};
use super::queue::PlaybackQueue;
use crate::error::{Error, Result};
use crate::library::Song;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// What happened on the player since the shell last looked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Started(Song),
    Finished(Song),
    DeviceError(String),
}

/// Couples the queue's cursor to a playback device
pub struct Player<D: PlaybackDevice> {
    queue: PlaybackQueue,
    device: D,
    events: DeviceEventReceiver,
    now_playing: Option<Song>,
}

impl<D: PlaybackDevice> Player<D> {
    pub fn new(mut device: D) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        device.attach(tx);

        Self {
            queue: PlaybackQueue::new(),
            device,
            events: rx,
            now_playing: None,
        }
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn now_playing(&self) -> Option<&Song> {
        self.now_playing.as_ref()
    }

    pub fn is_playing(&self) -> bool {
        self.now_playing.is_some() && self.device.is_playing()
    }

    /// Swap in the list the shell is displaying. Whatever is playing keeps playing.
    pub fn set_queue(&mut self, songs: &[Song]) {
        self.queue.set_queue(songs);
    }

    /// Move the cursor without touching the device
    pub fn select(&mut self, index: isize) -> Option<Song> {
        self.queue.play_at(index).cloned()
    }

    /// Select `index` and start it
    pub fn play_at(&mut self, index: isize) -> Result<Option<Song>> {
        match self.select(index) {
            Some(song) => {
                self.start(&song)?;
                Ok(Some(song))
            }
            None => Ok(None),
        }
    }

    /// Play/pause button: a newly selected song starts, the loaded one toggles
    pub fn toggle(&mut self) -> Result<()> {
        let selected = self
            .queue
            .current()
            .cloned()
            .ok_or_else(|| Error::InvalidArgument("no song selected".to_string()))?;

        if self.now_playing.as_ref() != Some(&selected) {
            return self.start(&selected);
        }

        if self.device.is_playing() {
            self.device.pause()?;
            debug!("Paused '{}'", selected.title());
        } else {
            self.device.resume()?;
            debug!("Resumed '{}'", selected.title());
        }
        Ok(())
    }

    pub fn next(&mut self) -> Result<Option<Song>> {
        match self.queue.next().cloned() {
            Some(song) => {
                self.start(&song)?;
                Ok(Some(song))
            }
            None => Ok(None),
        }
    }

    pub fn prev(&mut self) -> Result<Option<Song>> {
        match self.queue.prev().cloned() {
            Some(song) => {
                self.start(&song)?;
                Ok(Some(song))
            }
            None => Ok(None),
        }
    }

    /// Jump within the current song, clamped to its length when known.
    /// Does nothing when no song is loaded.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let Some(song) = &self.now_playing else {
            debug!("Seek ignored, nothing loaded");
            return Ok(());
        };

        let position = match self.device.duration() {
            Some(total) => position.min(total),
            None => position,
        };
        debug!("Seeking '{}' to {:?}", song.title(), position);
        self.device.seek(position)
    }

    /// Elapsed time in the current song
    pub fn position(&self) -> Duration {
        if self.now_playing.is_some() {
            self.device.position()
        } else {
            Duration::ZERO
        }
    }

    /// Length of the current song; `None` when unknown or nothing is loaded
    pub fn duration(&self) -> Option<Duration> {
        self.now_playing.as_ref().and(self.device.duration())
    }

    pub fn stop(&mut self) -> Result<()> {
        self.device.stop()?;
        self.now_playing = None;
        Ok(())
    }

    /// Drain device notifications. A finished track advances to the next one in the queue.
    pub fn poll_events(&mut self) -> Vec<PlayerEvent> {
        let mut out = Vec::new();

        while let Ok(event) = self.events.try_recv() {
            match event {
                DeviceEvent::TrackEnded { song_id } => {
                    let finished = match self.now_playing.take() {
                        Some(song) if song.id() == song_id => song,
                        other => {
                            debug!("Ignoring stale end-of-track for {}", song_id);
                            self.now_playing = other;
                            continue;
                        }
                    };
                    out.push(PlayerEvent::Finished(finished));

                    if let Some(next) = self.queue.next().cloned() {
                        match self.start(&next) {
                            Ok(()) => out.push(PlayerEvent::Started(next)),
                            Err(e) => {
                                warn!("Auto-advance failed: {}", e);
                                out.push(PlayerEvent::DeviceError(e.to_string()));
                            }
                        }
                    }
                }
                DeviceEvent::Error(message) => {
                    warn!("Playback device error: {}", message);
                    self.now_playing = None;
                    out.push(PlayerEvent::DeviceError(message));
                }
            }
        }

        out
    }

    fn start(&mut self, song: &Song) -> Result<()> {
        if !song.path().exists() {
            return Err(Error::FileNotFound(song.path().to_path_buf()));
        }

        self.device.load_and_play(song)?;
        self.now_playing = Some(song.clone());
        info!("Now playing '{}'", song.display_line());
        Ok(())
    }
}
