// rodio-backed device - only compiled with the `audio` feature

use super::device::{DeviceEvent, DeviceEventSender, PlaybackDevice};
use crate::error::{Error, Result};
use crate::library::Song;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

pub struct RodioDevice {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sink: Option<Arc<Sink>>,
    // decoder's estimate, not every format reports one
    total: Option<Duration>,
    volume: f32,
    events: Option<DeviceEventSender>,
    // bumped on every load/stop so old watcher threads stay quiet
    generation: Arc<AtomicU64>,
}

impl RodioDevice {
    pub fn new(volume: f32) -> Result<Self> {
        let (stream, stream_handle) =
            OutputStream::try_default().map_err(|e| Error::Device(e.to_string()))?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sink: None,
            total: None,
            volume: volume.clamp(0.0, 1.0),
            events: None,
            generation: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
        if let Some(sink) = &self.sink {
            sink.set_volume(self.volume);
        }
    }

    fn watch(&self, sink: Arc<Sink>, song_id: String) {
        let Some(events) = self.events.clone() else {
            return;
        };
        let generation = Arc::clone(&self.generation);
        let started_at = generation.load(Ordering::SeqCst);

        thread::spawn(move || {
            sink.sleep_until_end();
            if generation.load(Ordering::SeqCst) == started_at {
                let _ = events.send(DeviceEvent::TrackEnded { song_id });
            }
        });
    }

    fn report(&self, message: String) {
        if let Some(events) = &self.events {
            let _ = events.send(DeviceEvent::Error(message));
        }
    }
}

impl PlaybackDevice for RodioDevice {
    fn attach(&mut self, events: DeviceEventSender) {
        self.events = Some(events);
    }

    fn load_and_play(&mut self, song: &Song) -> Result<()> {
        self.stop()?;

        let file = File::open(song.path())?;
        let source = match Decoder::new(BufReader::new(file)) {
            Ok(source) => source,
            Err(e) => {
                let message = format!("cannot decode '{}': {}", song.path().display(), e);
                self.report(message.clone());
                return Err(Error::Device(message));
            }
        };

        let total = source.total_duration();
        let sink = Sink::try_new(&self.stream_handle).map_err(|e| Error::Device(e.to_string()))?;
        sink.set_volume(self.volume);
        sink.append(source);

        let sink = Arc::new(sink);
        self.watch(Arc::clone(&sink), song.id().to_string());
        self.sink = Some(sink);
        self.total = total;

        debug!("rodio playing {}", song.path().display());
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        if let Some(sink) = &self.sink {
            sink.play();
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.total = None;
        Ok(())
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|sink| !sink.is_paused() && !sink.empty())
            .unwrap_or(false)
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        match &self.sink {
            Some(sink) => sink
                .try_seek(position)
                .map_err(|e| Error::Device(format!("seek failed: {}", e))),
            None => Ok(()),
        }
    }

    fn position(&self) -> Duration {
        self.sink
            .as_ref()
            .map(|sink| sink.get_pos())
            .unwrap_or(Duration::ZERO)
    }

    fn duration(&self) -> Option<Duration> {
        self.sink.as_ref().and(self.total)
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop rodio sink: {}", e);
        }
    }
}
