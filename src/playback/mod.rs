// Playback - queue navigation plus the glue to whatever device makes the sound

pub mod device;  // device trait + event channel
pub mod player;  // queue <-> device coordination
pub mod queue;   // pure cursor over the displayed list

#[cfg(feature = "audio")]
pub mod rodio_device;

pub use device::{DeviceEvent, NullDevice, PlaybackDevice};
pub use player::{Player, PlayerEvent};
pub use queue::{PlaybackQueue, QueueState};

#[cfg(feature = "audio")]
pub use rodio_device::RodioDevice;
