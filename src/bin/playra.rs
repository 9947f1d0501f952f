use anyhow::Result;
use clap::{Parser, Subcommand};
use playra::{config::Config, Session, Song, View};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "playra")]
#[command(about = "Local music library manager with playlists and crash-safe persistence")]
struct Args {
    /// Enable developer logging (stderr + debug output)
    #[arg(long)]
    dev: bool,

    /// Use this config file instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import a folder (or the configured music directories)
    Import { dir: Option<PathBuf> },
    /// List library songs, optionally filtered
    Songs { query: Option<String> },
    /// List playlists
    Playlists,
    /// Playlist management
    #[command(subcommand)]
    Playlist(PlaylistCommand),
    /// Forget every song (playlists are kept)
    Reset,
    /// Play songs from the library or a playlist
    #[cfg(feature = "audio")]
    Play {
        #[arg(long)]
        playlist: Option<String>,
        #[arg(default_value_t = 0)]
        index: isize,
    },
}

#[derive(Subcommand)]
enum PlaylistCommand {
    Create { name: String },
    Delete { name: String },
    Add { name: String, song_id: String },
    Remove { name: String, song_id: String },
    Show { name: String, query: Option<String> },
}

fn init_logging(config: &Config, dev: bool) -> Result<()> {
    let log_dir = &config.logging.directory;
    std::fs::create_dir_all(log_dir)?;

    // Daily rotating file appender
    let file_appender = tracing_appender::rolling::daily(log_dir, "playra.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let base_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(base_filter);

    if dev {
        let subscriber = builder
            .with_writer(file_writer.and(std::io::stderr))
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = builder.with_writer(file_writer).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    // Keep the background writer alive for the whole process
    std::mem::forget(guard);

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    init_logging(&config, args.dev)?;
    info!("playra starting up");

    let mut session = Session::open(&config);
    debug!("Store at {}", session.store().path().display());

    match args.command {
        Command::Import { dir } => {
            let dirs = match dir {
                Some(dir) => vec![dir],
                None => config.resolved_music_directories(),
            };
            for dir in dirs {
                let added = session.import_folder(&dir)?;
                if added == 0 {
                    println!("No new supported audio files found in: {}", dir.display());
                } else {
                    println!(
                        "Added {} song(s) from: {} (Total: {})",
                        added,
                        dir.display(),
                        session.library().len()
                    );
                }
            }
        }
        Command::Songs { query } => {
            print_songs(&session.view(&View::Library, query.as_deref().unwrap_or(""))?);
        }
        Command::Playlists => {
            for name in session.playlists().playlists() {
                let count = session.playlists().song_ids(&name)?.len();
                println!("{} ({} song(s))", name, count);
            }
        }
        Command::Playlist(cmd) => run_playlist_command(&mut session, cmd)?,
        Command::Reset => {
            session.clear_library()?;
            println!("Library cleared. Import a folder to add songs again.");
        }
        #[cfg(feature = "audio")]
        Command::Play { playlist, index } => {
            let view = match playlist {
                Some(name) => View::Playlist(name),
                None => View::Library,
            };
            play(&session.view(&view, "")?, index)?;
        }
    }

    Ok(())
}

fn run_playlist_command(session: &mut Session, cmd: PlaylistCommand) -> Result<()> {
    match cmd {
        PlaylistCommand::Create { name } => {
            session.create_playlist(&name)?;
            println!("Created playlist: {}", name.trim());
        }
        PlaylistCommand::Delete { name } => {
            session.delete_playlist(&name)?;
            println!("Deleted playlist: {}", name.trim());
        }
        PlaylistCommand::Add { name, song_id } => {
            session.add_to_playlist(&name, &song_id)?;
            println!("Added to {}", name.trim());
        }
        PlaylistCommand::Remove { name, song_id } => {
            session.remove_from_playlist(&name, &song_id)?;
            println!("Removed from {}", name.trim());
        }
        PlaylistCommand::Show { name, query } => {
            let view = View::Playlist(name);
            print_songs(&session.view(&view, query.as_deref().unwrap_or(""))?);
        }
    }
    Ok(())
}

fn print_songs(songs: &[Song]) {
    if songs.is_empty() {
        println!("(no songs)");
        return;
    }
    for (i, song) in songs.iter().enumerate() {
        println!("{:>3}. {}  [{}]", i, song.display_line(), song.id());
        println!("     {} / {}", song.album(), song.path().display());
    }
}

#[cfg(feature = "audio")]
fn play(songs: &[Song], index: isize) -> Result<()> {
    use playra::playback::{Player, PlayerEvent, RodioDevice};
    use std::time::Duration;

    let mut player = Player::new(RodioDevice::new(0.7)?);
    player.set_queue(songs);

    if player.play_at(index)?.is_none() {
        println!("Nothing to play at index {}", index);
        return Ok(());
    }

    while player.now_playing().is_some() {
        if let Some(song) = player.now_playing() {
            debug!("Playing {} at {}", song.display_line(), clock(player.position()));
        }
        for event in player.poll_events() {
            match event {
                PlayerEvent::Started(song) => match player.duration() {
                    Some(total) => println!("▶ {} ({})", song.display_line(), clock(total)),
                    None => println!("▶ {}", song.display_line()),
                },
                PlayerEvent::Finished(song) => println!("■ {}", song.display_line()),
                PlayerEvent::DeviceError(message) => println!("Playback error: {}", message),
            }
        }
        std::thread::sleep(Duration::from_millis(250));
    }

    Ok(())
}

#[cfg(feature = "audio")]
fn clock(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
