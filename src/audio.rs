use log::*;
use std::path::Path;

use crate::error::Result;

#[cfg(feature = "audio")]
mod backend {
    use rodio::{Decoder, OutputStream, Sink, Source};
    use std::{fs::File, io::BufReader, path::Path};

    use crate::error::{GameError, Result};

    /// Looping background track. Playback stops when this is dropped.
    pub struct Music {
        _stream: OutputStream,
        _sink: Sink,
    }

    fn audio(e: impl std::fmt::Display) -> GameError {
        GameError::Audio(e.to_string())
    }

    pub fn decode(path: &Path) -> Result<Decoder<BufReader<File>>> {
        let file = File::open(path).map_err(|source| GameError::Io {
            path: path.to_owned(),
            source,
        })?;
        Decoder::new(BufReader::new(file)).map_err(audio)
    }

    pub fn play(path: &Path, volume: f32) -> Result<Music> {
        let source = decode(path)?;
        let (stream, handle) = OutputStream::try_default().map_err(audio)?;
        let sink = Sink::try_new(&handle).map_err(audio)?;
        sink.set_volume(volume);
        sink.append(source.repeat_infinite());
        Ok(Music {
            _stream: stream,
            _sink: sink,
        })
    }
}

#[cfg(not(feature = "audio"))]
mod backend {
    use std::path::Path;

    use crate::error::{GameError, Result};

    pub struct Music;

    pub fn play(_path: &Path, _volume: f32) -> Result<Music> {
        Err(GameError::Audio(
            "built without the `audio` feature".to_owned(),
        ))
    }
}

pub use backend::Music;

pub fn play_music(path: &Path, volume: f32) -> Result<Music> {
    backend::play(path, volume)
}

/// Start the background track if possible. Failures are logged and the
/// game carries on in silence.
pub fn start_music(path: &Path, volume: f32) -> Option<Music> {
    match play_music(path, volume) {
        Ok(music) => {
            info!("Playing {}", path.display());
            Some(music)
        }
        Err(error) => {
            warn!("Could not play music {}: {error}", path.display());
            None
        }
    }
}
