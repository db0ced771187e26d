//! Sound source resolution.
//!
//! A ringtone either plays a bundled asset file or a synthesized system tone.
//! Assets are looked up in an [`AssetLibrary`] directory; a missing asset is
//! never an error, it simply resolves to the ringtone's system tone.

use std::path::{Component, Path, PathBuf};

use super::error::SoundError;
use super::ringtone::Ringtone;

/// Represents the source of a sound to be played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A bundled audio file.
    Asset {
        /// The asset file name (e.g., "bell.wav").
        name: String,
        /// The full path to the file.
        path: PathBuf,
    },
    /// A synthesized platform tone.
    System {
        /// The system-sound identifier.
        id: u32,
    },
}

impl SoundSource {
    /// Creates a new system tone source.
    #[must_use]
    pub fn system(id: u32) -> Self {
        Self::System { id }
    }

    /// Resolves the source a ringtone should play.
    ///
    /// Ringtones without an asset, or whose asset is absent from the library,
    /// resolve to their system tone.
    #[must_use]
    pub fn for_ringtone(ringtone: &Ringtone, library: &AssetLibrary) -> Self {
        ringtone
            .asset
            .and_then(|name| library.locate(name).ok())
            .unwrap_or(Self::System {
                id: ringtone.system_sound_id,
            })
    }

    /// Returns true if this is a bundled asset.
    #[must_use]
    pub fn is_asset(&self) -> bool {
        matches!(self, Self::Asset { .. })
    }

    /// Returns true if this is a system tone.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// Returns the file path if this is an asset.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Asset { path, .. } => Some(path),
            Self::System { .. } => None,
        }
    }
}

/// Supported audio file extensions.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "ogg", "caf", "aiff"];

/// Directory holding bundled audio assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLibrary {
    dir: PathBuf,
}

impl AssetLibrary {
    /// Creates a library rooted at `dir`. The directory need not exist.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The default location, `<data dir>/countdown/sounds`.
    #[must_use]
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("countdown")
            .join("sounds")
    }

    /// Returns the library root.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Locates an asset by file name.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::AssetNotFound` if the name is not a plain file
    /// name with a supported extension, or if the file does not exist.
    pub fn locate(&self, name: &str) -> Result<SoundSource, SoundError> {
        validate_asset_name(name)?;

        let path = self.dir.join(name);
        if !path.is_file() {
            return Err(SoundError::AssetNotFound(path.display().to_string()));
        }

        Ok(SoundSource::Asset {
            name: name.to_string(),
            path,
        })
    }
}

impl Default for AssetLibrary {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

fn validate_asset_name(name: &str) -> Result<(), SoundError> {
    let path = Path::new(name);
    let mut components = path.components();
    let plain = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !plain {
        return Err(SoundError::AssetNotFound(format!(
            "'{}' is not a plain asset file name",
            name
        )));
    }

    let supported = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()));
    if !supported {
        return Err(SoundError::AssetNotFound(format!(
            "'{}' has an unsupported extension",
            name
        )));
    }

    Ok(())
}
