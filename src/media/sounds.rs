//! Sound bank: sound ids -> asset files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::ExportError;
use crate::settings::AudioSettings;
use crate::timeline::SoundId;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundBank {
    assets: BTreeMap<SoundId, PathBuf>,
}

impl SoundBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(audio: &AudioSettings) -> Self {
        Self {
            assets: audio
                .sounds
                .iter()
                .map(|(id, path)| (SoundId::from(id.as_str()), path.clone()))
                .collect(),
        }
    }

    pub fn insert(&mut self, sound: SoundId, path: impl Into<PathBuf>) {
        self.assets.insert(sound, path.into());
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Path for `sound`, checked to exist on disk
    pub fn locate(&self, sound: &SoundId) -> Result<&Path, ExportError> {
        let path = self
            .assets
            .get(sound)
            .ok_or_else(|| ExportError::UnknownSound(sound.to_string()))?;
        if !path.is_file() {
            return Err(ExportError::AssetNotFound {
                sound: sound.to_string(),
                path: path.clone(),
            });
        }
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_sound() {
        let bank = SoundBank::new();
        assert!(matches!(
            bank.locate(&SoundId::from("hit")),
            Err(ExportError::UnknownSound(s)) if s == "hit"
        ));
    }

    #[test]
    fn test_missing_file() {
        let mut bank = SoundBank::new();
        bank.insert(SoundId::from("hit"), "/definitely/not/here.wav");
        let err = bank.locate(&SoundId::from("hit")).unwrap_err();
        assert!(matches!(err, ExportError::AssetNotFound { .. }));
        assert!(err.is_audio_asset_error());
    }

    #[test]
    fn test_existing_file() {
        let path = std::env::temp_dir().join(format!("floorfall-sound-{}.wav", std::process::id()));
        std::fs::write(&path, b"RIFF").expect("write temp asset");
        let mut bank = SoundBank::from_settings(&AudioSettings::with_default_sound(&path));
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.locate(&SoundId::from("hit")).expect("found"), path.as_path());
        bank.insert(SoundId::from("other"), &path);
        assert_eq!(bank.len(), 2);
        let _ = std::fs::remove_file(&path);
    }
}
