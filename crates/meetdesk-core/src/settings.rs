use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct Settings {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub camera_id: Option<String>,
    #[serde(default)]
    pub mic_id: Option<String>,
    #[serde(default)]
    pub speaker_id: Option<String>,
}

pub struct SettingsStore {
    settings: Mutex<Settings>,
    file_path: PathBuf,
}

impl SettingsStore {
    pub fn new(data_dir: &str) -> Self {
        let file_path = PathBuf::from(data_dir).join("settings.json");
        let settings = Self::load(&file_path);
        Self {
            settings: Mutex::new(settings),
            file_path,
        }
    }

    pub fn get(&self) -> Settings {
        self.settings.lock().unwrap().clone()
    }

    pub fn set_display_name(&self, name: Option<String>) {
        self.settings.lock().unwrap().display_name = name;
        self.save();
    }

    pub fn set_camera_id(&self, id: Option<String>) {
        self.settings.lock().unwrap().camera_id = id;
        self.save();
    }

    pub fn set_mic_id(&self, id: Option<String>) {
        self.settings.lock().unwrap().mic_id = id;
        self.save();
    }

    pub fn set_speaker_id(&self, id: Option<String>) {
        self.settings.lock().unwrap().speaker_id = id;
        self.save();
    }

    fn save(&self) {
        let settings = self.settings.lock().unwrap().clone();
        if let Some(parent) = self.file_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Ok(json) = serde_json::to_string_pretty(&settings) {
            let _ = std::fs::write(&self.file_path, json);
        }
    }

    fn load(path: &PathBuf) -> Settings {
        match std::fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => Settings::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn new_creates_defaults_when_no_file() {
        let dir = temp_dir();
        let store = SettingsStore::new(dir.path().to_str().unwrap());
        assert_eq!(store.get(), Settings::default());
    }

    #[test]
    fn device_ids_persist() {
        let dir = temp_dir();
        let path = dir.path().to_str().unwrap();
        {
            let store = SettingsStore::new(path);
            store.set_camera_id(Some("cam-1".to_string()));
            store.set_mic_id(Some("mic-1".to_string()));
            store.set_speaker_id(Some("spk-1".to_string()));
        }
        let store = SettingsStore::new(path);
        let s = store.get();
        assert_eq!(s.camera_id, Some("cam-1".to_string()));
        assert_eq!(s.mic_id, Some("mic-1".to_string()));
        assert_eq!(s.speaker_id, Some("spk-1".to_string()));
    }

    #[test]
    fn display_name_can_be_cleared() {
        let dir = temp_dir();
        let store = SettingsStore::new(dir.path().to_str().unwrap());
        store.set_display_name(Some("Alice".to_string()));
        store.set_display_name(None);
        assert_eq!(store.get().display_name, None);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = temp_dir();
        fs::write(dir.path().join("settings.json"), "not json!!!").unwrap();
        let store = SettingsStore::new(dir.path().to_str().unwrap());
        assert_eq!(store.get(), Settings::default());
    }

    #[test]
    fn partial_json_uses_serde_defaults() {
        let dir = temp_dir();
        fs::write(
            dir.path().join("settings.json"),
            r#"{"camera_id":"cam-2"}"#,
        )
        .unwrap();
        let store = SettingsStore::new(dir.path().to_str().unwrap());
        let s = store.get();
        assert_eq!(s.camera_id, Some("cam-2".to_string()));
        assert_eq!(s.mic_id, None);
    }
}
