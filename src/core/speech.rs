//! Pronunciation download and playback

use reqwest::header::CONTENT_TYPE;
use reqwest::{StatusCode, Url};
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::client::YoudaoClient;
use crate::core::errors::{Result, TranslationError};

/// Prefix of the temporary audio files
const VOICE_FILE_PREFIX: &str = "youdao_translator_voice_";

/// Plays a local audio file
pub trait AudioPlayer: Send + Sync {
    /// Play `path` and return once playback is over; the file is removed afterwards
    fn play(&self, path: &Path) -> anyhow::Result<()>;
}

/// Player that spawns an external program with the file as last argument
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    argv: Vec<String>,
}

impl CommandPlayer {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl AudioPlayer for CommandPlayer {
    fn play(&self, path: &Path) -> anyhow::Result<()> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| anyhow::anyhow!("no audio player configured"))?;

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()?;
        if !status.success() {
            return Err(anyhow::anyhow!("{} exited with {}", program, status));
        }
        Ok(())
    }
}

/// Fetches speech audio from Youdao and hands it to an [`AudioPlayer`]
#[derive(Clone)]
pub struct SpeechClient {
    http: reqwest::Client,
    voice_endpoint: String,
    player: Arc<dyn AudioPlayer>,
}

impl SpeechClient {
    pub fn new(client: &YoudaoClient, player: Arc<dyn AudioPlayer>) -> Self {
        Self {
            http: client.http().clone(),
            voice_endpoint: client.config().voice_endpoint.clone(),
            player,
        }
    }

    /// Download and play `speak_url`; empty or missing URLs are ignored
    ///
    /// Each call gets its own temporary file, kept until playback returns.
    pub async fn speak(&self, speak_url: Option<&str>, text: &str) -> Result<()> {
        let speak_url = match speak_url {
            Some(url) if !url.is_empty() => url,
            _ => {
                debug!("No speak URL, nothing to play");
                return Ok(());
            }
        };

        let audio = self.fetch(speak_url, text).await?;
        info!("Playing {} bytes of audio", audio.len());

        let player = Arc::clone(&self.player);
        tokio::task::spawn_blocking(move || play_audio(player.as_ref(), &audio))
            .await
            .map_err(|e| TranslationError::AudioError {
                message: e.to_string(),
            })?
    }

    /// Audio bytes for `speak_url`, falling back to the dictionary voice endpoint
    ///
    /// The fallback is used when the speak URL does not answer 200 with an
    /// audio content type.
    pub async fn fetch(&self, speak_url: &str, text: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(speak_url)
            .send()
            .await
            .map_err(TranslationError::from_transport)?;

        if response.status() == StatusCode::OK && is_audio(&response) {
            return Ok(response.bytes().await?.to_vec());
        }

        debug!(
            "Speak URL answered {}, falling back to dictionary voice",
            response.status()
        );

        let response = self
            .http
            .get(self.fallback_url(text)?)
            .send()
            .await
            .map_err(TranslationError::from_transport)?;

        if !response.status().is_success() {
            return Err(TranslationError::AudioError {
                message: format!("voice endpoint answered {}", response.status()),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    fn fallback_url(&self, text: &str) -> Result<Url> {
        Url::parse_with_params(&self.voice_endpoint, &[("audio", text)]).map_err(|e| {
            TranslationError::ConfigError {
                message: format!("invalid voice endpoint {}: {}", self.voice_endpoint, e),
            }
        })
    }
}

fn play_audio(player: &dyn AudioPlayer, audio: &[u8]) -> Result<()> {
    let mut file = tempfile::Builder::new()
        .prefix(VOICE_FILE_PREFIX)
        .suffix(".mp3")
        .tempfile()?;
    file.write_all(audio)?;
    file.flush()?;

    player
        .play(file.path())
        .map_err(|e| TranslationError::AudioError {
            message: e.to_string(),
        })
}

fn is_audio(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("audio/"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::TranslatorConfig;
    use std::path::PathBuf;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingPlayer {
        played: Mutex<Vec<PathBuf>>,
    }

    impl AudioPlayer for RecordingPlayer {
        fn play(&self, path: &Path) -> anyhow::Result<()> {
            self.played.lock().unwrap().push(path.to_path_buf());
            Ok(())
        }
    }

    fn speech(player: Arc<RecordingPlayer>) -> SpeechClient {
        let config = Arc::new(TranslatorConfig {
            app_key: "key".to_string(),
            app_secret: "secret".to_string(),
            ..Default::default()
        });
        let client = YoudaoClient::new(config).unwrap();
        SpeechClient::new(&client, player)
    }

    #[test]
    fn test_fallback_url_encodes_text() {
        let speech = speech(Arc::new(RecordingPlayer::default()));
        let url = speech.fallback_url("good morning").unwrap();
        assert_eq!(url.host_str(), Some("dict.youdao.com"));
        assert_eq!(url.path(), "/dictvoice");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs, vec![("audio".to_string(), "good morning".to_string())]);
    }

    #[tokio::test]
    async fn test_missing_speak_url_is_noop() {
        let player = Arc::new(RecordingPlayer::default());
        let speech = speech(player.clone());
        speech.speak(None, "hello").await.unwrap();
        speech.speak(Some(""), "hello").await.unwrap();
        assert!(player.played.lock().unwrap().is_empty());
    }

    /// Keeps what was on disk at playback time
    #[derive(Default)]
    struct SnapshotPlayer {
        files: Mutex<Vec<(PathBuf, Vec<u8>)>>,
    }

    impl AudioPlayer for SnapshotPlayer {
        fn play(&self, path: &Path) -> anyhow::Result<()> {
            let bytes = std::fs::read(path)?;
            self.files.lock().unwrap().push((path.to_path_buf(), bytes));
            Ok(())
        }
    }

    #[test]
    fn test_each_playback_gets_its_own_file() {
        let player = SnapshotPlayer::default();
        play_audio(&player, b"original").unwrap();
        play_audio(&player, b"translation").unwrap();

        let files = player.files.lock().unwrap();
        assert_eq!(files[0].1, b"original");
        assert_eq!(files[1].1, b"translation");
        assert_ne!(files[0].0, files[1].0);
        assert!(!files[0].0.exists());
    }

    #[test]
    fn test_failed_playback_is_audio_error() {
        let player = CommandPlayer::new(vec!["false".to_string()]);
        let err = play_audio(&player, b"audio").unwrap_err();
        assert!(matches!(err, TranslationError::AudioError { .. }));
    }

    #[test]
    fn test_command_player_without_program() {
        let player = CommandPlayer::new(Vec::new());
        assert!(player.play(Path::new("/tmp/none.mp3")).is_err());
    }
}
