use clap::ValueEnum;
use dirs::{config_dir, data_dir};
use log::info;
use reqwest::get;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not download {url}: {source}")]
    Download { url: String, source: reqwest::Error },
    #[error("could not write {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not find data dir")]
    NoDataDir,
}

/// What to do with a word-list token longer than the maximum word length.
#[derive(Debug, Default, Deserialize, ValueEnum, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OversizedPolicy {
    /// Skip the token.
    #[default]
    Reject,
    /// Keep only its leading characters.
    Truncate,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,
    /// Where to fetch the dictionary from when it is not on disk.
    #[serde(default)]
    pub dictionary_url: Option<String>,
    #[serde(default)]
    pub oversized: OversizedPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            dictionary_url: None,
            oversized: OversizedPolicy::default(),
        }
    }
}

fn default_dictionary() -> PathBuf {
    PathBuf::from("dictionaries/small")
}

pub fn default_config_path() -> Option<PathBuf> {
    let mut path = config_dir()?;
    path.push("speller");
    path.push("config.json");
    Some(path)
}

impl Config {
    /// Reads the config at `path`, or the default location when `None`.
    ///
    /// A missing file at the default location yields the defaults; an
    /// explicitly requested file must exist.
    pub async fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(p) => expand_tilde(p).unwrap_or_else(|| p.to_path_buf()),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Config::default()),
            },
        };

        let text = fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
        let config = Config::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        info!("using config {:?}", path);
        Ok(config)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Config> {
        serde_json::from_str(text)
    }

    /// Returns a path the word list can be loaded from.
    ///
    /// A `requested` path is returned as given, whether or not it exists.
    /// Otherwise the configured dictionary is used; when it is not on disk
    /// and a `dictionary_url` is configured, the list is downloaded once into
    /// the data dir.
    pub async fn resolve_dictionary(
        &self,
        requested: Option<&Path>,
    ) -> Result<PathBuf, ConfigError> {
        if let Some(path) = requested {
            return Ok(expand_tilde(path).unwrap_or_else(|| path.to_path_buf()));
        }

        let path = expand_tilde(&self.dictionary).unwrap_or_else(|| self.dictionary.clone());
        if path.exists() {
            return Ok(path);
        }
        let Some(url) = &self.dictionary_url else {
            return Ok(path);
        };

        let data_dir = data_dir().ok_or(ConfigError::NoDataDir)?.join("speller");
        fetch_dictionary(&path, url, &data_dir).await
    }
}

async fn fetch_dictionary(
    path: &Path,
    url: &str,
    data_dir: &Path,
) -> Result<PathBuf, ConfigError> {
    ensure_directory(data_dir).await?;
    let file_name = path.file_name().unwrap_or("dictionary".as_ref());
    let cached = data_dir.join(file_name);
    download_if_not_exists(&cached, url).await?;
    Ok(cached)
}

async fn download_if_not_exists(buf: &Path, url: &str) -> Result<(), ConfigError> {
    if buf.exists() {
        return Ok(());
    };
    info!("downloading {} to {:?}", url, buf);
    let download_err = |source| ConfigError::Download {
        url: url.to_string(),
        source,
    };
    let response = get(url)
        .await
        .and_then(|r| r.error_for_status())
        .map_err(download_err)?;
    let bytes = response.bytes().await.map_err(download_err)?;

    let io_err = |source| ConfigError::Io {
        path: buf.to_path_buf(),
        source,
    };
    let mut file = fs::File::create(buf).await.map_err(io_err)?;
    file.write_all(&bytes).await.map_err(io_err)?;
    file.flush().await.map_err(io_err)
}

async fn ensure_directory(path: &Path) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    fs::create_dir_all(path)
        .await
        .map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub fn expand_tilde<P: AsRef<Path>>(path_user_input: P) -> Option<PathBuf> {
    let p = path_user_input.as_ref();
    if !p.starts_with("~") {
        return Some(p.to_path_buf());
    }
    if p == Path::new("~") {
        return dirs::home_dir();
    }
    let rest = p.strip_prefix("~").ok()?;
    dirs::home_dir().map(|h| h.join(rest))
}
