//! The two folders chronicler works with: its own state directory and the
//! content root topics are read from.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::{
    config_db::{CONTENT_ROOT, ConfigDb},
    error::{Error, Result},
};

/// Overrides the state directory when `--data-dir` is not given.
pub const DATA_DIR_ENV: &str = "CHRONICLER_DATA_DIR";

/// Where a location was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// A command-line flag.
    Flag,
    /// The [`DATA_DIR_ENV`] variable.
    Env,
    /// The XDG data home.
    Xdg,
    /// The configuration database.
    Stored,
}

/// State directory holding `config.redb`.
#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
    origin: Origin,
}

impl DataDir {
    /// `--data-dir`, then [`DATA_DIR_ENV`], then `$XDG_DATA_HOME/chronicler`.
    /// The directory is created if missing.
    pub fn resolve(flag: Option<&Path>) -> Result<Self> {
        let env = std::env::var_os(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);
        Self::resolve_from(flag, env)
    }

    fn resolve_from(flag: Option<&Path>, env: Option<PathBuf>) -> Result<Self> {
        let (root, origin) = match (flag, env) {
            (Some(path), _) => (path.to_path_buf(), Origin::Flag),
            (None, Some(path)) => (path, Origin::Env),
            (None, None) => {
                let home = xdg::BaseDirectories::with_prefix("chronicler")
                    .get_data_home()
                    .ok_or_else(|| {
                        Error::Config("cannot determine XDG data home".into())
                    })?;
                (home, Origin::Xdg)
            }
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;
        Ok(Self { root, origin })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn config_db(&self) -> PathBuf {
        self.root.join("config.redb")
    }
}

/// Folder a build ingests topics from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRoot {
    pub path: PathBuf,
    pub origin: Origin,
}

impl ContentRoot {
    /// `--root` wins over the folder saved by [`ContentRoot::store`].
    pub fn resolve(flag: Option<&Path>, config_db: &ConfigDb) -> Result<Self> {
        if let Some(path) = flag {
            return Ok(Self {
                path: path.to_path_buf(),
                origin: Origin::Flag,
            });
        }
        Self::stored(config_db)?.ok_or_else(|| {
            Error::Config(
                "no content root: pass --root or run `config set-root`".into(),
            )
        })
    }

    /// The saved content root, if any.
    pub fn stored(config_db: &ConfigDb) -> Result<Option<Self>> {
        Ok(config_db.get_setting(CONTENT_ROOT)?.map(|path| Self {
            path: PathBuf::from(path),
            origin: Origin::Stored,
        }))
    }

    /// Save `path` as the default content root. It must be an existing
    /// directory and is stored in canonical form.
    pub fn store(config_db: &ConfigDb, path: &Path) -> Result<Self> {
        if !path.is_dir() {
            return Err(Error::Config(format!(
                "not a directory: {}",
                path.display()
            )));
        }
        let path = path
            .canonicalize()
            .map_err(|e| Error::file_access(path, e))?;
        config_db.set_setting(CONTENT_ROOT, &path.to_string_lossy())?;
        Ok(Self {
            path,
            origin: Origin::Stored,
        })
    }
}
