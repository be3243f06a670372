use std::path::PathBuf;

const APP_DIR: &str = "sight_detect";
const MODELS_DIR: &str = "models";

/// Per-user locations the detector reads models and labels from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAccess {
    Cache,
    Config,
}

impl FsAccess {
    /// `~/.cache/sight_detect/models` on Linux. Not created here; a missing model file
    /// surfaces as a load error.
    pub fn models_dir() -> anyhow::Result<PathBuf> {
        Ok(Self::Cache.app_dir()?.join(MODELS_DIR))
    }

    /// Platform base directory with the app subdirectory appended.
    pub fn app_dir(&self) -> anyhow::Result<PathBuf> {
        let base = match self {
            FsAccess::Cache => dirs::cache_dir(),
            FsAccess::Config => dirs::config_dir(),
        };
        let base = base.ok_or_else(|| anyhow::anyhow!("No {self:?} directory on this platform"))?;
        Ok(base.join(APP_DIR))
    }

    /// `app_dir()/<subs...>`, created if missing.
    pub fn ensure_dir(&self, subs: &[&str]) -> anyhow::Result<PathBuf> {
        let dir = subs.iter().fold(self.app_dir()?, |d, sub| d.join(sub));
        std::fs::create_dir_all(&dir)?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_dir_sits_under_app_cache() {
        if let Ok(dir) = FsAccess::models_dir() {
            assert!(dir.ends_with("sight_detect/models"));
        }
    }

    #[test]
    fn config_dir_is_app_scoped() {
        if let Ok(dir) = FsAccess::Config.app_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
