use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "overdue";

/// Where overdue keeps its files
pub struct AppDirs;

impl AppDirs {
    fn project() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", APP_NAME)
    }

    pub fn config_path() -> Option<PathBuf> {
        Self::project().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// The TUI log. Uses the state dir where the platform has one.
    pub fn log_path() -> Option<PathBuf> {
        let dirs = Self::project()?;
        let dir = dirs.state_dir().unwrap_or_else(|| dirs.data_local_dir());
        Some(dir.join(format!("{APP_NAME}.log")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_name_the_app() {
        // no home directory means no paths at all
        let (Some(config), Some(log)) = (AppDirs::config_path(), AppDirs::log_path()) else {
            return;
        };

        assert!(config.ends_with("config.json"));
        assert!(log.ends_with("overdue.log"));
        assert!(config.to_string_lossy().contains(APP_NAME));
        assert!(log.to_string_lossy().contains(APP_NAME));
    }
}
