use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the tracing log goes while the terminal is in raw mode
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("fitts");
            Some(state_dir.join("fitts.log"))
        } else {
            ProjectDirs::from("", "", "fitts")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("fitts.log"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_path_ends_with_log_file() {
        if let Some(path) = AppDirs::log_path() {
            assert_eq!(path.file_name().unwrap(), "fitts.log");
            assert!(path.parent().unwrap().ends_with("fitts"));
        }
    }
}
