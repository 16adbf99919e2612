//! Path utilities and file system helpers

use std::io;
use std::path::PathBuf;

use crate::error::StudioError;

/// Gets the application data directory
pub fn get_app_data_dir() -> Result<PathBuf, StudioError> {
    dirs::data_dir()
        .map(|p| p.join("com.vmstudio.app"))
        .ok_or_else(|| {
            StudioError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "Could not find app data directory",
            ))
        })
}

/// Gets the generated image output directory
pub fn get_outputs_dir() -> Result<PathBuf, StudioError> {
    get_app_data_dir().map(|p| p.join("outputs"))
}

/// Gets the session database file path
pub fn get_db_path() -> Result<PathBuf, StudioError> {
    get_app_data_dir().map(|p| p.join("vm_studio.db"))
}

/// Gets the studio configuration file path
pub fn get_studio_config_path() -> Result<PathBuf, StudioError> {
    get_app_data_dir().map(|p| p.join(".studio_config.json"))
}
