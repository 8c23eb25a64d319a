use crate::error::{Error, Result};
use std::env;
use std::path::PathBuf;

/// Base slugswap config directory (~/.config/slugswap/, %APPDATA%\slugswap on Windows)
pub fn slugswap() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let appdata = env::var("APPDATA").map_err(|_| {
            Error::internal_unexpected(
                "APPDATA environment variable not set on Windows".to_string(),
            )
        })?;
        Ok(PathBuf::from(appdata).join("slugswap"))
    }

    #[cfg(not(windows))]
    {
        let home = env::var("HOME").map_err(|_| {
            Error::internal_unexpected(
                "HOME environment variable not set on Unix-like system".to_string(),
            )
        })?;
        Ok(PathBuf::from(home).join(".config").join("slugswap"))
    }
}

/// Global slugswap.json config file path
pub fn slugswap_json() -> Result<PathBuf> {
    Ok(slugswap()?.join("slugswap.json"))
}
