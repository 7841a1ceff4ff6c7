use anyhow::{Result, anyhow};
use std::fs;
use std::path::PathBuf;

pub fn get_minerva_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".minerva"))
}

pub fn get_config_path() -> Result<PathBuf> {
    let minerva_dir = get_minerva_dir()?;
    Ok(minerva_dir.join("config.toml"))
}

pub fn get_database_path() -> Result<PathBuf> {
    let minerva_dir = get_minerva_dir()?;
    Ok(minerva_dir.join("minerva.db"))
}

/// Stored credentials for the current login (token, email, plan)
pub fn get_session_path() -> Result<PathBuf> {
    let minerva_dir = get_minerva_dir()?;
    Ok(minerva_dir.join("session.json"))
}

pub fn get_logs_dir() -> Result<PathBuf> {
    let minerva_dir = get_minerva_dir()?;
    Ok(minerva_dir.join("logs"))
}

pub fn ensure_minerva_dir_exists() -> Result<PathBuf> {
    let minerva_dir = get_minerva_dir()?;
    if !minerva_dir.exists() {
        fs::create_dir_all(&minerva_dir)?;
    }
    Ok(minerva_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_share_root() {
        let root = get_minerva_dir().unwrap();
        assert!(get_config_path().unwrap().starts_with(&root));
        assert!(get_database_path().unwrap().starts_with(&root));
        assert!(get_session_path().unwrap().starts_with(&root));
        assert!(get_logs_dir().unwrap().starts_with(&root));
    }

    #[test]
    fn test_config_path_filename() {
        let path = get_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "config.toml");
    }
}
