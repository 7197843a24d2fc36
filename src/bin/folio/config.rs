use std::env;
use std::path::PathBuf;

use folio::project::SITE_CONFIG_FILE;

const CFG_DIR_NAME: &str = "folio";

/// Project root lookup: current dir, then the user config dir.
fn find_project_root() -> Option<PathBuf> {
    if let Ok(cur_dir) = env::current_dir() {
        if cur_dir.join(SITE_CONFIG_FILE).exists() {
            return Some(cur_dir);
        }
    }

    let cfg_dir = dirs::config_dir()?.join(CFG_DIR_NAME);
    if cfg_dir.join(SITE_CONFIG_FILE).exists() {
        return Some(cfg_dir);
    }

    None
}

pub(crate) fn project_root(root: Option<PathBuf>) -> Result<PathBuf, String> {
    let root = match root {
        Some(root) => root,
        None => match find_project_root() {
            None => return Err(format!("Could not find {} in the current directory", SITE_CONFIG_FILE)),
            Some(root) => root,
        },
    };

    if !root.join(SITE_CONFIG_FILE).exists() {
        return Err(format!("{} has no {}", root.display(), SITE_CONFIG_FILE));
    }

    Ok(root)
}
