use std::path::PathBuf;
use log::warn;

pub fn get_home_dir() -> Option<PathBuf> {
    if let Some(path) = home::home_dir() {
        return Some(path.join(".dnsfwd"));
    }

    warn!("cannot find the home directory, skipping the default config file");

    None
}
