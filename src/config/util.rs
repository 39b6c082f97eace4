//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find `config_name` in `start` or the nearest ancestor containing it.
///
/// ```text
/// /home/user/site/public/posts/  ← start
/// /home/user/site/pagefeed.toml  ← found
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}
