//! `wavebug init`: writes a default `wavebug.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use wavebug_config::{CONFIG_FILE_NAME, DEFAULT_CONFIG};

/// Runs the `wavebug init` command.
///
/// Writes into `dir` (created if missing) or the current directory. Refuses
/// to replace an existing file unless `force` is set. Returns exit code 0
/// on success.
pub fn run(dir: Option<String>, force: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let target_dir = match dir {
        Some(d) => PathBuf::from(d),
        None => std::env::current_dir()?,
    };
    let path = write_default_config(&target_dir, force)?;
    eprintln!("     Created {}", path.display());
    Ok(0)
}

/// Writes [`DEFAULT_CONFIG`] to `<dir>/wavebug.toml` and returns its path.
fn write_default_config(dir: &Path, force: bool) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }
    fs::create_dir_all(dir)?;
    fs::write(&path, DEFAULT_CONFIG)?;
    Ok(path)
}
