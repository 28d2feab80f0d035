use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Directories the batch assembler never treats as tile folders.
pub const IGNORED_FOLDERS: [&str; 6] = ["__pycache__", ".git", ".idea", "venv", ".", ".."];

/// Create `dir` (and parents) if it does not exist yet.
pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        info!(path = %dir.display(), "Created directory");
    }
    Ok(())
}

/// Output image path for a tile folder: the folder path with `.jpg` appended.
///
/// `art/starry-night/` becomes `art/starry-night.jpg`.
pub fn output_path_for(folder: &Path) -> PathBuf {
    let mut name = folder.as_os_str().to_os_string();
    let trimmed = name
        .to_string_lossy()
        .trim_end_matches(['/', '\\'])
        .to_string();
    if !trimmed.is_empty() {
        name = trimmed.into();
    }
    name.push(".jpg");
    PathBuf::from(name)
}

/// Subdirectories of `root` that may hold tiles, sorted by name.
pub fn list_tile_folders(root: &Path) -> io::Result<Vec<PathBuf>> {
    let mut folders: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|entry| {
            entry.ok().and_then(|e| {
                if !e.file_type().ok()?.is_dir() {
                    return None;
                }
                let name = e.file_name();
                if IGNORED_FOLDERS.contains(&name.to_str()?) {
                    None
                } else {
                    Some(e.path())
                }
            })
        })
        .collect();

    folders.sort();
    Ok(folders)
}

/// Turn `starry-night` into `Starry Night`. Names that already contain
/// spaces are returned unchanged.
pub fn prettify_dir_name(name: &str) -> String {
    if name.contains(' ') {
        return name.to_string();
    }

    name.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Destination folder name derived from a base URL: its last non-empty path
/// segment, without trailing `_`/`-` separators.
///
/// `https://host/art/starry-night/` gives `starry-night`.
pub fn dest_from_base_url(base_url: &str) -> Option<String> {
    let without_query = base_url.split(['?', '#']).next()?;
    let path = without_query
        .split_once("://")
        .map_or(without_query, |(_, rest)| rest);

    // The first segment is the host when a scheme was present.
    let mut segments = path.split('/');
    if without_query.contains("://") {
        segments.next();
    }

    segments
        .map(|segment| segment.trim_end_matches(['_', '-']))
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
