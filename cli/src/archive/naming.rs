//! # targz Entry Naming (`archive::naming`)
//!
//! File: cli/src/archive/naming.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Archive entries are named relative to a *root* directory. The same naming
//! convention is used when writing and reading, so a tree compressed from
//! `/home/me/project` with root `/home/me` is stored as `project/...` and
//! recreated as `<output>/project/...`.
//!
//! Names always use `/` separators, carry no leading or trailing slash, and
//! keep the full ancestor chain between the root and the target.
//!
use std::borrow::Cow;
use std::path::{Component, Path, PathBuf};

/// Computes the archive name of `target` relative to `root`.
///
/// The function is pure: it never touches the filesystem. When `target` is not
/// below `root` the result contains `..` segments, which the writer will refuse
/// to store; callers should pass a root that is a common ancestor of every
/// source (see [`common_root`]). `target == root` yields an empty string.
///
/// ```
/// use std::path::Path;
/// use targz::archive::naming::relative_name;
///
/// let name = relative_name(Path::new("/data"), Path::new("/data/logs/today.txt"));
/// assert_eq!(name, "logs/today.txt");
/// ```
pub fn relative_name(root: &Path, target: &Path) -> String {
    let relative = pathdiff::diff_paths(target, root).unwrap_or_else(|| target.to_path_buf());
    join_components(&relative)
}

fn join_components(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy()),
            Component::ParentDir => Some(Cow::Borrowed("..")),
            Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Removes `.` and `..` components without touching the filesystem.
///
/// `..` pops the previous normal component; at the filesystem root (or at the
/// start of a relative path with nothing left to pop) it is dropped for
/// absolute paths and kept for relative ones. Symlinks are not resolved.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use targz::archive::naming::normalize;
///
/// assert_eq!(normalize(Path::new("/srv/app/sub/../.")), PathBuf::from("/srv/app"));
/// ```
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}

/// Finds the deepest directory containing the parent of every source.
///
/// Using the parents (rather than the sources themselves) keeps each source
/// visible as a named entry: archiving `/srv/app` alone yields root `/srv` and
/// entries under `app/`. Returns `None` for an empty list.
pub fn common_root<P: AsRef<Path>>(sources: &[P]) -> Option<PathBuf> {
    let mut parents = sources
        .iter()
        .map(|source| source.as_ref().parent().unwrap_or_else(|| Path::new("")));
    let first = parents.next()?;
    let mut common: Vec<Component> = first.components().collect();
    for parent in parents {
        let shared = common
            .iter()
            .zip(parent.components())
            .take_while(|(a, b)| **a == *b)
            .count();
        common.truncate(shared);
    }
    Some(common.iter().collect())
}
