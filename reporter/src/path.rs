//! @ai:module:intent Normalize file paths to repository-relative, forward-slash form
//! @ai:module:layer domain
//! @ai:module:public_api normalize, clean, absolute_root
//! @ai:module:stateless true

use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// @ai:intent Convert a path into a repository-relative path using `/` separators
/// @ai:pre repo_root is absolute; see `absolute_root`
/// @ai:post result never contains the host separator when it differs from `/`
/// @ai:effects pure
/// @ai:idempotent true
/// @ai:edge_cases paths outside repo_root yield `..` segments; relative input is only cleaned
pub fn normalize(path: &Path, repo_root: &Path) -> String {
    let relative = if path.is_absolute() {
        let path = clean(path);
        pathdiff::diff_paths(&path, clean(repo_root)).unwrap_or(path)
    } else {
        clean(path)
    };

    let text = relative.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        text.into_owned()
    } else {
        text.replace(MAIN_SEPARATOR, "/")
    }
}

/// @ai:intent Lexically drop `.` segments and fold `name/..` pairs
/// @ai:effects pure
/// @ai:idempotent true
/// @ai:edge_cases leading `..` on a relative path is kept; `..` directly under the root is dropped
pub fn clean(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    parts.iter().collect()
}

/// @ai:intent Resolve a repository root against the working directory without following symlinks
/// @ai:post result is absolute whenever the working directory is readable
/// @ai:effects env
pub fn absolute_root(repo_root: &Path) -> PathBuf {
    std::path::absolute(repo_root)
        .map(|root| clean(&root))
        .unwrap_or_else(|_| clean(repo_root))
}
