use std::path::{Component, Path};

/// Validates that the relative `target_path` stays inside whatever base it is
/// joined onto. Rejects `..` escapes, absolute paths and prefixes.
pub fn is_path_safe(target_path: &Path) -> bool {
    if target_path.is_absolute() {
        return false;
    }

    let mut depth = 0i32;
    for component in target_path.components() {
        match component {
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::Normal(_) => depth += 1,
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }

    true
}

/// Build a zip entry name from a prefix and a relative filesystem path.
///
/// Entry names always use `/`, whatever the host separator is.
pub fn archive_entry_name(prefix: &str, relative: &Path) -> String {
    let mut name = String::from(prefix);
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !name.is_empty() && !name.ends_with('/') {
                name.push('/');
            }
            name.push_str(&part.to_string_lossy());
        }
    }
    name
}

/// Entry path for a compiled class, e.g. `a.b.C` → `a/b/C.class`.
pub fn class_file_path(fully_qualified_name: &str) -> String {
    format!("{}.class", fully_qualified_name.replace('.', "/"))
}
