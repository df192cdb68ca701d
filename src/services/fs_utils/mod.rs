pub mod file_utils;
pub mod path_utils;

pub use file_utils::{atomic_write, move_children, remove_dir_if_exists};
pub use path_utils::{archive_entry_name, class_file_path, is_path_safe};

#[cfg(test)]
#[path = "tests/fs_utils_tests.rs"]
mod tests;
