use crate::github::TreeEntry;

/// Default cap on the number of files sent to the completion model
pub const MAX_IMPORTANT_FILES: usize = 10;

/// At most this many config files are picked before source files
const MAX_CONFIG_FILES: usize = 3;

/// Path substrings that disqualify an entry regardless of type
const EXCLUDED_PATH_FRAGMENTS: &[&str] = &["test", "node_modules", ".git", "dist", "build"];

/// Build/config filenames that anchor the tech stack and are picked first
const CONFIG_FILENAMES: &[&str] = &[
    "package.json",
    "requirements.txt",
    "Cargo.toml",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "Dockerfile",
    "docker-compose.yml",
    "setup.py",
    "pyproject.toml",
    "Makefile",
];

/// Source extensions worth showing to the model
const SOURCE_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".java", ".cpp", ".c", ".go", ".rs", ".rb", ".php",
    ".swift", ".kt", ".cs", ".scala", ".sql",
];

/// Chooses which tree entries are worth sending to the language model
///
/// Up to 3 config files (in tree order) come first, then source files in
/// tree order fill the remainder up to `max_files`. No ranking by size or
/// depth is applied; this is a stated design limitation.
pub fn select_important_files(tree: &[TreeEntry], max_files: usize) -> Vec<String> {
    let mut config_files = Vec::new();
    let mut source_files = Vec::new();

    for entry in tree {
        if entry.kind != "blob" {
            continue;
        }

        let path_lower = entry.path.to_lowercase();
        if EXCLUDED_PATH_FRAGMENTS.iter().any(|frag| path_lower.contains(frag)) {
            continue;
        }

        let filename = entry.path.rsplit('/').next().unwrap_or(&entry.path);
        if CONFIG_FILENAMES.contains(&filename) {
            config_files.push(entry.path.clone());
        } else if SOURCE_EXTENSIONS.iter().any(|ext| filename.ends_with(ext)) {
            source_files.push(entry.path.clone());
        }
    }

    config_files.truncate(MAX_CONFIG_FILES);
    let remaining = max_files.saturating_sub(config_files.len());

    let mut selected = config_files;
    selected.extend(source_files.into_iter().take(remaining));
    selected.truncate(max_files);
    selected
}
