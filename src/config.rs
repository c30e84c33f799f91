use std::path::PathBuf;

/// Account whose stats are rendered.
pub const DEFAULT_USERNAME: &str = "langerma";
pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_README: &str = "README.md";

/// Everything a single run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub username: String,
    pub api_base: String,
    pub readme_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: DEFAULT_USERNAME.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            readme_path: PathBuf::from(DEFAULT_README),
        }
    }
}
