// git
pub const GIT_TIMEOUT_SECS: u64 = 30;

// github
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
pub const HTTP_TIMEOUT_SECS: u64 = 10;
pub const PER_PAGE: u32 = 100;
pub const MAX_PAGES: usize = 500;
pub const USER_AGENT: &str = concat!("branch-overlap/", env!("CARGO_PKG_VERSION"));

// config
pub const CONFIG_DIR_NAME: &str = "branch-overlap";
pub const CONFIG_FILE_NAME: &str = "config.json";

// exit codes
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_OVERLAP: i32 = 2;
