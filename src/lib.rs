pub mod archive;
pub mod download;
pub mod error;
pub mod http;
pub mod installer;
pub mod outcome;
pub mod platform;
pub mod probe;
pub mod runtime;

/// Test utilities for cross-platform path handling.
#[cfg(test)]
pub mod test_utils {
    use std::path::PathBuf;

    /// Returns the test install root based on the platform.
    /// - Unix: `/home/user/app/embedded`
    /// - Windows: `C:\Users\user\app\embedded`
    pub fn test_root() -> PathBuf {
        #[cfg(not(windows))]
        {
            PathBuf::from("/home/user/app/embedded")
        }
        #[cfg(windows)]
        {
            PathBuf::from(r"C:\Users\user\app\embedded")
        }
    }
}
