//! Runtime abstraction for system operations.
//!
//! Every side effect of the bootstrapper (files, processes, environment)
//! goes through [`Runtime`] so pipelines can be tested against a mock.
//!
//! # Structure
//!
//! - `env` - Environment variables and system identification
//! - `fs` - File system operations (read, write, directory)
//! - `process` - Spawning external commands and locating executables

mod env;
mod fs;
mod process;

use anyhow::Result;
use std::env as std_env;
use std::path::{Path, PathBuf};

pub use process::CommandStatus;

#[cfg_attr(test, mockall::automock)]
pub trait Runtime: Send + Sync {
    // Environment
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;

    /// Operating system identification string, e.g. `Darwin`, `Linux`, `Windows`.
    fn os_name(&self) -> String;

    // File System
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>>;
    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>>;

    /// Set file permissions (mode) on Unix systems. No-op on Windows.
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;

    // Processes
    /// Run a command with its output discarded and report how it exited.
    fn probe_command(&self, program: &str, args: &[String]) -> Result<CommandStatus>;

    /// Run a command attached to the current terminal and wait for it.
    fn run_command(&self, program: &Path, args: &[String]) -> Result<CommandStatus>;

    /// Locate an executable on `PATH`.
    fn which(&self, name: &str) -> Option<PathBuf>;

    // Privilege
    fn is_privileged(&self) -> bool;
}

pub struct RealRuntime;

impl Runtime for RealRuntime {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }

    fn os_name(&self) -> String {
        self.os_name_impl()
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.write_impl(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        self.create_dir_all_impl(path)
    }

    fn exists(&self, path: &Path) -> bool {
        self.exists_impl(path)
    }

    fn create_file(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>> {
        self.create_file_impl(path)
    }

    fn open(&self, path: &Path) -> Result<Box<dyn std::io::Read + Send>> {
        self.open_impl(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()> {
        self.set_permissions_impl(path, mode)
    }

    fn probe_command(&self, program: &str, args: &[String]) -> Result<CommandStatus> {
        self.probe_command_impl(program, args)
    }

    fn run_command(&self, program: &Path, args: &[String]) -> Result<CommandStatus> {
        self.run_command_impl(program, args)
    }

    fn which(&self, name: &str) -> Option<PathBuf> {
        self.which_impl(name)
    }

    fn is_privileged(&self) -> bool {
        self.is_privileged_impl()
    }
}
