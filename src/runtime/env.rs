//! Environment and system information operations.

use std::env;

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn os_name_impl(&self) -> String {
        #[cfg(unix)]
        {
            match nix::sys::utsname::uname() {
                Ok(info) => info.sysname().to_string_lossy().into_owned(),
                Err(e) => {
                    log::debug!("uname failed ({}), falling back to build target", e);
                    env::consts::OS.to_string()
                }
            }
        }

        #[cfg(windows)]
        {
            "Windows".to_string()
        }

        #[cfg(not(any(unix, windows)))]
        {
            env::consts::OS.to_string()
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_privileged_impl(&self) -> bool {
        #[cfg(unix)]
        return nix::unistd::geteuid().as_raw() == 0;

        #[cfg(windows)]
        return is_elevated::is_elevated();

        #[cfg(not(any(unix, windows)))]
        return false;
    }
}
