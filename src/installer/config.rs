use anyhow::Result;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

use super::{Layout, Sources};
use crate::{
    download::{Downloader, HttpDownloader},
    http::HttpClient,
    runtime::Runtime,
};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Run options that come from the command line.
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Install even when the tool already answers its version query
    pub force: bool,
    /// Use this identification string instead of asking the system
    pub os_override: Option<String>,
    /// Write the JSON summary here
    pub report: Option<PathBuf>,
}

pub struct Config<R: Runtime, D: Downloader> {
    pub runtime: R,
    pub downloader: D,
    pub layout: Layout,
    pub sources: Sources,
    pub options: Options,
}

impl<R: Runtime> Config<R, HttpDownloader> {
    pub fn new(runtime: R, install_root: Option<PathBuf>, options: Options) -> Result<Self> {
        let sources = Sources::from_env(&runtime);

        let client = Client::builder()
            .user_agent(user_agent())
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        let downloader = HttpDownloader::new(HttpClient::new(client));
        let layout = install_root.map(Layout::new).unwrap_or_default();

        Ok(Self {
            runtime,
            downloader,
            layout,
            sources,
            options,
        })
    }
}

pub(crate) fn user_agent() -> String {
    format!("appdeps/{}", env!("APPDEPS_VERSION"))
}
