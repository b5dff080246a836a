//! Command-line flags and the run configuration derived from them.

use crate::runner::PollSettings;
use anyhow::Context;
use clap::Parser;
use dialoguer::Password;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// Seed a GitLab instance with copies of an exported project.
#[derive(Parser, Debug)]
#[command(name = "gitlab-import-seeder", version, about)]
pub struct CliArgs {
    /// GitLab base URI, e.g. https://gitlab.example.com
    #[arg(long, env = "GITLAB_URI")]
    pub uri: String,

    /// Personal access token sent as PRIVATE-TOKEN. Prompted for when omitted.
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Destination group; pass an empty string to import into your own namespace
    #[arg(long, default_value = "sample-data")]
    pub group: String,

    /// Base project name; each import gets `-<n>` appended
    #[arg(long, default_value = "sample-data")]
    pub name: String,

    /// Exported project archive to upload
    #[arg(long, default_value = "sample.tar.gz")]
    pub filename: PathBuf,

    /// Number of times to import the archive
    #[arg(long, default_value_t = 1)]
    pub count: u32,

    /// Log raw and decoded API responses (at info level)
    #[arg(long)]
    pub debug: bool,

    /// Seconds to wait between status polls
    #[arg(long, default_value_t = 5)]
    pub interval: u64,

    /// Give up on an import after this many unfinished polls
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_attempts: u32,
}

/// Everything a run needs, with the token already resolved.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub uri: String,
    pub token: String,
    pub namespace: Option<String>,
    pub name: String,
    pub archive: PathBuf,
    pub count: u32,
    pub debug: bool,
    pub poll: PollSettings,
}

impl CliArgs {
    pub fn into_config(self, token: String) -> RunConfig {
        RunConfig {
            uri: self.uri,
            token,
            namespace: Some(self.group).filter(|g| !g.trim().is_empty()),
            name: self.name,
            archive: self.filename,
            count: self.count,
            debug: self.debug,
            poll: PollSettings {
                interval: Duration::from_secs(self.interval),
                max_attempts: self.max_attempts,
            },
        }
    }
}

/// Use the token from the flags/environment, or ask for it on a terminal.
pub fn resolve_token(token: Option<String>) -> anyhow::Result<String> {
    match token {
        Some(token) => Ok(token),
        None if std::io::stdin().is_terminal() => Password::new()
            .with_prompt("GitLab API token")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read API token"),
        None => {
            warn!("no API token given, requests will be sent without one");
            Ok(String::new())
        }
    }
}
