// Driver: uploads the archive once per repetition and blocks on the
// import status until the server reports a terminal state. Everything
// runs sequentially on the calling thread.

use crate::api::ApiClient;
use crate::cli::RunConfig;
use crate::error::{ImportError, ImportResult};
use crate::models::{ImportRequest, ImportState, ImportStatus};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// How often to poll and when to give up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            interval: Duration::from_secs(5),
            max_attempts: 100,
        }
    }
}

/// Outcome of one repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub path: String,
    pub project_id: u64,
    pub state: ImportState,
}

/// Destination path of repetition `index`: `<name>-<index>`.
pub fn destination_path(name: &str, index: u32) -> String {
    format!("{name}-{index}")
}

/// Run every repetition described by `config`, writing status lines to `out`.
pub fn run<W: Write>(api: &ApiClient, config: &RunConfig, out: &mut W) -> ImportResult<Vec<ImportSummary>> {
    run_with(api, config, out, thread::sleep)
}

/// Same as [`run`] with a custom sleep between polls.
pub fn run_with<W, S>(api: &ApiClient, config: &RunConfig, out: &mut W, mut sleep: S) -> ImportResult<Vec<ImportSummary>>
where
    W: Write,
    S: FnMut(Duration),
{
    let mut summaries = Vec::new();
    for index in 0..config.count {
        let request = ImportRequest::new(
            config.namespace.clone(),
            destination_path(&config.name, index),
            config.archive.clone(),
        );

        info!(path = %request.path, namespace = ?request.namespace(), archive = %request.archive.display(), "uploading project archive");
        let spinner = upload_spinner(&request.path);
        let created = api.import_project(&request);
        spinner.finish_and_clear();
        let created = created?;

        writeln!(out, "Created project {} ({})", created.id, created.path_with_namespace)?;
        let status = wait_for_import_with(api, created.id, &config.poll, out, &mut sleep)?;
        summaries.push(ImportSummary {
            path: request.path,
            project_id: created.id,
            state: status.state(),
        });
    }
    Ok(summaries)
}

/// Poll the import status of `project_id` until it finishes, fails, or
/// `settings.max_attempts` unfinished polls have been seen.
pub fn wait_for_import<W: Write>(
    api: &ApiClient,
    project_id: u64,
    settings: &PollSettings,
    out: &mut W,
) -> ImportResult<ImportStatus> {
    wait_for_import_with(api, project_id, settings, out, thread::sleep)
}

/// Same as [`wait_for_import`] with a custom sleep between polls.
pub fn wait_for_import_with<W, S>(
    api: &ApiClient,
    project_id: u64,
    settings: &PollSettings,
    out: &mut W,
    mut sleep: S,
) -> ImportResult<ImportStatus>
where
    W: Write,
    S: FnMut(Duration),
{
    let mut attempts = 0;
    let mut last_status = String::new();

    while attempts < settings.max_attempts {
        let status = api.import_status(project_id)?;
        match status.state() {
            ImportState::Finished => {
                writeln!(out, "Import status: {}", status.import_status)?;
                info!(project_id, polls = attempts + 1, "import finished");
                return Ok(status);
            }
            ImportState::Failed => {
                writeln!(out, "Import status: {}", status.import_status)?;
                report_failed_relations(out, &status)?;
                warn!(project_id, correlation_id = %status.correlation_id, "import failed");
                return Ok(status);
            }
            ImportState::Empty => {
                writeln!(out, "Import failed, empty response")?;
                warn!(project_id, "status response carried no import_status");
                return Ok(status);
            }
            ImportState::InProgress(current) => {
                writeln!(out, "Import status: {current}")?;
                attempts += 1;
                last_status = current;
                if attempts < settings.max_attempts {
                    sleep(settings.interval);
                }
            }
        }
    }

    Err(ImportError::AttemptsExhausted {
        project_id,
        attempts,
        last_status,
    })
}

fn report_failed_relations<W: Write>(out: &mut W, status: &ImportStatus) -> ImportResult<()> {
    for relation in &status.failed_relations {
        writeln!(
            out,
            "  failed relation {}: {}: {}",
            relation.relation_name, relation.exception_class, relation.exception_message
        )?;
    }
    Ok(())
}

fn upload_spinner(path: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Uploading {path}..."));
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
