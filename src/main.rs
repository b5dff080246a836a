// Entrypoint for the import seeder.
// - Parses flags, sets up logging and the API client, then hands over to
//   the runner which performs every repetition in order.
// - Any error aborts the remaining repetitions and exits non-zero.

use anyhow::Context;
use clap::Parser;
use gitlab_import_seeder::{
    api::ApiClient,
    cli::{self, CliArgs},
    logging, runner,
};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    logging::init_tracing(args.debug);

    let token = cli::resolve_token(args.token.clone())?;
    let config = args.into_config(token);

    let api = ApiClient::new(&config.uri, &config.token, config.debug)
        .context("Failed to set up API client")?;

    let mut out = std::io::stdout().lock();
    let summaries = runner::run(&api, &config, &mut out).context("Import run aborted")?;

    for summary in &summaries {
        info!(path = %summary.path, project_id = summary.project_id, state = ?summary.state, "import done");
    }
    Ok(())
}
