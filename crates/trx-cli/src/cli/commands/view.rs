//! `trx view` — interactive viewer.

use std::path::Path;

use anyhow::Result;
use trx_core::config::Config;
use trx_core::session::Session;
use trx_core::trace;

pub fn run(file: &Path, follow: bool) -> Result<()> {
    let config = Config::load()?;
    trace::initialize(config.trace.clone());

    let session = Session::load_from(file)?;
    let follow_path = follow.then(|| file.to_path_buf());

    trx_tui::run_viewer(config, &session, follow_path)
}
