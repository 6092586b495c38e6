pub mod checkpoint;
pub mod info;
pub mod score;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use restrain::workflows::session::Session;
use tracing::info;

/// Loads the session named by the input arguments.
pub(crate) fn load_session(input: &InputArgs) -> Result<Session> {
    let source = input.source().ok_or_else(|| {
        CliError::Argument("exactly one of --scene or --checkpoint is required".to_string())
    })?;
    info!("Loading session from {:?}", source);
    Ok(Session::load(&source)?)
}
