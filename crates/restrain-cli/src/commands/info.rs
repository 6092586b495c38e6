use super::load_session;
use crate::cli::InputArgs;
use crate::error::Result;
use std::io::Write;

/// Prints one line per restraint: its name followed by its static info as JSON, or a
/// note that the restraint exports none.
pub fn run(args: &InputArgs, out: &mut impl Write) -> Result<()> {
    let session = load_session(args)?;
    for entry in session.scoring.restraints() {
        let restraint = &entry.restraint;
        match restraint.static_info() {
            Some(info) => writeln!(out, "{}: {}", restraint.name(), serde_json::to_string(&info)?)?,
            None => writeln!(out, "{}: (no static info)", restraint.name())?,
        }
    }
    Ok(())
}
