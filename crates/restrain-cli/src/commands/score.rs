use super::load_session;
use crate::cli::ScoreArgs;
use crate::error::Result;
use restrain::engine::config::EvaluationConfigBuilder;
use restrain::engine::error::EngineError;
use restrain::workflows::session::EvaluationReport;
use std::io::Write;
use tracing::info;

pub fn run(args: &ScoreArgs, out: &mut impl Write) -> Result<()> {
    let session = load_session(&args.input)?;
    let config = EvaluationConfigBuilder::new()
        .compute_derivatives(args.derivatives)
        .weight(args.weight)
        .build()
        .map_err(EngineError::from)?;

    info!(
        "Evaluating {} restraint(s) (derivatives: {}).",
        session.scoring.len(),
        config.compute_derivatives
    );
    let report = session.evaluate(&config);
    write_report(&report, out)
}

fn write_report(report: &EvaluationReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "score: {:.6}", report.score)?;
    for entry in &report.derivatives {
        writeln!(
            out,
            "d/d[{}]: ({:.6}, {:.6}, {:.6})",
            entry.name, entry.derivative.x, entry.derivative.y, entry.derivative.z
        )?;
    }
    Ok(())
}
