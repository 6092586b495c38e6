use super::load_session;
use crate::cli::CheckpointArgs;
use crate::error::Result;
use tracing::info;

pub fn run(args: &CheckpointArgs) -> Result<()> {
    let session = load_session(&args.input)?;
    session.save_checkpoint(&args.output)?;
    info!("Checkpoint of {} restraint(s) saved.", session.scoring.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputArgs;
    use crate::error::CliError;
    use restrain::engine::config::EvaluationConfig;
    use restrain::engine::error::EngineError;
    use restrain::workflows::session::{Session, SessionSource};
    use std::fs;
    use tempfile::tempdir;

    fn scene_args(dir: &std::path::Path, kind: &str) -> CheckpointArgs {
        let scene = dir.join("scene.toml");
        fs::write(
            &scene,
            format!(
                r#"
                [[particles]]
                name = "p"
                coordinates = [1.0, 2.0, 3.0]

                [[restraints]]
                kind = "{kind}"
                particle = "p"
                stiffness = 10.0
                "#
            ),
        )
        .unwrap();
        CheckpointArgs {
            input: InputArgs {
                scene: Some(scene),
                checkpoint: None,
            },
            output: dir.join("session.json"),
        }
    }

    #[test]
    fn written_checkpoint_restores_to_same_score() {
        let dir = tempdir().unwrap();
        let args = scene_args(dir.path(), "recorded-harmonic-anchor");
        run(&args).unwrap();

        let restored = Session::load(&SessionSource::Checkpoint(args.output.clone())).unwrap();
        let report = restored.evaluate(&EvaluationConfig::score_only());
        assert_eq!(report.score, 45.0);
    }

    #[test]
    fn plain_anchor_cannot_be_checkpointed() {
        let dir = tempdir().unwrap();
        let args = scene_args(dir.path(), "harmonic-anchor");
        assert!(matches!(
            run(&args),
            Err(CliError::Engine(EngineError::Persistence(_)))
        ));
        assert!(!args.output.exists());
    }
}
