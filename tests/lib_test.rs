//! Library integration tests.

use agent_workspace::updates::{StepError, UpdateError, UpdateStep};
use agent_workspace::AwError;

#[test]
fn error_types_are_public() {
    let err: AwError = StepError::new(
        UpdateStep::FindingAsset,
        UpdateError::AssetNotFound {
            os: "plan9".into(),
            arch: "mips".into(),
        },
    )
    .into();
    assert_eq!(
        err.to_string(),
        "finding release asset: no release asset found for plan9/mips"
    );
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> agent_workspace::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use agent_workspace::cli::{Cli, Commands};
    use clap::Parser;

    let cli = Cli::parse_from(["aw", "update", "--check"]);

    if let Commands::Update(args) = cli.command {
        assert!(args.check);
    } else {
        panic!("Expected Update command");
    }
}
