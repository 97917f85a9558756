use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for tilecast")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: fmt, clippy, tests, doc, smoke
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the raycaster timing bench in release mode
    Bench,
    /// Render the bundled levels headlessly and run a replay check
    Smoke,
}

/// The cargo invocations each task runs, in order.
fn steps(command: &Commands) -> Vec<Vec<&'static str>> {
    let fmt = vec!["fmt", "--all", "--", "--check"];
    let clippy = vec!["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"];
    let test = vec!["test", "--workspace"];
    let doc = vec!["doc", "--workspace", "--no-deps"];
    let smoke = vec![
        vec![
            "run", "-p", "tilecast-cli", "--", "validate", "data/levels/classic.yaml",
        ],
        vec![
            "run", "-p", "tilecast-cli", "--", "render", "--level", "data/levels/ring.yaml",
            "--script", "wwwdd",
        ],
        vec!["run", "-p", "tilecast-cli", "--", "replay", "--ticks", "500"],
    ];
    match command {
        Commands::Check => {
            let mut all = vec![fmt, clippy, test, doc];
            all.extend(smoke);
            all
        }
        Commands::Fmt => vec![fmt],
        Commands::Clippy => vec![clippy],
        Commands::Test => vec![test],
        Commands::Doc => vec![doc],
        Commands::Build => vec![vec!["build", "--workspace"]],
        Commands::Bench => vec![vec![
            "bench", "-p", "tilecast-render", "--bench", "bench_raycast",
        ]],
        Commands::Smoke => smoke,
    }
}

fn cargo(args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .context("spawning cargo")?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", args.first().copied().unwrap_or_default());
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    for args in steps(&cli.command) {
        cargo(&args)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_runs_everything_in_order() {
        let all = steps(&Commands::Check);
        let firsts: Vec<&str> = all.iter().map(|s| s[0]).collect();
        assert_eq!(firsts, ["fmt", "clippy", "test", "doc", "run", "run", "run"]);
    }

    #[test]
    fn clippy_denies_warnings() {
        let clippy = &steps(&Commands::Clippy)[0];
        assert!(clippy.ends_with(&["-D", "warnings"]));
    }
}
