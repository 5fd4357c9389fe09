pub mod commands;
pub mod output;

use clap::{Parser, Subcommand, ValueEnum};

use crate::chain::SimulatedOutcome;

#[derive(Parser)]
#[command(name = "ocif-staker")]
#[command(author = "InvArch Team")]
#[command(version = "0.1.0")]
#[command(about = "Claim, restake and manage OCIF core staking", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config directory
    #[arg(short, long, default_value = "config")]
    pub config: String,

    /// Account snapshot (JSON) to operate on
    #[arg(short, long, env = "OCIF_SNAPSHOT", default_value = "snapshot.json")]
    pub snapshot: String,

    /// Print results as JSON instead of tables
    #[arg(long)]
    pub json: bool,

    /// How the simulated chain finalizes submissions
    #[arg(long, value_enum, default_value = "success")]
    pub outcome: OutcomeArg,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the claim batch that would be submitted
    Plan {
        /// Include draft restake calls
        #[arg(long)]
        restake: bool,
    },
    /// Claim unclaimed rewards
    Claim {
        /// Restake claimed rewards (overrides config)
        #[arg(long, conflicts_with = "no_restake")]
        restake: bool,
        /// Do not restake (overrides config)
        #[arg(long)]
        no_restake: bool,
    },
    /// Stake free balance into a core
    Stake {
        #[arg(long)]
        core: u32,
        /// Amount in whole tokens, or "max"
        #[arg(long)]
        amount: String,
    },
    /// Unstake from a core; tokens enter the unbonding period
    Unstake {
        #[arg(long)]
        core: u32,
        /// Amount in whole tokens, or "max"
        #[arg(long)]
        amount: String,
    },
    /// Move stake from one core to another
    MoveStake {
        #[arg(long)]
        from: u32,
        #[arg(long)]
        to: u32,
        /// Amount in whole tokens, or "max"
        #[arg(long)]
        amount: String,
    },
    /// Withdraw tokens that finished unbonding
    Withdraw,
    /// Show unbonding chunks
    Unbonding,
    /// Show dashboard metrics
    Metrics,
}

/// Simulated submission outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    Success,
    Failed,
    Invalid,
    Dropped,
}

impl From<OutcomeArg> for SimulatedOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Success => SimulatedOutcome::Success,
            OutcomeArg::Failed => SimulatedOutcome::DispatchFailed("ExtrinsicFailed".to_string()),
            OutcomeArg::Invalid => SimulatedOutcome::Invalid,
            OutcomeArg::Dropped => SimulatedOutcome::Dropped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_claim_with_restake() {
        let cli = Cli::try_parse_from(["ocif-staker", "--snapshot", "a.json", "claim", "--restake"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Claim {
                restake: true,
                no_restake: false
            }
        ));
        assert_eq!(cli.snapshot, "a.json");
    }

    #[test]
    fn restake_flags_conflict() {
        assert!(Cli::try_parse_from(["ocif-staker", "claim", "--restake", "--no-restake"]).is_err());
    }

    #[test]
    fn parses_move_stake() {
        let cli = Cli::try_parse_from([
            "ocif-staker",
            "--outcome",
            "dropped",
            "move-stake",
            "--from",
            "1",
            "--to",
            "2",
            "--amount",
            "75",
        ])
        .unwrap();
        assert_eq!(cli.outcome, OutcomeArg::Dropped);
        assert!(matches!(cli.command, Commands::MoveStake { from: 1, to: 2, .. }));
    }
}
