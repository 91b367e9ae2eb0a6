// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Parses the command line and hands a TrainConfig to the
// training use case. No subcommands: every invocation is one
// training run.

pub mod args;

use anyhow::Result;
use clap::Parser;

use args::TrainArgs;

#[derive(Parser, Debug)]
#[command(
    name = "cifar10-trainer",
    version,
    about = "CIFAR-10 classification: train a CNN and record per-epoch metrics."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: TrainArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!(
            "Training {} for {} epochs (batch size {}, device '{}')",
            self.args.model_name, self.args.epochs, self.args.batch_size, self.args.gpu
        );

        let record = TrainUseCase::new(self.args.into()).execute()?;

        println!("Training complete. Metrics saved to {}", record.filename);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["cifar10-trainer"]).unwrap();
        let cfg: TrainConfig = cli.args.into();
        assert_eq!(cfg.epochs, 100);
        assert_eq!(cfg.batch_size, 256);
        assert_eq!(cfg.gpu, "3");
        assert_eq!(cfg.model_name, "alexnet");
        assert!(!cfg.pretrained);
        assert_eq!(cfg.learning_rate, 0.1);
        assert_eq!(cfg.num_workers, 4);
        assert_eq!(cfg.seed, None);
    }

    #[test]
    fn test_explicit_flags() {
        let cli = Cli::try_parse_from([
            "cifar10-trainer",
            "--epochs", "1",
            "--batch-size", "4",
            "--gpu", "cpu",
            "--model-name", "base-model",
            "--pretrained", "true",
            "--seed", "7",
        ])
        .unwrap();
        let cfg: TrainConfig = cli.args.into();
        assert_eq!(cfg.epochs, 1);
        assert_eq!(cfg.batch_size, 4);
        assert_eq!(cfg.gpu, "cpu");
        assert_eq!(cfg.model_name, "base-model");
        assert!(cfg.pretrained);
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn test_rejects_subcommand_style_input() {
        assert!(Cli::try_parse_from(["cifar10-trainer", "train"]).is_err());
    }
}
