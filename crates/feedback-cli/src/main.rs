mod display;
mod prompt;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use feedback_core::config::{DEFAULT_API_URL, DEFAULT_PROJECT_ID, DEFAULT_TAXONOMY_ID};
use feedback_core::{AttributeRow, FormError, IngestConfig, PayloadBuilder, SubmissionForm};
use feedback_sync::Submitter;
use tracing::info;

#[derive(Parser)]
#[command(name = "feedback", version, about = "Submit a feedback message to the ingestion API")]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Ingestion target, fixed for the whole invocation.
#[derive(Args)]
struct TargetArgs {
    /// Project the submission is filed under
    #[arg(long, env = "FEEDBACK_PROJECT_ID", default_value = DEFAULT_PROJECT_ID, global = true)]
    project_id: String,
    /// Taxonomy used by the ingestion service
    #[arg(long, env = "FEEDBACK_TAXONOMY_ID", default_value = DEFAULT_TAXONOMY_ID, global = true)]
    taxonomy_id: String,
    /// Ingestion endpoint; an empty value disables sending
    #[arg(long, env = "FEEDBACK_API_URL", default_value = DEFAULT_API_URL, global = true)]
    api_url: String,
    /// Bearer token sent in the Authorization header
    #[arg(long, env = "FEEDBACK_API_TOKEN", default_value = "", hide_env_values = true, global = true)]
    api_token: String,
}

#[derive(Args)]
struct SendArgs {
    /// Also send `ticket_id` (same value as `unique_id`)
    #[arg(long)]
    ticket_id: bool,
    /// Build and preview the payload without sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a message given on the command line
    Submit {
        /// Feedback message (required, must not be blank)
        #[arg(long, short)]
        message: String,
        /// Where the message came from; blank means "Demo Data"
        #[arg(long, short, default_value = "")]
        source: String,
        /// Extra attribute as key=value (repeatable)
        #[arg(long = "attr", short = 'a', value_name = "KEY=VALUE", value_parser = parse_attr)]
        attrs: Vec<AttributeRow>,
        /// Score from 1 to 5
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
        score: Option<u8>,
        #[command(flatten)]
        send: SendArgs,
    },
    /// Fill the submission form interactively on stdin
    Form {
        #[command(flatten)]
        send: SendArgs,
    },
    /// Print the reference id derived from a message
    Id {
        message: String,
    },
}

fn parse_attr(s: &str) -> Result<AttributeRow, FormError> {
    AttributeRow::parse(s)
}

impl TargetArgs {
    fn into_config(self, emit_ticket_id: bool) -> IngestConfig {
        IngestConfig {
            project_id: self.project_id,
            taxonomy_id: self.taxonomy_id,
            api_url: self.api_url,
            api_token: self.api_token,
            emit_ticket_id,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    let (form, send) = match cli.command {
        Commands::Id { message } => {
            println!("{}", feedback_core::reference_id(&message));
            return Ok(ExitCode::SUCCESS);
        }
        Commands::Submit {
            message,
            source,
            attrs,
            score,
            send,
        } => {
            let mut form = SubmissionForm::new();
            form.set_message(message);
            form.set_source(source);
            form.set_score(score);
            for row in attrs {
                form.push_row(row);
            }
            (form, send)
        }
        Commands::Form { send } => {
            let stdin = io::stdin();
            let form = prompt::fill_form(&mut stdin.lock(), &mut io::stdout())?;
            (form, send)
        }
    };

    let config = cli.target.into_config(send.ticket_id);
    info!(project_id = %config.project_id, "submissions will be sent to project");
    Ok(run(&config, &form, send.dry_run).await?.into())
}

/// How a submission attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunStatus {
    Sent,
    Previewed,
    Invalid,
    Failed,
}

impl From<RunStatus> for ExitCode {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Sent | RunStatus::Previewed => ExitCode::SUCCESS,
            RunStatus::Failed => ExitCode::FAILURE,
            RunStatus::Invalid => ExitCode::from(2),
        }
    }
}

/// Validate, build, preview, and (unless `dry_run`) send one submission.
async fn run(config: &IngestConfig, form: &SubmissionForm, dry_run: bool) -> anyhow::Result<RunStatus> {
    let submission = match form.validate() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e}");
            return Ok(RunStatus::Invalid);
        }
    };

    let envelope = PayloadBuilder::new(config).build_submission(&submission);
    print!("{}", display::render_preview(&envelope)?);
    if dry_run {
        return Ok(RunStatus::Previewed);
    }

    let outcome = Submitter::new(config).send(&envelope).await;
    println!();
    print!("{}", display::render_outcome(&outcome)?);
    io::stdout().flush()?;

    Ok(if outcome.ok() {
        RunStatus::Sent
    } else {
        RunStatus::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_args_parse() {
        let cli = Cli::try_parse_from([
            "feedback",
            "submit",
            "-m",
            "Great service",
            "--attr",
            "platform=iOS",
            "-a",
            "country=MY",
            "--score",
            "5",
            "--ticket-id",
        ])
        .unwrap();
        match cli.command {
            Commands::Submit {
                message,
                source,
                attrs,
                score,
                send,
            } => {
                assert_eq!(message, "Great service");
                assert_eq!(source, "");
                assert_eq!(attrs.len(), 2);
                assert_eq!(attrs[0], AttributeRow::new("platform", "iOS"));
                assert_eq!(score, Some(5));
                assert!(send.ticket_id);
                assert!(!send.dry_run);
            }
            _ => panic!("expected submit"),
        }
    }

    #[test]
    fn score_out_of_range_rejected() {
        let err = Cli::try_parse_from(["feedback", "submit", "-m", "x", "--score", "6"]);
        assert!(err.is_err());
    }

    #[test]
    fn malformed_attr_rejected() {
        let err = Cli::try_parse_from(["feedback", "submit", "-m", "x", "--attr", "nokey"]);
        assert!(err.is_err());
    }

    #[test]
    fn target_flags_become_config() {
        let cli = Cli::try_parse_from([
            "feedback",
            "--project-id",
            "acme",
            "--api-url",
            "",
            "form",
            "--dry-run",
        ])
        .unwrap();
        let config = cli.target.into_config(false);
        assert_eq!(config.project_id, "acme");
        assert!(!config.sending_enabled());
        assert_eq!(config.score_scale, 5);
    }

    #[tokio::test]
    async fn blank_message_stops_before_sending() {
        let config = IngestConfig {
            // Would refuse any connection if a request were attempted.
            api_url: "http://127.0.0.1:9/".into(),
            ..Default::default()
        };
        let mut form = SubmissionForm::new();
        form.set_message("   ");
        let status = run(&config, &form, false).await.unwrap();
        assert_eq!(status, RunStatus::Invalid);
    }

    #[tokio::test]
    async fn blank_url_fails_without_network() {
        let config = IngestConfig {
            api_url: String::new(),
            ..Default::default()
        };
        let mut form = SubmissionForm::new();
        form.set_message("Great service");
        let status = run(&config, &form, false).await.unwrap();
        assert_eq!(status, RunStatus::Failed);
    }
}
