use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use section_sorter::config::{EnrichConfig, DEFAULT_ENDPOINT};
use section_sorter::notify::{dispatch, LogSink};
use section_sorter::validate::{validate_records, validate_section_count};
use section_sorter::verify::{apply_corrections, verify_reported};
use section_sorter::{load, process_batch, report, Fetcher, LeetCodeSource, PartitionPolicy};

#[derive(Parser)]
#[command(name = "section-sorter")]
#[command(about = "Rank students and split them into balanced sections", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct LookupArgs {
    /// Concurrent solved-count lookups
    #[arg(long, default_value_t = 4)]
    workers: usize,
    /// Attempts per handle before giving up
    #[arg(long, default_value_t = 3)]
    max_retries: u32,
    /// Seconds to wait between attempts
    #[arg(long, default_value_t = 2)]
    retry_delay: u64,
    /// Seconds to wait between verification attempts
    #[arg(long, default_value_t = 5)]
    verify_delay: u64,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout: u64,
    /// Give up on unresolved lookups after this many seconds
    #[arg(long)]
    deadline: Option<u64>,
    #[arg(long, env = "LEETCODE_GRAPHQL_URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,
}

impl LookupArgs {
    fn config(&self) -> EnrichConfig {
        EnrichConfig {
            workers: self.workers,
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay),
            verify_delay: Duration::from_secs(self.verify_delay),
            request_timeout: Duration::from_secs(self.timeout),
            deadline: self.deadline.map(Duration::from_secs),
            endpoint: self.endpoint.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score a cohort CSV and assign sections
    Group {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, allow_negative_numbers = true)]
        sections: i64,
        #[arg(long, value_enum, default_value_t = PartitionPolicy::RankBanded)]
        policy: PartitionPolicy,
        /// Look up solved counts for rows that did not report one
        #[arg(long)]
        enrich: bool,
        /// Re-check reported solved counts and correct mismatches before scoring
        #[arg(long)]
        verify: bool,
        /// Log a notification for every student whose section changed
        #[arg(long)]
        notify: bool,
        #[arg(long, default_value = "grouped_students.csv")]
        out: PathBuf,
        #[arg(long = "report")]
        report_path: Option<PathBuf>,
        #[command(flatten)]
        lookup: LookupArgs,
    },
    /// Compare reported solved counts against the lookup service
    Verify {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long = "report")]
        report_path: Option<PathBuf>,
        #[command(flatten)]
        lookup: LookupArgs,
    },
}

fn build_fetcher(config: &EnrichConfig) -> anyhow::Result<Fetcher> {
    let source = LeetCodeSource::new(config).context("failed to build LeetCode client")?;
    Ok(Fetcher::new(Arc::new(source), config.retry_policy()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "section_sorter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let today = chrono::Utc::now().date_naive();

    match cli.command {
        Commands::Group {
            csv,
            sections,
            policy,
            enrich,
            verify,
            notify,
            out,
            report_path,
            lookup,
        } => {
            let config = lookup.config();
            let mut students = load::load_students(&csv)?;
            validate_records(&students).context("invalid student batch")?;
            validate_section_count(sections, students.len()).context("invalid section count")?;

            let fetcher = if enrich || verify {
                Some(build_fetcher(&config)?)
            } else {
                None
            };

            if verify {
                if let Some(fetcher) = &fetcher {
                    let outcomes = verify_reported(fetcher, &students, &config)
                        .await
                        .context("failed to verify solved counts")?;
                    students = apply_corrections(students, &outcomes);
                }
            }

            let lookup = if enrich { fetcher.as_ref() } else { None };
            let outcome = process_batch(students, lookup, sections, policy, &config)
                .await
                .context("failed to section batch")?;

            load::save_grouped(&out, &outcome.sectioned)?;
            println!(
                "Sectioned {} students into {} sections; {} changed section.",
                outcome.sectioned.len(),
                sections,
                outcome.changes.len()
            );
            println!("Grouped table written to {}.", out.display());

            if let Some(path) = report_path {
                std::fs::write(&path, report::build_report(today, policy, &outcome))?;
                println!("Report written to {}.", path.display());
            }

            if notify {
                let summary = dispatch(&LogSink, &outcome.sectioned, &outcome.changes).await;
                println!(
                    "Notifications: {} delivered, {} failed.",
                    summary.delivered, summary.failed
                );
            }
        }
        Commands::Verify {
            csv,
            report_path,
            lookup,
        } => {
            let config = lookup.config();
            let students = load::load_students(&csv)?;
            let fetcher = build_fetcher(&config)?;
            let outcomes = verify_reported(&fetcher, &students, &config)
                .await
                .context("failed to verify solved counts")?;
            let text = report::build_verification_report(today, &outcomes);

            match report_path {
                Some(path) => {
                    std::fs::write(&path, text)?;
                    println!("Verification written to {}.", path.display());
                }
                None => print!("{text}"),
            }
        }
    }

    Ok(())
}
