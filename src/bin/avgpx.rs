// ============================================================================
// avgpx
// Reads exchange messages and prints the average fill price of every chain
// ============================================================================

use anyhow::{Context, Result};
use clap::Parser;
use fill_analytics::domain::config::DEFAULT_SUPERSEDED_CAPACITY;
use fill_analytics::domain::{AveragePriceLine, ProcessorConfig};
use fill_analytics::engine::{AveragePriceProcessor, ProcessError};
use fill_analytics::interfaces::{EventHandler, LoggingEventHandler, NoOpEventHandler};
use fill_analytics::utils::{PacingConfig, TaskStatus, TimedTaskProcessor};
use parking_lot::Mutex;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "avgpx")]
#[command(version)]
#[command(about = "Average fill price per order chain", long_about = None)]
struct Args {
    /// Message file, one message per line (stdin when omitted)
    input: Option<PathBuf>,

    /// Fail on the first invalid message instead of skipping it
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Decimal places of the reported average price
    #[arg(short, long, default_value_t = 2)]
    decimals: u32,

    /// Superseded order ids kept resolvable for late fills
    #[arg(long, default_value_t = DEFAULT_SUPERSEDED_CAPACITY)]
    superseded_capacity: usize,

    /// Replay messages at this many per second (0 processes immediately)
    #[arg(short, long, default_value_t = 0)]
    rate: u32,

    /// Pause between replay cycles in milliseconds
    #[arg(long, default_value_t = 0)]
    cycle_pause_ms: u64,

    /// Print one JSON object per chain
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Log chain events at debug level
    #[arg(long, default_value_t = false)]
    trace_events: bool,

    /// Log level
    #[arg(short = 'l', long, default_value = "warn", value_parser = ["trace", "debug", "info", "warn", "error"])]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let config = if args.strict {
        ProcessorConfig::strict()
    } else {
        ProcessorConfig::lenient()
    }
    .with_price_decimals(args.decimals)
    .with_superseded_capacity(args.superseded_capacity);

    let handler: Arc<dyn EventHandler> = if args.trace_events {
        Arc::new(LoggingEventHandler)
    } else {
        Arc::new(NoOpEventHandler)
    };

    let processor =
        AveragePriceProcessor::new(config, handler).context("invalid processor configuration")?;
    let lines = read_lines(args.input.as_ref())?;

    let processor = if args.rate == 0 {
        let mut processor = processor;
        processor.process_lines(&lines)?;
        processor
    } else {
        let pacing = PacingConfig::new(args.rate)
            .with_cycle_pause(Duration::from_millis(args.cycle_pause_ms));
        replay(processor, lines, pacing)?
    };

    tracing::info!(
        lines = processor.lines_processed(),
        rejected = processor.rejected(),
        chains = processor.tracker().len(),
        "done"
    );

    write_report(&processor.report(), args.json)
}

fn read_lines(input: Option<&PathBuf>) -> Result<Vec<String>> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };
    reader
        .lines()
        .collect::<io::Result<Vec<_>>>()
        .context("failed to read messages")
}

/// Feed one line per pacing slot on a worker thread
fn replay(
    processor: AveragePriceProcessor,
    lines: Vec<String>,
    pacing: PacingConfig,
) -> Result<AveragePriceProcessor> {
    let state: Arc<Mutex<(AveragePriceProcessor, Option<ProcessError>)>> =
        Arc::new(Mutex::new((processor, None)));
    let worker_state = Arc::clone(&state);
    let mut pending = lines.into_iter();

    let worker = TimedTaskProcessor::start(
        move |_slot| {
            let Some(line) = pending.next() else {
                return TaskStatus::Done;
            };
            let mut guard = worker_state.lock();
            let (processor, failure) = &mut *guard;
            match processor.process_line(&line) {
                Ok(()) => TaskStatus::Continue,
                Err(err) => {
                    *failure = Some(err);
                    TaskStatus::Done
                },
            }
        },
        pacing,
    )
    .context("invalid pacing configuration")?;

    worker
        .join()
        .map_err(|_| anyhow::anyhow!("replay worker panicked"))?;
    drop(worker);

    let (processor, failure) = Arc::try_unwrap(state)
        .map_err(|_| anyhow::anyhow!("replay state still shared"))?
        .into_inner();
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(processor),
    }
}

fn write_report(report: &[AveragePriceLine], json: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in report {
        if json {
            serde_json::to_writer(&mut out, line)?;
            writeln!(out)?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    out.flush()?;
    Ok(())
}

fn init_logging(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::parse_from(["avgpx"]);
        assert!(args.input.is_none());
        assert!(!args.strict);
        assert_eq!(args.decimals, 2);
        assert_eq!(args.rate, 0);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from([
            "avgpx", "--strict", "-d", "4", "--rate", "50", "--json", "msgs.txt",
        ]);
        assert!(args.strict);
        assert_eq!(args.decimals, 4);
        assert_eq!(args.rate, 50);
        assert!(args.json);
        assert_eq!(args.input, Some(PathBuf::from("msgs.txt")));
    }

    #[test]
    fn test_replay_processes_every_line() {
        let processor =
            AveragePriceProcessor::new(ProcessorConfig::strict(), Arc::new(NoOpEventHandler))
                .unwrap();
        let lines = vec![
            "new 1 AAPL buy 100 10.00".to_string(),
            "fill 1 40 10.00".to_string(),
            "modify 2 1 60 10.50".to_string(),
            "fill 2 60 10.25".to_string(),
        ];

        let processor = replay(processor, lines, PacingConfig::new(1000)).unwrap();
        let report = processor.report();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].to_string(), "1 AAPL 10.15");
    }

    #[test]
    fn test_replay_stops_on_strict_error() {
        let processor =
            AveragePriceProcessor::new(ProcessorConfig::strict(), Arc::new(NoOpEventHandler))
                .unwrap();
        let lines = vec!["fill 9 1 1.00".to_string(), "new 1 X buy 1 1".to_string()];

        let err = replay(processor, lines, PacingConfig::new(1000)).err().expect("replay should fail");
        assert!(err.to_string().contains("line 1"));
    }
}
