use std::io::{self, Write};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{Local, SecondsFormat};
use clap::Parser;

use streamvote::evaluation::{CurveFormat, Snapshot};
use streamvote::tasks::PrequentialEvaluator;
use streamvote::ui::cli::args::{Cli, Command};
use streamvote::ui::cli::describe::describe;
use streamvote::ui::types::build::{build_evaluator, build_learner, build_stream};
use streamvote::ui::types::choices::{LearnerKind, StreamKind, TaskChoice};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const FG_CYAN: &str = "\x1b[36m";
const FG_GREEN: &str = "\x1b[32m";
const FG_MAGENTA: &str = "\x1b[35m";
const FG_YELLOW: &str = "\x1b[33m";
const FG_GREY: &str = "\x1b[90m";

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .with_writer(io::stderr)
        .init();

    let task = match cli.command {
        Command::Run(args) => args.into_task_choice()?,
        Command::Describe(args) => {
            print!("{}", describe(&args)?);
            return Ok(());
        }
    };

    let TaskChoice::EvaluatePrequential(p) = task;
    let max_instances = p.max_instances;
    let max_seconds = p.max_seconds;

    let learner_kind: &'static str = LearnerKind::from(&p.learner).into();
    let stream_kind: &'static str = StreamKind::from(&p.stream).into();
    let header = vec![
        format!("{BOLD}{FG_CYAN}▶ Prequential Evaluation{RESET}  {learner_kind} on {stream_kind}"),
        format!(
            "{DIM}sample_freq={}  started {}{RESET}",
            p.sample_frequency,
            timestamp()
        ),
        format!("{FG_GREY}{}{RESET}", "─".repeat(72)),
    ];

    let stream = build_stream(p.stream).context("failed to build stream")?;
    let num_classes = stream.header().number_of_classes();
    let evaluator =
        build_evaluator(p.evaluator, num_classes).context("failed to build evaluator")?;
    let learner = build_learner(p.learner).context("failed to build learner")?;

    let (tx, rx) = std::sync::mpsc::channel();
    let mut runner = PrequentialEvaluator::new(
        learner,
        stream,
        evaluator,
        max_instances,
        max_seconds,
        p.sample_frequency,
    )
    .context("failed to construct PrequentialEvaluator")?
    .with_progress(tx);

    let status = StatusLine {
        header,
        repaint: Duration::from_millis(150),
        max_instances,
        max_seconds,
    };
    let render: JoinHandle<()> = std::thread::spawn(move || status.follow(rx));

    runner.run().context("runner failed")?;

    if let Some(path) = p.dump_file
        && !path.as_os_str().is_empty()
    {
        runner
            .curve()
            .export(&path, CurveFormat::from(p.dump_format))
            .with_context(|| format!("failed to export snapshots to {}", path.display()))?;
    }

    drop(runner);
    let _ = render.join();

    Ok(())
}

/// Live one-line status fed by the evaluator's snapshot channel.
struct StatusLine {
    header: Vec<String>,
    repaint: Duration,
    max_instances: Option<u64>,
    max_seconds: Option<u64>,
}

impl StatusLine {
    /// Prints the header, then redraws in place until the runner hangs up.
    fn follow(self, rx: Receiver<Snapshot>) {
        let mut out = io::stdout();
        for line in &self.header {
            let _ = writeln!(out, "{line}");
        }
        let _ = writeln!(out);
        let _ = out.flush();

        let mut last_draw = Instant::now();
        let mut latest: Option<Snapshot> = None;
        loop {
            match rx.recv_timeout(self.repaint) {
                Ok(s) => latest = Some(s),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if let Some(s) = &latest {
                        let _ = write!(out, "\r{}\x1B[K\n", self.render(s));
                        let _ = out.flush();
                    }
                    return;
                }
            }
            if last_draw.elapsed() >= self.repaint {
                if let Some(s) = &latest {
                    let _ = write!(out, "\r{}\x1B[K", self.render(s));
                    let _ = out.flush();
                }
                last_draw = Instant::now();
            }
        }
    }

    fn render(&self, s: &Snapshot) -> String {
        let mut parts = vec![
            format!("{FG_GREEN}{BOLD}seen{RESET} {:>9}", s.instances_seen),
            format!("{FG_CYAN}{BOLD}acc{RESET} {}%", percent(s.accuracy)),
            format!("{FG_MAGENTA}{BOLD}κ{RESET} {}%", percent(s.kappa)),
        ];
        if let Some(v) = s.extras.get("ensemble_mean_active_fitness") {
            parts.push(format!("{FG_YELLOW}fit{RESET} {v:.4}"));
        }
        if let Some(v) = s.extras.get("ensemble_reselections") {
            parts.push(format!("{DIM}resel{RESET} {v:.0}"));
        }
        parts.push(format!("{DIM}cpu{RESET} {:.3}s", s.seconds));

        if let Some(total) = self.max_instances {
            parts.push(format!(
                "{DIM}[inst]{RESET} {}",
                bar(s.instances_seen as f64 / total as f64)
            ));
        }
        if let Some(total) = self.max_seconds {
            parts.push(format!("{DIM}[time]{RESET} {}", bar(s.seconds / total as f64)));
        }
        parts.join("  ")
    }
}

fn percent(x: f64) -> String {
    if x.is_nan() {
        format!("{DIM}    NaN{RESET}")
    } else {
        format!("{:>7.3}", x * 100.0)
    }
}

fn bar(ratio: f64) -> String {
    const WIDTH: usize = 15;
    if !ratio.is_finite() {
        return String::new();
    }
    let ratio = ratio.clamp(0.0, 1.0);
    let filled = (ratio * WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "█".repeat(filled),
        "░".repeat(WIDTH - filled),
        ratio * 100.0
    )
}

fn timestamp() -> String {
    Local::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
