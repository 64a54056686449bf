// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Command-line runner: picks a baseline competitor, runs it against a
//! suite directory, prints the JSON score report, and writes it into the
//! output directory.

use crucible_harness::{
    category::TrainingCategory, competitor::Competitor, harness::HarnessBuilder,
    report::ScoreReport,
};
use crucible_strategies::{
    annealing::AnnealingScheduleTuner, hill_climber::NextAscentHillClimber,
    random_search::RandomSearch,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{
    error::Error,
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CompetitorKind {
    Random,
    HillClimber,
    Annealer,
}

impl CompetitorKind {
    fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Some(Self::Random),
            "hill-climber" | "hillclimber" => Some(Self::HillClimber),
            "annealer" | "annealing" => Some(Self::Annealer),
            _ => None,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            CompetitorKind::Random => "random",
            CompetitorKind::HillClimber => "hill-climber",
            CompetitorKind::Annealer => "annealer",
        }
    }
}

#[derive(Debug, Clone)]
struct Cli {
    suite: Option<PathBuf>,
    competitor: CompetitorKind,
    category: TrainingCategory,
    base_time_secs: u64,
    seed: Option<u64>,
    out_dir: PathBuf,
}

fn parse_cli() -> Cli {
    let mut args = std::env::args().skip(1);

    let mut suite: Option<PathBuf> = None;
    let mut competitor = CompetitorKind::Random;
    let mut category = TrainingCategory::Short;
    let mut base_time_secs: u64 = 250;
    let mut seed: Option<u64> = None;
    let mut out_dir = PathBuf::from("results");

    while let Some(a) = args.next() {
        match a.as_str() {
            "--suite" => suite = args.next().map(PathBuf::from),
            "--competitor" => {
                competitor = args
                    .next()
                    .and_then(|s| CompetitorKind::from_str(&s))
                    .unwrap_or(competitor)
            }
            "--category" => {
                category = args
                    .next()
                    .and_then(|s| TrainingCategory::from_str(&s))
                    .unwrap_or(category)
            }
            "--base-time-secs" => {
                base_time_secs = args
                    .next()
                    .and_then(|x| x.parse().ok())
                    .unwrap_or(base_time_secs)
            }
            "--seed" => seed = args.next().and_then(|x| x.parse().ok()),
            "--out" => out_dir = args.next().map(PathBuf::from).unwrap_or(out_dir),
            _ => {}
        }
    }

    Cli {
        suite,
        competitor,
        category,
        base_time_secs,
        seed,
        out_dir,
    }
}

fn enable_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn ensure_dir(p: &Path) {
    if !p.exists() {
        let _ = std::fs::create_dir_all(p);
    }
}

/// Writes the report next to a temp file and renames it into place so a
/// crashed run never leaves a half-written report behind.
fn write_report(path: &Path, json: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let mut f = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&tmp_path)?;
    f.write_all(json.as_bytes())?;
    f.sync_all()?;
    std::fs::rename(tmp_path, path)?;
    Ok(())
}

fn build_competitor(
    kind: CompetitorKind,
    category: TrainingCategory,
    rng: ChaCha8Rng,
) -> Result<Box<dyn Competitor>, Box<dyn Error>> {
    match kind {
        CompetitorKind::Random => Ok(Box::new(RandomSearch::new(rng))),
        CompetitorKind::HillClimber => Ok(Box::new(NextAscentHillClimber::new(rng))),
        CompetitorKind::Annealer => {
            if !category.has_training_phase() {
                return Err("the annealer needs --category short or long".into());
            }
            Ok(Box::new(AnnealingScheduleTuner::new(category, rng)))
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    enable_tracing();

    let cli = parse_cli();
    let suite = cli
        .suite
        .clone()
        .ok_or("usage: crucible --suite <dir> [--competitor random|hill-climber|annealer] [--category none|short|long] [--base-time-secs N] [--seed N] [--out <dir>]")?;

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(
        suite = %suite.display(),
        competitor = cli.competitor.as_str(),
        category = cli.category.as_str(),
        base_time_secs = cli.base_time_secs,
        seed,
        "run configuration"
    );

    let rng = ChaCha8Rng::seed_from_u64(seed);
    let mut competitor = build_competitor(cli.competitor, cli.category, rng)?;

    let mut harness = HarnessBuilder::new()
        .base_time_per_instance(Duration::from_secs(cli.base_time_secs))
        .build();

    let report: ScoreReport = harness.run(competitor.as_mut(), &suite)?;

    let json = serde_json::to_string_pretty(&report)?;
    println!("{json}");

    ensure_dir(&cli.out_dir);
    let path = cli.out_dir.join(report.file_name());
    write_report(&path, &json)?;
    info!(path = %path.display(), "report written");

    Ok(())
}
