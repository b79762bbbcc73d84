use std::path::Path;

use clap::{Parser, Subcommand};
use ruleta_core::{EntropySource, Game, SpinLedger, SpinRecord, SqliteLedger, Statistics};

#[derive(Parser)]
#[command(name = "ruleta-cli", about = "Admin CLI for ruleta server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Database URL, default sqlite://ruleta.db
    #[arg(long, value_parser, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// View last N spins, newest first
    ViewLogs {
        #[arg(default_value_t = 20)]
        n: usize,
    },
    /// Export all spins to CSV path
    ExportCsv { path: String },
    /// Print statistics over the recent window
    Stats,
    /// Destroy every recorded spin
    Reset,
}

fn format_record(r: &SpinRecord) -> String {
    format!(
        "#{:>6} {} result={} color={}",
        r.spin_number,
        r.timestamp.to_rfc3339(),
        r.outcome.code(),
        r.color()
    )
}

fn format_statistics(s: &Statistics) -> String {
    format!(
        "total_spins={} results_shown={}\n\
         azul={} ({:.2}%) morado={} ({:.2}%) amarillo={} ({:.2}%)\n\
         spins_since_last_purple={} spins_since_last_yellow={}",
        s.total_spins,
        s.results_shown,
        s.color_counts.blue,
        s.percentages.blue,
        s.color_counts.purple,
        s.percentages.purple,
        s.color_counts.yellow,
        s.percentages.yellow,
        s.spins_since_last_purple,
        s.spins_since_last_yellow
    )
}

async fn export_csv<L: SpinLedger>(ledger: &L, path: &Path) -> anyhow::Result<usize> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["spin_number", "result", "color", "timestamp"])?;
    let rows = ledger.all().await?;
    for r in &rows {
        wtr.write_record(&[
            r.spin_number.to_string(),
            r.outcome.code().to_string(),
            r.color().to_string(),
            r.timestamp.to_rfc3339(),
        ])?;
    }
    wtr.flush()?;
    Ok(rows.len())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let url = cli
        .database_url
        .unwrap_or_else(|| "sqlite://ruleta.db".into());
    let ledger = SqliteLedger::connect(&url).await?;

    match cli.command {
        Commands::ViewLogs { n } => {
            let rows = ledger.recent(n).await?;
            for r in rows.iter().rev() {
                println!("{}", format_record(r));
            }
        }
        Commands::ExportCsv { path } => {
            let total = export_csv(&ledger, Path::new(&path)).await?;
            println!("Exported {} rows to {}", total, path);
        }
        Commands::Stats => {
            let game = Game::open(ledger, Box::new(EntropySource::new())).await?;
            let stats = game.statistics().await?;
            println!("{}", format_statistics(&stats));
        }
        Commands::Reset => {
            let removed = ledger.count().await?;
            ledger.reset().await?;
            println!("Reset ledger, removed {} spins", removed);
        }
    }

    Ok(())
}
