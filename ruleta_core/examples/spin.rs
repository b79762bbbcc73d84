use ruleta_core::{Game, MemoryLedger, SeededSource};

#[tokio::main]
async fn main() -> Result<(), ruleta_core::PersistenceError> {
    // Example run of 1000 reproducible spins
    let source = SeededSource::new("example-seed");
    let seed_hash = source.seed_hash_hex();
    let game = Game::open(MemoryLedger::new(), Box::new(source)).await?;
    for _ in 0..1000 {
        game.spin().await?;
    }
    let stats = game.statistics().await?;
    println!(
        "seed_hash={} total={} window={:?} since_purple={} since_yellow={}",
        seed_hash,
        stats.total_spins,
        stats.percentages,
        stats.spins_since_last_purple,
        stats.spins_since_last_yellow
    );
    Ok(())
}
