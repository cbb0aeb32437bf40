//! Run command implementation.

use segsim_core::{Config, SegmentStore, StoreStats, WriteEngine};
use segsim_workload::{drive, Distribution, DriveSummary, WorkloadGenerator};
use serde::Serialize;

/// Options for the run command.
#[derive(Debug)]
pub struct Options {
    /// Requests in the first batch.
    pub requests: usize,
    /// Request distribution.
    pub distribution: Distribution,
    /// Requests in the follow-up batch (0 = none).
    pub more: usize,
    /// Segments in the store.
    pub segments: usize,
    /// Byte capacity per segment.
    pub capacity: usize,
    /// GC trigger threshold.
    pub gc_threshold: f64,
    /// RNG seed.
    pub seed: u64,
    /// Whether to print per-segment details.
    pub segment_details: bool,
    /// Output format (text, json).
    pub format: String,
}

/// Full report of one simulation run.
#[derive(Debug, Serialize)]
struct RunReport {
    distribution: String,
    requests: usize,
    accepted: usize,
    dropped: usize,
    stats: StoreStats,
}

/// Runs the simulation and prints the report.
pub fn run(options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::new()
        .segment_capacity(options.capacity)
        .segment_count(options.segments)
        .gc_threshold(options.gc_threshold);
    config.validate()?;

    let engine = WriteEngine::from_config(&config);
    let mut store = SegmentStore::new(&config)?;
    let mut generator =
        WorkloadGenerator::new(options.distribution, options.capacity, options.seed);

    tracing::info!(
        distribution = %options.distribution,
        requests = options.requests,
        "generating workload"
    );
    let mut summary = drive(&engine, &mut store, &generator.batch(options.requests));
    let mut total_requests = options.requests;

    if options.more > 0 {
        tracing::info!(requests = options.more, "adding more workload");
        let extra = drive(&engine, &mut store, &generator.batch(options.more));
        summary = DriveSummary {
            accepted: summary.accepted + extra.accepted,
            dropped: summary.dropped + extra.dropped,
        };
        total_requests += options.more;
    }

    match options.format.as_str() {
        "json" => print_json(options, &store, total_requests, summary)?,
        _ => print_text(options, &store, total_requests, summary),
    }

    Ok(())
}

fn print_json(
    options: &Options,
    store: &SegmentStore,
    requests: usize,
    summary: DriveSummary,
) -> Result<(), Box<dyn std::error::Error>> {
    let report = RunReport {
        distribution: options.distribution.to_string(),
        requests,
        accepted: summary.accepted,
        dropped: summary.dropped,
        stats: store.stats(),
    };
    if options.segment_details {
        let used: Vec<_> = store
            .segment_stats()
            .into_iter()
            .filter(|seg| seg.utilization > 0)
            .collect();
        let combined = serde_json::json!({
            "run": report,
            "segments": used,
        });
        println!("{}", serde_json::to_string_pretty(&combined)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn print_text(options: &Options, store: &SegmentStore, requests: usize, summary: DriveSummary) {
    let stats = store.stats();

    println!("Workload Summary ({}):", options.distribution);
    println!("  Requests:                {requests}");
    println!(
        "  Accepted / dropped:      {} / {}",
        summary.accepted, summary.dropped
    );
    println!("  Total writes:            {}", stats.total_writes);
    println!("  Total invalidated bytes: {}", stats.total_invalidated);
    println!("  Total live bytes:        {}", stats.total_live_bytes);
    println!(
        "  Segments used:           {}/{}",
        stats.used_segments, stats.segment_count
    );
    println!("  Reclamations:            {}", stats.reclamation_count);
    println!(
        "  Total reclamation cost:  {:.2}",
        stats.total_reclamation_cost
    );

    if options.segment_details {
        println!();
        println!("Segment Details:");
        for seg in store.segment_stats() {
            if seg.utilization > 0 {
                println!(
                    "  {}: utilization {}/{}, invalidated bytes {}",
                    seg.id, seg.utilization, stats.segment_capacity, seg.invalidated_bytes
                );
            }
        }
    }
}
