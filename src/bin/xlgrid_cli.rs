//! CLI tool for xlgrid - replays an intent script and outputs the final
//! state as JSON
//!
//! Usage:
//!   xlgrid_cli <script.json>              # Output JSON to stdout
//!   xlgrid_cli <script.json> -o out.json  # Output JSON to file
//!
//! A script looks like:
//!   {"config": {...}, "mergedRegions": [...], "usedRange": [rows, cols],
//!    "intents": [{"type": "scrollToCell", "row": 500000, "col": 0}, ...]}
//!
//! Set `RUST_LOG=xlgrid=debug` to trace transitions on stderr.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;
use xlgrid::layout::{Scrollbars, VisibleRange};
use xlgrid::{CellRange, EngineConfig, GridEngine, GridState, Intent, MergeTable};

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Script {
    config: EngineConfig,
    merged_regions: Vec<CellRange>,
    /// `[rowCount, colCount]` answered by the used-range source
    used_range: Option<(u32, u32)>,
    intents: Vec<Intent>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Report<'a> {
    state: &'a GridState,
    scrollbars: Scrollbars,
    visible_range: VisibleRange,
    /// Change bitset per intent
    changes: Vec<u32>,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: xlgrid_cli <script.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    // Read script
    let text = match fs::read_to_string(input_path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error reading {}: {}", input_path, e);
            std::process::exit(1);
        }
    };
    let script: Script = match serde_json::from_str(&text) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error parsing script: {}", e);
            std::process::exit(1);
        }
    };

    // Build engine
    let mut engine = match GridEngine::new(script.config) {
        Ok(engine) => engine.with_merge_lookup(MergeTable::new(script.merged_regions)),
        Err(e) => {
            eprintln!("Error in config: {}", e);
            std::process::exit(1);
        }
    };
    if let Some((rows, cols)) = script.used_range {
        engine = engine.with_used_range_source(move || -> xlgrid::Result<(u32, u32)> {
            Ok((rows, cols))
        });
        engine.refresh_used_range();
    }

    // Replay
    let changes: Vec<u32> = script
        .intents
        .into_iter()
        .map(|intent| engine.dispatch(intent).bits())
        .collect();

    let report = Report {
        state: engine.state(),
        scrollbars: engine.scrollbars(),
        visible_range: engine.visible_range(),
        changes,
    };
    let json = match serde_json::to_string_pretty(&report) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("Error serializing JSON: {}", e);
            std::process::exit(1);
        }
    };

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = fs::write(path, &json) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
