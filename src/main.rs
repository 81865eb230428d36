use anyhow::Result;
use std::env;

use employee_import::{logging, write_rejections, BatchProcessor, ImportConfig, SqliteStore};

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() > 1 && args[1] == "import" {
        logging::init();
        run_import(args.get(2).map(String::as_str))?;
    } else {
        eprintln!("Usage: employee-import import [config.json]");
        std::process::exit(2);
    }

    Ok(())
}

fn run_import(config_path: Option<&str>) -> Result<()> {
    println!("🗄️  Employee Roster Import - CSV → SQLite");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // 1. Config
    let config = match config_path {
        Some(path) => ImportConfig::from_file(path)?,
        None => ImportConfig::default(),
    };

    // 2. Database
    println!("\n🔧 Opening database {}...", config.database_path.display());
    let mut store = SqliteStore::open(&config.database_path)?;

    // 3. Validate roster and persist the batch
    println!("\n📂 Importing {}...", config.input_path.display());
    let processor = BatchProcessor::new(config.grade_bounds());
    let report = processor.run(&config.input_path, &mut store)?;
    store.record_import_run(&report)?;

    // 4. Rejections
    if let Some(path) = &config.rejections_path {
        write_rejections(path, &report.rejected)?;
        println!("✓ {} rejected lines written to {}", report.rejected.len(), path.display());
    }

    println!("\n━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("{}", report.summary());
    if report.is_clean() {
        println!("✅ All lines imported");
    } else if report.source_error.is_none() {
        println!("⚠️  {} lines rejected, see log", report.rejected.len());
    }

    Ok(())
}
