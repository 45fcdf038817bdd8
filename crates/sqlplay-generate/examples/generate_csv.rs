use std::env;
use std::path::PathBuf;

use sqlplay_generate::{GenerateOptions, GenerationEngine, Scenario};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args = env::args().skip(1);
    let mut seed: u64 = 1234;
    let mut rows: usize = 100;
    let mut scenario = Scenario::Consumption;
    let mut out_dir = PathBuf::from("out");

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seed" => seed = args.next().ok_or("missing --seed value")?.parse()?,
            "--rows" => rows = args.next().ok_or("missing --rows value")?.parse()?,
            "--scenario" => scenario = args.next().ok_or("missing --scenario value")?.parse()?,
            "--out" => out_dir = args.next().map(PathBuf::from).ok_or("missing --out path")?,
            _ => return Err(format!("unexpected argument '{arg}'").into()),
        }
    }

    let options = GenerateOptions {
        scenario,
        ..GenerateOptions::default()
    };
    let dataset = GenerationEngine::new(options).generate(seed, rows)?;

    std::fs::create_dir_all(&out_dir)?;
    for table in dataset.tables() {
        let path = out_dir.join(format!("{}.csv", table.name()));
        let file = std::fs::File::create(&path)?;
        sqlplay_core::write_csv(file, table)?;
        println!("{}", path.display());
    }
    Ok(())
}
