//! Extracts a daily maximum temperature series for one point over a few
//! years and prints a summary per year.
//!
//! Run with `RUST_LOG=info cargo run --example extract_point -- <data dir>`.

use climgrid::{ClimGrid, ClimGridError, DataPoint, DatasetKind};
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimGridError> {
    env_logger::init();

    let client = match env::args().nth(1) {
        Some(dir) => ClimGrid::with_data_folder(dir.into()).await?,
        None => ClimGrid::new().await?,
    };
    println!("Reading grids from {}", client.config().data_dir.display());

    let result = client
        .extract()
        .kind(DatasetKind::Temperature)
        .points(DataPoint::new(19.0, 73.0))
        .years(2010..=2012)
        .call()
        .await;

    let batch = match result {
        Ok(batch) => batch,
        Err(e) if e.is_no_data() => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    for unit in &batch {
        let observed: Vec<f32> = unit.series.rows.iter().filter_map(|r| r.value).collect();
        let mean = observed.iter().sum::<f32>() / observed.len().max(1) as f32;
        println!(
            "{}: {} days, {} observed, mean {:.1}",
            unit.id,
            unit.series.len(),
            observed.len(),
            mean
        );
    }
    Ok(())
}
