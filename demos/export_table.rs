//! Handles a form-style request for every point of a coordinate table and
//! writes the export next to it.
//!
//! Usage: `cargo run --example export_table -- <data dir> <points.csv> <out dir>`

use climgrid::{ClimGrid, ClimGridError, DatasetKind, RequestParams};
use std::env;

#[tokio::main]
async fn main() -> Result<(), ClimGridError> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let [data_dir, table, out_dir] = args.as_slice() else {
        eprintln!("usage: export_table <data dir> <points.csv> <out dir>");
        return Ok(());
    };

    let client = ClimGrid::with_data_folder(data_dir.into()).await?;
    let params = RequestParams {
        coord_type: Some("excel".to_string()),
        year_type: Some("range".to_string()),
        start_year: Some("2010".to_string()),
        end_year: Some("2011".to_string()),
        ..Default::default()
    };

    match client
        .from_params()
        .params(params)
        .kind(DatasetKind::Temperature)
        .coordinate_table(table)
        .destination(out_dir)
        .call()
        .await
    {
        Ok(path) => println!("Export written to {}", path.display()),
        Err(e) if e.is_no_data() => println!("{}", e),
        Err(e) => return Err(e),
    }
    Ok(())
}
