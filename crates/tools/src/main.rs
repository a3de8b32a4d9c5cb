use std::fs;
use std::path::PathBuf;

use catalog::FileCatalogSource;
use chart::{ChartController, ChartOptions, deep_merge};
use clap::Parser;
use runtime::EventKind;
use serde_json::{Map, Value, json};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a star chart to SVG")]
struct Args {
    /// JSON options file, merged over the defaults
    #[arg(long)]
    options: Option<PathBuf>,

    /// Star catalog location
    #[arg(long)]
    stars: Option<String>,

    /// Deep-sky object catalog location
    #[arg(long)]
    objects: Option<String>,

    /// Constellation line catalog location
    #[arg(long)]
    constellations: Option<String>,

    /// Observation time, RFC 3339 (e.g. 2024-01-01T03:00:00Z)
    #[arg(long)]
    datetime: Option<String>,

    /// Observer latitude in degrees
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<f64>,

    /// Observer longitude in degrees, east positive
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<f64>,

    /// Fixed chart center, right ascension in hours
    #[arg(long, requires = "dec", conflicts_with_all = ["lat", "lon"])]
    ra: Option<f64>,

    /// Fixed chart center, declination in degrees
    #[arg(long, allow_hyphen_values = true, requires = "ra")]
    dec: Option<f64>,

    /// Directory relative catalog locations are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Output SVG file
    #[arg(short, long)]
    output: PathBuf,
}

impl Args {
    /// Options patch for the flags that were given.
    fn patch(&self) -> Value {
        let mut patch = Map::new();

        let mut data = Map::new();
        for (key, value) in [
            ("stars", &self.stars),
            ("objects", &self.objects),
            ("constellations", &self.constellations),
        ] {
            if let Some(location) = value {
                data.insert(key.to_string(), json!(location));
            }
        }
        if !data.is_empty() {
            patch.insert("data".to_string(), Value::Object(data));
        }

        if let Some(datetime) = &self.datetime {
            patch.insert("datetime".to_string(), json!(datetime));
        }
        if let (Some(latitude), Some(longitude)) = (self.lat, self.lon) {
            patch.insert(
                "location".to_string(),
                json!({"latitude": latitude, "longitude": longitude}),
            );
            // An explicit place means a zenith chart even if the file set a center.
            patch.insert("center".to_string(), Value::Null);
        }
        if let (Some(ra), Some(dec)) = (self.ra, self.dec) {
            patch.insert("center".to_string(), json!({"ra": ra, "dec": dec}));
        }
        Value::Object(patch)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    let args = Args::parse();

    let mut patch = match &args.options {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
            serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))?
        }
        None => json!({}),
    };
    deep_merge(&mut patch, &args.patch());

    let options = ChartOptions::from_json(&patch).map_err(|e| e.to_string())?;
    let mut chart = ChartController::new(options).map_err(|e| e.to_string())?;
    chart.run_until_idle(&FileCatalogSource::new(&args.root));

    let failed = chart
        .events()
        .iter()
        .filter(|e| e.kind == EventKind::CatalogFailed)
        .count();

    fs::write(&args.output, chart.to_svg())
        .map_err(|e| format!("{}: {e}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        symbols = chart.frame().symbol_count(),
        labels = chart.frame().labels.len(),
        failed_catalogs = failed,
        "chart written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("starchart").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn location_flags_clear_center() {
        let args = parse(&[
            "--lat", "40.7528", "--lon", "-73.9765222", "--stars", "hd.json", "-o", "out.svg",
        ]);
        assert_eq!(
            args.patch(),
            json!({
                "data": {"stars": "hd.json"},
                "location": {"latitude": 40.7528, "longitude": -73.9765222},
                "center": null
            })
        );
    }

    #[test]
    fn center_flags_need_both_and_exclude_location() {
        let args = parse(&["--ra", "5.8", "--dec", "-1.5", "-o", "out.svg"]);
        assert_eq!(args.patch(), json!({"center": {"ra": 5.8, "dec": -1.5}}));

        let argv = ["starchart", "--ra", "5.8", "-o", "out.svg"];
        assert!(Args::try_parse_from(argv).is_err());
        let argv = ["starchart", "--ra", "5", "--dec", "0", "--lat", "1", "--lon", "2", "-o", "x"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn output_is_required() {
        assert!(Args::try_parse_from(["starchart", "--datetime", "2024-01-01T03:00:00Z"]).is_err());
    }

    #[test]
    fn empty_patch_without_flags() {
        assert_eq!(parse(&["-o", "out.svg"]).patch(), json!({}));
    }
}
