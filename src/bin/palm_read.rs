use log::{info, warn};
use palm_reader::config::{load_config, ReaderToolConfig};
use palm_reader::image::io::{load_rgba_image, save_intensity_png, write_json_file};
use palm_reader::preprocess::to_intensity;
use palm_reader::{PalmParams, PalmReader};
use rayon::prelude::*;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config_path = env::args().nth(1).ok_or_else(usage)?;
    let config = load_config(Path::new(&config_path)).map_err(|e| e.to_string())?;
    let params = config.resolve_params().map_err(|e| e.to_string())?;
    let rules_json = config.rules.as_deref().and_then(|path| {
        fs::read_to_string(path)
            .map_err(|e| warn!("cannot read rules {}: {e}", path.display()))
            .ok()
    });

    let outcomes: Vec<(PathBuf, Result<String, String>)> = config
        .inputs
        .par_iter()
        .map(|input| {
            let outcome = process_one(&config, params, rules_json.as_deref(), input)
                .map_err(|e| e.to_string());
            (input.clone(), outcome)
        })
        .collect();

    let mut failures = 0usize;
    for (input, outcome) in outcomes {
        match outcome {
            Ok(summary) => println!("{}: {summary}", input.display()),
            Err(err) => {
                failures += 1;
                eprintln!("{}: {err}", input.display());
            }
        }
    }
    if failures > 0 {
        return Err(format!("{failures} of {} input(s) failed", config.inputs.len()));
    }
    Ok(())
}

fn process_one(
    config: &ReaderToolConfig,
    params: PalmParams,
    rules_json: Option<&str>,
    input: &Path,
) -> palm_reader::Result<String> {
    let photo = load_rgba_image(input)?;
    let image = photo.as_view();
    let result = PalmReader::new(params).process_with_rules_json(image, rules_json)?;

    let (json_path, png_path) = config.output_paths(input);
    write_json_file(&json_path, &result)?;
    if config.output.save_intensity {
        save_intensity_png(&to_intensity(&image, &params.detection), &png_path)?;
    }
    info!("{}: {:.1} ms", input.display(), result.latency_ms);

    Ok(format!(
        "{} line(s), rotation {:.1}°, saved {}",
        result.lines.len(),
        result.rotation.to_degrees(),
        json_path.display()
    ))
}

fn usage() -> String {
    "Usage: palm_read <config.json>".to_string()
}
