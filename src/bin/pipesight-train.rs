//! Developer utility to train the pipeline-condition classifiers and export
//! the inference artifacts.

use std::path::PathBuf;

use pipesight::training::{TrainingConfig, run_training};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let config = parse_args(std::env::args().skip(1).collect())?;
    if !config.dataset_path.is_file() {
        return Err(format!(
            "Dataset path is not a file: {}",
            config.dataset_path.display()
        ));
    }

    let report = run_training(&config).map_err(|err| err.to_string())?;

    println!(
        "trained on {} rows, evaluated on {} rows, {} classes",
        report.train_rows,
        report.test_rows,
        report.classes.len()
    );
    for model in &report.models {
        println!();
        println!(
            "{}: accuracy={:.4}  weighted precision={:.4}",
            model.name, model.accuracy, model.weighted_precision
        );
        println!("confusion matrix (rows=true, cols=pred):");
        for truth in 0..model.confusion.n_classes {
            let mut row = String::new();
            for pred in 0..model.confusion.n_classes {
                row.push_str(&format!("{:6}", model.confusion.get(truth, pred)));
            }
            println!("{row}");
        }
        if let Some(curves) = &model.roc {
            for curve in curves {
                println!("ROC AUC {:<10} {:.4}", curve.class, curve.auc);
            }
        }
    }

    println!();
    println!("selected model: {}", report.selected);
    println!("artifacts written to: {}", report.artifacts_dir.display());

    Ok(())
}

fn parse_args(args: Vec<String>) -> Result<TrainingConfig, String> {
    let mut dataset_path: Option<PathBuf> = None;
    let mut out_dir = PathBuf::from("artifacts");
    let mut seed = 42u64;
    let mut test_ratio = 0.3f32;
    let mut trees = 100usize;
    let mut epochs = 200usize;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--dataset" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--dataset requires a value".to_string())?;
                dataset_path = Some(PathBuf::from(value));
            }
            "--out-dir" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--out-dir requires a value".to_string())?;
                out_dir = PathBuf::from(value);
            }
            "--seed" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                seed = value
                    .parse::<u64>()
                    .map_err(|_| format!("Invalid --seed value: {value}"))?;
            }
            "--test-ratio" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--test-ratio requires a value".to_string())?;
                test_ratio = value
                    .parse::<f32>()
                    .map_err(|_| format!("Invalid --test-ratio value: {value}"))?;
                if !(0.0..1.0).contains(&test_ratio) {
                    return Err(format!("--test-ratio must be in (0, 1): {value}"));
                }
            }
            "--trees" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--trees requires a value".to_string())?;
                trees = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --trees value: {value}"))?;
            }
            "--epochs" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--epochs requires a value".to_string())?;
                epochs = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --epochs value: {value}"))?;
            }
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }

    let dataset_path = dataset_path.ok_or_else(help_text)?;
    Ok(TrainingConfig {
        dataset_path,
        artifacts_dir: out_dir,
        seed,
        test_ratio,
        trees,
        epochs,
    })
}

fn help_text() -> String {
    [
        "pipesight-train",
        "",
        "Trains the pipeline-condition classifiers, selects the most accurate,",
        "and exports the inference artifacts.",
        "",
        "Usage:",
        "  pipesight-train --dataset <csv> [--out-dir artifacts] [options]",
        "",
        "Options:",
        "  --dataset <csv>     Pipeline dataset CSV (required).",
        "  --out-dir <dir>     Artifact output directory (default: artifacts).",
        "  --seed <u64>        RNG seed for the split and trainers (default: 42).",
        "  --test-ratio <f32>  Held-out test fraction (default: 0.3).",
        "  --trees <n>         Random forest size (default: 100).",
        "  --epochs <n>        SGD epochs for SVC and logistic regression (default: 200).",
    ]
    .join("\n")
}
