use anyhow::{Context, Result};
use std::io::{BufRead, Write};

use athlete_knn::data_handling::{FeatureColumn, FeaturePoint};
use athlete_knn::io::read_athletes_csv_with_config;
use athlete_knn::models::{KnnClassifier, Prediction};

use crate::knn::input::RunConfig;
use crate::util::parse_feature_value;

/// Prompt text and unit for each feature column.
fn prompt_for(column: FeatureColumn) -> &'static str {
    match column {
        FeatureColumn::Age => "Age (years)? ",
        FeatureColumn::Height => "Height (cm)? ",
        FeatureColumn::Weight => "Weight (kg)? ",
    }
}

/// Ask for every column that has no value yet, in column order.
///
/// `known` holds values already given on the command line.
pub fn prompt_feature_point<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    columns: &[FeatureColumn],
    known: &[(FeatureColumn, f64)],
) -> Result<FeaturePoint> {
    let mut point = Vec::with_capacity(columns.len());
    for &column in columns {
        if let Some((_, value)) = known.iter().find(|(c, _)| *c == column) {
            point.push(*value);
            continue;
        }

        write!(output, "{}", prompt_for(column))?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .with_context(|| format!("Failed to read {}", column.name()))?;
        if read == 0 {
            anyhow::bail!("No value given for {}", column.name());
        }
        let value = parse_feature_value(&line)
            .with_context(|| format!("Invalid {}", column.name()))?;
        point.push(value);
    }
    Ok(point)
}

/// Print the query, its neighbors and the recommendation.
pub fn write_prediction<W: Write>(
    output: &mut W,
    config: &RunConfig,
    raw: &[f64],
    prediction: &Prediction<'_>,
) -> Result<()> {
    writeln!(output, "YOUR POINT: {}", format_point(raw, 1))?;
    if config.knn.scale_features {
        writeln!(output, "SCALED POINT: {}", format_point(&prediction.point, 4))?;
    }
    writeln!(output)?;

    writeln!(output, "NEAREST ATHLETE(S):")?;
    for (rank, neighbor) in prediction.neighbors.iter().enumerate() {
        let athlete = neighbor.record;
        writeln!(
            output,
            "{:>3}. {} ({}), age {}, {} cm, {} kg, {}: {} [distance {:.4}]",
            rank + 1,
            athlete.name,
            athlete.country,
            athlete.age,
            athlete.height,
            athlete.weight,
            athlete.sport,
            athlete.events.join("; "),
            neighbor.distance
        )?;
    }
    writeln!(output)?;

    writeln!(
        output,
        "PREDICTED {}: {}",
        config.knn.label.name().to_uppercase(),
        prediction.label
    )?;
    match prediction.event {
        Some(event) => writeln!(output, "RECOMMENDED EVENT: {}", event)?,
        None => writeln!(output, "RECOMMENDED EVENT: none (neighbors list no events)")?,
    }
    Ok(())
}

fn format_point(point: &[f64], precision: usize) -> String {
    let values = point
        .iter()
        .map(|v| format!("{:.*}", precision, v))
        .collect::<Vec<_>>();
    format!("({})", values.join(", "))
}

/// Load the data, classify `raw` and print the result to `output`.
pub fn run_predict<W: Write>(config: &RunConfig, raw: &[f64], output: &mut W) -> Result<()> {
    let data = read_athletes_csv_with_config(&config.data, &config.reader_config())?;
    log::info!("Data is loaded for the k-NN model");

    let classifier = KnnClassifier::fit(data.records, &config.knn)
        .context("Failed to prepare the k-NN model")?;
    classifier.dataset().log_input_data_summary();

    let prediction = classifier
        .predict(raw)
        .context("Failed to classify the query point")?;
    write_prediction(output, config, raw, &prediction)
}
