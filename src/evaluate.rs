use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::compare::{self, GoogleCompare};
use crate::error::{AnuvadError, Result};
use crate::lang::Language;
use crate::metrics;
use crate::translator::{TranslationRequest, Translator};

/// One row of the evaluation input CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalInput {
    pub source_lang: String,
    pub target_lang: String,
    pub src_text: String,
    #[serde(default)]
    pub ref_text: String,
}

/// One row of the evaluation output CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRecord {
    pub source_lang: String,
    pub target_lang: String,
    pub src_text: String,
    pub ref_text: String,
    pub our_translation: String,
    pub google_translation: String,
    pub bleu: Option<f64>,
    pub ter: Option<f64>,
    pub meteor: Option<f64>,
    pub google_bleu: Option<f64>,
    pub google_ter: Option<f64>,
    pub google_meteor: Option<f64>,
}

/// Corpus-level scores for both systems over one evaluation run.
#[derive(Debug, Clone, Default)]
pub struct CorpusSummary {
    pub our_bleu: Option<f64>,
    pub our_ter: Option<f64>,
    pub our_meteor: Option<f64>,
    pub google_bleu: Option<f64>,
    pub google_ter: Option<f64>,
    pub google_meteor: Option<f64>,
}

/// Translate every input row with both systems, score against references
/// and regenerate the output CSV wholesale.
pub async fn run(
    translator: &mut Translator,
    compare: &GoogleCompare,
    input_path: &Path,
    output_path: &Path,
) -> Result<CorpusSummary> {
    let inputs = read_inputs(input_path)?;
    info!("Evaluating {} rows from {}", inputs.len(), input_path.display());

    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .expect("static progress template should parse"),
    );

    let mut records = Vec::with_capacity(inputs.len());

    for input in &inputs {
        let source = Language::parse(&input.source_lang)?;
        let target = Language::parse(&input.target_lang)?;
        let reference = Some(input.ref_text.clone()).filter(|r| !r.trim().is_empty());

        // Batch evaluation allows the transliteration path, as the
        // interactive flow does when the checkbox is set.
        let request = TranslationRequest::new(input.src_text.clone(), source, target)
            .with_transliteration(true)
            .with_reference(reference.clone());
        let outcome = translator.translate(&request).await?;

        let comparison = compare
            .compare(&input.src_text, source, target, &outcome.translation)
            .await;

        let google_metrics = if compare::is_unavailable(&comparison.google) {
            metrics::TranslationMetrics::absent()
        } else {
            metrics::evaluate(&comparison.google, reference.as_deref())
        };

        records.push(EvalRecord {
            source_lang: input.source_lang.clone(),
            target_lang: input.target_lang.clone(),
            src_text: input.src_text.clone(),
            ref_text: input.ref_text.clone(),
            our_translation: outcome.translation,
            google_translation: comparison.google,
            bleu: outcome.metrics.bleu,
            ter: outcome.metrics.ter,
            meteor: outcome.metrics.meteor,
            google_bleu: google_metrics.bleu,
            google_ter: google_metrics.ter,
            google_meteor: google_metrics.meteor,
        });

        progress.inc(1);
    }

    progress.finish_and_clear();

    write_records(output_path, &records)?;
    info!("Wrote evaluation results to {}", output_path.display());

    Ok(summarize(&records, false))
}

/// Corpus summary over stored records. With `refs_only`, rows without a
/// reference are excluded up front (the interactive results view); without
/// it, every row contributes and unavailable Google hypotheses stay as
/// empty-string placeholders to keep alignment with the references.
pub fn summarize(records: &[EvalRecord], refs_only: bool) -> CorpusSummary {
    let rows: Vec<&EvalRecord> = if refs_only {
        records
            .iter()
            .filter(|r| !r.ref_text.trim().is_empty())
            .collect()
    } else {
        records.iter().collect()
    };

    let has_any_ref = rows.iter().any(|r| !r.ref_text.trim().is_empty());
    if rows.is_empty() || !has_any_ref {
        return CorpusSummary::default();
    }

    let refs: Vec<String> = rows.iter().map(|r| r.ref_text.clone()).collect();
    let our_hyps: Vec<String> = rows.iter().map(|r| r.our_translation.clone()).collect();
    let google_hyps: Vec<String> = rows
        .iter()
        .map(|r| {
            if compare::is_unavailable(&r.google_translation) {
                String::new()
            } else {
                r.google_translation.clone()
            }
        })
        .collect();

    CorpusSummary {
        our_bleu: Some(metrics::corpus_bleu(&our_hyps, &refs)),
        our_ter: Some(metrics::corpus_ter(&our_hyps, &refs)),
        our_meteor: average(rows.iter().map(|r| r.meteor)),
        google_bleu: Some(metrics::corpus_bleu(&google_hyps, &refs)),
        google_ter: Some(metrics::corpus_ter(&google_hyps, &refs)),
        google_meteor: average(rows.iter().map(|r| r.google_meteor)),
    }
}

fn average<I: Iterator<Item = Option<f64>>>(values: I) -> Option<f64> {
    let present: Vec<f64> = values.flatten().collect();
    if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    }
}

/// Print the corpus summary for both systems to standard output.
pub fn print_summary(summary: &CorpusSummary) {
    println!("Our Corpus BLEU: {}", format_score(summary.our_bleu, 2));
    println!("Our Corpus TER: {}", format_score(summary.our_ter, 2));
    if cfg!(feature = "meteor") {
        println!("Our Avg METEOR: {}", format_score(summary.our_meteor, 3));
    } else {
        println!("Our Avg METEOR: not available");
    }

    println!("Google Corpus BLEU: {}", format_score(summary.google_bleu, 2));
    println!("Google Corpus TER: {}", format_score(summary.google_ter, 2));
    if cfg!(feature = "meteor") {
        println!("Google Avg METEOR: {}", format_score(summary.google_meteor, 3));
    } else {
        println!("Google Avg METEOR: not available");
    }
}

fn format_score(score: Option<f64>, decimals: usize) -> String {
    match score {
        Some(s) => format!("{:.*}", decimals, s),
        None => "-".to_string(),
    }
}

pub fn read_inputs(path: &Path) -> Result<Vec<EvalInput>> {
    if !path.exists() {
        return Err(AnuvadError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut inputs = Vec::new();
    for result in reader.deserialize() {
        inputs.push(result?);
    }
    Ok(inputs)
}

pub fn read_records(path: &Path) -> Result<Vec<EvalRecord>> {
    if !path.exists() {
        return Err(AnuvadError::FileNotFound(path.display().to_string()));
    }

    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for result in reader.deserialize() {
        records.push(result?);
    }
    Ok(records)
}

pub fn write_records(path: &Path, records: &[EvalRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{CompareConfig, Config};
    use crate::engine::{EngineFactory, MockTranslationEngine, TranslationEngine};
    use crate::lang::LanguagePair;

    struct FixedFactory;

    impl EngineFactory for FixedFactory {
        fn create(&self, model: &str, _pair: LanguagePair) -> Arc<dyn TranslationEngine> {
            let mut engine = MockTranslationEngine::new();
            engine.expect_name().return_const(model.to_string());
            engine
                .expect_translate()
                .returning(|_| Ok("नमस्ते दुनिया".to_string()));
            Arc::new(engine)
        }
    }

    fn offline_compare() -> GoogleCompare {
        GoogleCompare::new(CompareConfig {
            enabled: false,
            endpoint: "https://example.invalid".to_string(),
        })
    }

    fn write_input_csv(path: &Path, rows: &[(&str, &str, &str, &str)]) {
        let mut writer = csv::Writer::from_path(path).unwrap();
        writer
            .write_record(["source_lang", "target_lang", "src_text", "ref_text"])
            .unwrap();
        for (sl, tl, src, reference) in rows {
            writer.write_record([*sl, *tl, *src, *reference]).unwrap();
        }
        writer.flush().unwrap();
    }

    #[tokio::test]
    async fn test_run_produces_full_record_per_row() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("eval_in.csv");
        let output = dir.path().join("eval_out.csv");
        write_input_csv(
            &input,
            &[
                ("English", "Hindi", "Hello world", "नमस्ते दुनिया"),
                ("English", "Hindi", "Good morning", ""),
            ],
        );

        let mut translator =
            Translator::with_factory(&Config::default(), Box::new(FixedFactory));
        let compare = offline_compare();

        let summary = run(&mut translator, &compare, &input, &output)
            .await
            .unwrap();

        let records = read_records(&output).unwrap();
        assert_eq!(records.len(), 2);

        // the referenced row scores; the unreferenced one stays absent
        assert!(records[0].bleu.is_some());
        assert!(records[1].bleu.is_none());

        // comparison was offline: placeholder string, no google metrics
        assert!(records[0]
            .google_translation
            .starts_with("Google Translate unavailable:"));
        assert!(records[0].google_bleu.is_none());

        assert!(summary.our_bleu.is_some());
        assert!(summary.google_bleu.is_some());
    }

    #[tokio::test]
    async fn test_output_csv_round_trip_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("eval_in.csv");
        let output = dir.path().join("eval_out.csv");
        let rows = [
            ("English", "Hindi", "Hello, \"world\"", "नमस्ते दुनिया"),
            ("Hindi", "English", "यह एक परीक्षण है", "this is a test"),
            ("English", "Marathi", "line\nbreak", "ओळ खंड"),
        ];
        write_input_csv(&input, &rows);

        let mut translator =
            Translator::with_factory(&Config::default(), Box::new(FixedFactory));
        run(&mut translator, &offline_compare(), &input, &output)
            .await
            .unwrap();

        let records = read_records(&output).unwrap();
        assert_eq!(records.len(), rows.len());
        for (record, (_, _, src, reference)) in records.iter().zip(rows.iter()) {
            assert_eq!(record.src_text, *src);
            assert_eq!(record.ref_text, *reference);
        }
    }

    #[test]
    fn test_summarize_empty_records_is_default() {
        let summary = summarize(&[], false);
        assert!(summary.our_bleu.is_none());
        assert!(summary.google_bleu.is_none());
    }

    #[test]
    fn test_summarize_refs_only_filters_rows() {
        let record = |reference: &str, meteor: Option<f64>| EvalRecord {
            source_lang: "English".to_string(),
            target_lang: "Hindi".to_string(),
            src_text: "hello world again today".to_string(),
            ref_text: reference.to_string(),
            our_translation: reference.to_string(),
            google_translation: "unavailable".to_string(),
            bleu: None,
            ter: None,
            meteor,
            google_bleu: None,
            google_ter: None,
            google_meteor: None,
        };

        let records = vec![
            record("एक दो तीन चार पांच", Some(0.8)),
            record("", None),
        ];

        let summary = summarize(&records, true);
        // the referenced row is an exact match
        assert!((summary.our_bleu.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(summary.our_ter, Some(0.0));
        assert_eq!(summary.our_meteor, Some(0.8));
        // google hypotheses degrade to empty placeholders
        assert_eq!(summary.google_bleu, Some(0.0));
    }
}
