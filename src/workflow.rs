use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::compare::GoogleCompare;
use crate::config::Config;
use crate::error::{AnuvadError, Result};
use crate::evaluate;
use crate::history::{HistoryLog, HistoryRecord};
use crate::lang::{Language, LanguagePair};
use crate::translator::{TranslationRequest, Translator};

pub struct Workflow {
    config: Config,
    translator: Translator,
    compare: GoogleCompare,
    history: HistoryLog,
}

impl Workflow {
    pub fn new(config: Config) -> Self {
        // Missing writable directories degrade history/evaluation but never
        // stop the run.
        for dir in [&config.storage.data_dir, &config.storage.out_dir] {
            if let Err(e) = std::fs::create_dir_all(dir) {
                warn!("Cannot create directory {}: {}", dir.display(), e);
            }
        }

        let translator = Translator::new(&config);
        let compare = GoogleCompare::new(config.compare.clone());
        let history = HistoryLog::new(config.storage.history_path());

        Self {
            config,
            translator,
            compare,
            history,
        }
    }

    /// Translate one text, print the result and log it to history.
    pub async fn translate(
        &mut self,
        text: &str,
        source: Language,
        target: Language,
        use_transliteration: bool,
        reference: Option<String>,
        with_comparison: bool,
    ) -> Result<()> {
        let request = TranslationRequest::new(text, source, target)
            .with_transliteration(use_transliteration)
            .with_reference(reference.clone());
        let outcome = self.translator.translate(&request).await?;

        if request.text.trim().is_empty() {
            println!("Nothing to translate.");
            return Ok(());
        }
        if source == target {
            println!("Source and target languages are the same. No translation needed.");
            println!("{}", outcome.translation);
            return Ok(());
        }

        println!("{}", outcome.translation);
        if let Some(model_name) = &outcome.model_name {
            println!("Model(s): {}", model_name);
        }

        if outcome.metrics.any_present() {
            println!("Evaluation metrics (vs reference):");
            println!("  BLEU:   {}", format_metric(outcome.metrics.bleu, 2));
            println!("  TER:    {}", format_metric(outcome.metrics.ter, 2));
            println!("  METEOR: {}", format_metric(outcome.metrics.meteor, 3));
        }

        if with_comparison {
            let comparison = self
                .compare
                .compare(text, source, target, &outcome.translation)
                .await;
            println!("Ours:   {}", comparison.ours);
            println!("Google: {}", comparison.google);
        }

        let record = HistoryRecord {
            source_lang: source.name().to_string(),
            target_lang: target.name().to_string(),
            src_text: text.to_string(),
            ref_text: reference.unwrap_or_default(),
            our_translation: outcome.translation,
        };
        match self.history.append(record) {
            Ok(()) => info!("Logged to {}", self.history.path().display()),
            Err(e) => warn!("Could not log history: {}", e),
        }

        Ok(())
    }

    /// Run batch evaluation over an input CSV and print the corpus summary.
    pub async fn run_evaluation(&mut self, input: &Path, output: &Path) -> Result<()> {
        let summary =
            evaluate::run(&mut self.translator, &self.compare, input, output).await?;
        evaluate::print_summary(&summary);
        Ok(())
    }

    /// Recompute and print the corpus summary from a previous evaluation run.
    pub fn show_results(&self, file: Option<PathBuf>) -> Result<()> {
        let path = file.unwrap_or_else(|| self.config.storage.eval_results_path());
        let records = evaluate::read_records(&path)?;

        let with_refs = records
            .iter()
            .filter(|r| !r.ref_text.trim().is_empty())
            .count();
        if with_refs == 0 {
            println!("No references found in results; corpus metrics unavailable.");
            return Ok(());
        }

        println!(
            "Corpus summary over {} referenced rows ({}):",
            with_refs,
            path.display()
        );
        evaluate::print_summary(&evaluate::summarize(&records, true));
        Ok(())
    }

    /// Print the most recent history rows.
    pub fn show_history(&self, limit: usize) -> Result<()> {
        if !self.history.exists() {
            println!("No history yet. Generate translations first.");
            return Ok(());
        }

        let records = self.history.read_all()?;
        let start = records.len().saturating_sub(limit);

        println!(
            "{:<10} {:<10} {:<30} {:<30}",
            "Source", "Target", "Text", "Translation"
        );
        println!("{}", "-".repeat(82));
        for record in &records[start..] {
            println!(
                "{:<10} {:<10} {:<30} {:<30}",
                record.source_lang,
                record.target_lang,
                truncate(&record.src_text, 28),
                truncate(&record.our_translation, 28)
            );
        }
        println!("{} of {} records shown", records.len() - start, records.len());
        Ok(())
    }

    /// Print the model resolution for every ordered language pair, then any
    /// fine-tuned checkpoint directories present on disk.
    pub fn list_models(&self) -> Result<()> {
        println!("{:<10} {:<10} {:<50}", "Source", "Target", "Resolution");
        println!("{}", "-".repeat(70));

        for source in Language::ALL {
            for target in Language::ALL {
                if source == target {
                    continue;
                }
                let pair = LanguagePair::new(source, target);
                let resolution = match self.translator.router().resolution(pair) {
                    Ok(model_source) => model_source.describe(),
                    Err(AnuvadError::ModelUnavailable(_)) => "unavailable".to_string(),
                    Err(e) => return Err(e),
                };
                println!("{:<10} {:<10} {:<50}", source.name(), target.name(), resolution);
            }
        }

        let root = &self.config.router.local_model_root;
        if root.is_dir() {
            println!("\nFine-tuned checkpoints under {}:", root.display());
            for entry in WalkDir::new(root)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_dir())
            {
                println!("  {}", entry.path().display());
            }
        }

        Ok(())
    }
}

fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
