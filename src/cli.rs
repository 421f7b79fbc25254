use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate text between English, Hindi and Marathi
    Translate {
        /// Text to translate
        text: String,

        /// Source language (name or ISO code)
        #[arg(short = 's', long)]
        from: String,

        /// Target language (name or ISO code)
        #[arg(short = 't', long)]
        to: String,

        /// Transliterate romanized input instead of translating (Eng->Indic)
        #[arg(long)]
        transliterate: bool,

        /// Reference translation for BLEU/TER/METEOR metrics
        #[arg(short, long)]
        reference: Option<String>,

        /// Show a side-by-side comparison with Google Translate
        #[arg(long)]
        compare: bool,
    },

    /// Batch-evaluate a CSV of translations against references
    Evaluate {
        /// Input CSV (source_lang,target_lang,src_text,ref_text)
        input: Option<PathBuf>,

        /// Output CSV with translations and metrics
        output: Option<PathBuf>,
    },

    /// Show the corpus summary of a previous evaluation run
    Results {
        /// Evaluation results CSV (defaults to the configured output file)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show recent translation history
    History {
        /// Number of rows to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show how each language pair resolves to a model
    Models,
}
