use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// BLEU, TER and METEOR scores for one hypothesis against one reference.
///
/// All three keys are always present; `None` marks a score that could not be
/// computed (no reference, or METEOR support compiled out).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationMetrics {
    pub bleu: Option<f64>,
    pub ter: Option<f64>,
    pub meteor: Option<f64>,
}

impl TranslationMetrics {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn any_present(&self) -> bool {
        self.bleu.is_some() || self.ter.is_some() || self.meteor.is_some()
    }
}

/// Score a single hypothesis against an optional reference.
///
/// BLEU and TER are computable for any non-empty reference; METEOR requires
/// the `meteor` feature and degrades to `None` without it.
pub fn evaluate(hypothesis: &str, reference: Option<&str>) -> TranslationMetrics {
    let reference = match reference {
        Some(r) if !r.trim().is_empty() => r,
        _ => return TranslationMetrics::absent(),
    };

    TranslationMetrics {
        bleu: Some(corpus_bleu(&[hypothesis.to_string()], &[reference.to_string()])),
        ter: Some(corpus_ter(&[hypothesis.to_string()], &[reference.to_string()])),
        meteor: meteor_or_none(hypothesis, reference),
    }
}

#[cfg(feature = "meteor")]
fn meteor_or_none(hypothesis: &str, reference: &str) -> Option<f64> {
    Some(meteor(hypothesis, reference))
}

#[cfg(not(feature = "meteor"))]
fn meteor_or_none(_hypothesis: &str, _reference: &str) -> Option<f64> {
    None
}

fn tokenize(s: &str) -> Vec<String> {
    s.split_whitespace()
        .map(|t| {
            t.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

fn ngrams(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut map = HashMap::new();
    if n == 0 || tokens.len() < n {
        return map;
    }
    for i in 0..=tokens.len() - n {
        *map.entry(&tokens[i..i + n]).or_insert(0) += 1;
    }
    map
}

const BLEU_MAX_ORDER: usize = 4;

/// Corpus-level BLEU on the 0-100 scale.
///
/// N-gram counts are aggregated over all aligned segments before the
/// geometric mean, with the standard brevity penalty and no smoothing.
pub fn corpus_bleu(hypotheses: &[String], references: &[String]) -> f64 {
    let mut clipped = [0usize; BLEU_MAX_ORDER];
    let mut totals = [0usize; BLEU_MAX_ORDER];
    let mut hyp_len = 0usize;
    let mut ref_len = 0usize;

    for (hyp, reference) in hypotheses.iter().zip(references.iter()) {
        let hyp_tok = tokenize(hyp);
        let ref_tok = tokenize(reference);
        hyp_len += hyp_tok.len();
        ref_len += ref_tok.len();

        for n in 1..=BLEU_MAX_ORDER {
            let ref_ngrams = ngrams(&ref_tok, n);
            for (ng, &count) in ngrams(&hyp_tok, n).iter() {
                totals[n - 1] += count;
                clipped[n - 1] += count.min(ref_ngrams.get(ng).copied().unwrap_or(0));
            }
        }
    }

    if hyp_len == 0 || ref_len == 0 {
        return 0.0;
    }

    let mut log_precision_sum = 0.0;
    for n in 0..BLEU_MAX_ORDER {
        if clipped[n] == 0 || totals[n] == 0 {
            return 0.0;
        }
        log_precision_sum += (clipped[n] as f64 / totals[n] as f64).ln();
    }

    let brevity_penalty = if hyp_len > ref_len {
        1.0
    } else {
        (1.0 - ref_len as f64 / hyp_len as f64).exp()
    };

    100.0 * brevity_penalty * (log_precision_sum / BLEU_MAX_ORDER as f64).exp()
}

/// Corpus-level TER on the 0-100 scale: total word edits over total
/// reference length. Block shifts are not modeled, only
/// insertions/deletions/substitutions.
pub fn corpus_ter(hypotheses: &[String], references: &[String]) -> f64 {
    let mut edits = 0usize;
    let mut ref_len = 0usize;

    for (hyp, reference) in hypotheses.iter().zip(references.iter()) {
        let hyp_tok = tokenize(hyp);
        let ref_tok = tokenize(reference);
        edits += edit_distance(&hyp_tok, &ref_tok);
        ref_len += ref_tok.len();
    }

    if ref_len == 0 {
        return 0.0;
    }
    100.0 * edits as f64 / ref_len as f64
}

fn edit_distance(a: &[String], b: &[String]) -> usize {
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// METEOR on the 0-1 scale: recall-weighted harmonic mean of unigram
/// precision and recall with a fragmentation penalty over matched chunks.
#[cfg(feature = "meteor")]
pub fn meteor(hypothesis: &str, reference: &str) -> f64 {
    let hyp_tok = tokenize(hypothesis);
    let ref_tok = tokenize(reference);
    if hyp_tok.is_empty() || ref_tok.is_empty() {
        return 0.0;
    }

    // Greedy in-order alignment: each hypothesis token claims the first
    // unused identical reference token.
    let mut used = vec![false; ref_tok.len()];
    let mut alignment: Vec<(usize, usize)> = Vec::new();
    for (hi, token) in hyp_tok.iter().enumerate() {
        if let Some(ri) = (0..ref_tok.len()).find(|&ri| !used[ri] && ref_tok[ri] == *token) {
            used[ri] = true;
            alignment.push((hi, ri));
        }
    }

    let matches = alignment.len() as f64;
    if matches == 0.0 {
        return 0.0;
    }

    let precision = matches / hyp_tok.len() as f64;
    let recall = matches / ref_tok.len() as f64;
    let f_mean = (10.0 * precision * recall) / (recall + 9.0 * precision);

    let mut chunks = 1usize;
    for window in alignment.windows(2) {
        let (prev_h, prev_r) = window[0];
        let (h, r) = window[1];
        if h != prev_h + 1 || r != prev_r + 1 {
            chunks += 1;
        }
    }

    let penalty = 0.5 * (chunks as f64 / matches).powi(3);
    f_mean * (1.0 - penalty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluate_without_reference_is_absent() {
        let metrics = evaluate("some translation", None);
        assert_eq!(metrics, TranslationMetrics::absent());

        let metrics = evaluate("some translation", Some("   "));
        assert!(!metrics.any_present());
    }

    #[test]
    fn test_identical_sentence_scores_perfect() {
        let metrics = evaluate(
            "the quick brown fox jumps over the lazy dog",
            Some("the quick brown fox jumps over the lazy dog"),
        );
        assert!((metrics.bleu.unwrap() - 100.0).abs() < 1e-9);
        assert!(metrics.ter.unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_sentence_scores_zero_bleu() {
        let metrics = evaluate("alpha beta gamma delta", Some("one two three four"));
        assert_eq!(metrics.bleu, Some(0.0));
        assert!(metrics.ter.unwrap() > 0.0);
    }

    #[test]
    fn test_evaluate_devanagari_reference() {
        let metrics = evaluate("आप कैसे हैं मेरे दोस्त", Some("आप कैसे हैं मेरे दोस्त"));
        assert!((metrics.bleu.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(metrics.ter, Some(0.0));
    }

    #[test]
    fn test_short_sentence_has_no_four_gram_support() {
        // two tokens cannot form higher-order n-grams; unsmoothed BLEU is zero
        let metrics = evaluate("नमस्ते दुनिया", Some("नमस्ते दुनिया"));
        assert_eq!(metrics.bleu, Some(0.0));
        assert_eq!(metrics.ter, Some(0.0));
    }

    #[test]
    fn test_corpus_ter_counts_edits() {
        // one substitution against a four word reference
        let ter = corpus_ter(
            &["the quick brown cat".to_string()],
            &["the quick brown fox".to_string()],
        );
        assert!((ter - 25.0).abs() < 1e-9);
    }

    #[cfg(feature = "meteor")]
    #[test]
    fn test_meteor_bounds() {
        let perfect = meteor("hello world", "hello world");
        assert!(perfect > 0.9 && perfect <= 1.0);

        assert_eq!(meteor("alpha beta", "gamma delta"), 0.0);

        let partial = meteor("hello there world", "hello world");
        assert!(partial > 0.0 && partial < perfect);
    }
}
