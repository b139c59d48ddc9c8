//! Similarity Ranker: TF-IDF and cosine similarity of each resume against the job description.
//!
//! State machine is just unfit → fit. `fit` replaces the vocabulary wholesale; there is no
//! incremental update. With a model path configured the fitted vectorizer is loaded at
//! construction and written back after every `fit`.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use thiserror::Error;
use tracing::{info, warn};

use crate::models::resume::ResumeRecord;
use crate::screening::vectorizer::{cosine_similarity, TfidfVectorizer};

#[derive(Debug, Error)]
pub enum RankError {
    #[error("ranker has not been fitted on a corpus")]
    NotFitted,
}

pub struct Ranker {
    model_path: Option<PathBuf>,
    vectorizer: TfidfVectorizer,
}

impl Ranker {
    /// Loads a persisted model from `model_path` when one exists, otherwise starts an
    /// unfitted unigram+bigram vectorizer capped at `max_features` terms.
    pub fn new(model_path: Option<PathBuf>, max_features: usize) -> Self {
        let loaded = model_path.as_deref().and_then(|path| match load_model(path) {
            Ok(model) => model,
            Err(e) => {
                warn!("Ignoring unreadable model at {}: {e:#}", path.display());
                None
            }
        });

        let vectorizer =
            loaded.unwrap_or_else(|| TfidfVectorizer::new((1, 2), Some(max_features)));

        Ranker {
            model_path,
            vectorizer,
        }
    }

    pub fn is_fitted(&self) -> bool {
        self.vectorizer.is_fitted()
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.vocabulary_len()
    }

    /// Learns vocabulary and weights from `corpus`. A failed save is logged and leaves the
    /// in-memory model untouched.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) {
        self.vectorizer.fit(corpus);
        info!(
            "Fitted TF-IDF on {} documents ({} terms)",
            corpus.len(),
            self.vectorizer.vocabulary_len()
        );

        if let Some(path) = &self.model_path {
            if let Err(e) = save_model(path, &self.vectorizer) {
                warn!("Failed to persist model to {}: {e:#}", path.display());
            }
        }
    }

    /// Scores every resume against `job_description` (already normalized) and returns them
    /// sorted by score, highest first. Ties keep their input order.
    pub fn rank(
        &self,
        mut resumes: Vec<ResumeRecord>,
        job_description: &str,
    ) -> Result<Vec<ResumeRecord>, RankError> {
        if resumes.is_empty() {
            return Ok(resumes);
        }
        if !self.vectorizer.is_fitted() {
            return Err(RankError::NotFitted);
        }

        let mut corpus: Vec<&str> = resumes.iter().map(|r| r.raw_text.as_str()).collect();
        corpus.push(job_description);
        let mut rows = self.vectorizer.transform(corpus.as_slice());
        let jd_row = rows.pop().unwrap_or_default();

        for (resume, row) in resumes.iter_mut().zip(&rows) {
            resume.score = Some(cosine_similarity(&jd_row, row));
        }

        resumes.sort_by(|a, b| {
            let (a, b) = (a.score.unwrap_or(0.0), b.score.unwrap_or(0.0));
            b.partial_cmp(&a).unwrap_or(Ordering::Equal)
        });
        Ok(resumes)
    }
}

fn load_model(path: &Path) -> Result<Option<TfidfVectorizer>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let model: TfidfVectorizer = serde_json::from_slice(&raw).context("decoding model JSON")?;
    if !model.is_consistent() {
        bail!("model vocabulary and idf weights disagree");
    }
    info!("Loaded TF-IDF model from {}", path.display());
    Ok(Some(model))
}

/// Writes through a temp file in the target directory and renames it into place, so a
/// concurrent reader never sees a partial file. Last writer wins.
fn save_model(path: &Path, model: &TfidfVectorizer) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temp file in {}", dir.display()))?;
    serde_json::to_writer(&mut tmp, model).context("encoding model JSON")?;
    tmp.persist(path)
        .with_context(|| format!("renaming model into {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screening::normalizer::Normalizer;

    fn record(filename: &str, raw_text: &str) -> ResumeRecord {
        ResumeRecord {
            filename: filename.to_string(),
            name: None,
            skills: vec![],
            raw_text: raw_text.to_string(),
            score: None,
        }
    }

    fn fit_and_rank(resumes: Vec<ResumeRecord>, jd: &str) -> Vec<ResumeRecord> {
        let mut ranker = Ranker::new(None, 8000);
        let mut corpus: Vec<String> = resumes.iter().map(|r| r.raw_text.clone()).collect();
        corpus.push(jd.to_string());
        ranker.fit(corpus.as_slice());
        ranker.rank(resumes, jd).unwrap()
    }

    #[test]
    fn test_full_overlap_ranks_above_no_overlap() {
        let n = Normalizer::default();
        let resumes = vec![
            record("b.txt", &n.normalize("java c++")),
            record("a.txt", &n.normalize("python sql")),
        ];
        let jd = n.normalize("python sql");
        let ranked = fit_and_rank(resumes, &jd);

        assert_eq!(ranked[0].filename, "a.txt");
        assert_eq!(ranked[1].filename, "b.txt");
        assert!(ranked[0].score.unwrap() > ranked[1].score.unwrap());
        assert_eq!(ranked[1].score, Some(0.0));
    }

    #[test]
    fn test_job_description_against_itself_scores_one() {
        let jd = "senior rust engineer distribute system";
        let ranked = fit_and_rank(vec![record("self.txt", jd)], jd);
        assert!((ranked[0].score.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_resume_list_returns_empty() {
        let ranker = Ranker::new(None, 8000);
        let ranked = ranker.rank(vec![], "python").unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_before_fit_is_an_error() {
        let ranker = Ranker::new(None, 8000);
        let err = ranker.rank(vec![record("a.txt", "python")], "python").unwrap_err();
        assert!(matches!(err, RankError::NotFitted));
    }

    #[test]
    fn test_zero_overlap_singleton_does_not_error() {
        let ranked = fit_and_rank(vec![record("a.txt", "haskell")], "python");
        assert_eq!(ranked[0].score, Some(0.0));
    }

    #[test]
    fn test_output_is_sorted_descending() {
        let resumes = vec![
            record("none.txt", "cobol fortran"),
            record("some.txt", "python excel"),
            record("most.txt", "python sql docker"),
            record("empty.txt", ""),
        ];
        let ranked = fit_and_rank(resumes, "python sql docker aws");
        for pair in ranked.windows(2) {
            assert!(pair[0].score.unwrap() >= pair[1].score.unwrap());
        }
        assert_eq!(ranked[0].filename, "most.txt");
        for r in &ranked {
            let s = r.score.unwrap();
            assert!((0.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn test_ties_keep_input_order() {
        let resumes = vec![
            record("first.txt", "cobol"),
            record("second.txt", "fortran"),
            record("third.txt", "pascal"),
        ];
        let ranked = fit_and_rank(resumes, "python");
        let order: Vec<&str> = ranked.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(order, vec!["first.txt", "second.txt", "third.txt"]);
    }

    #[test]
    fn test_fit_persists_and_new_ranker_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let mut ranker = Ranker::new(Some(path.clone()), 8000);
        assert!(!ranker.is_fitted());
        ranker.fit(&["python sql", "java"]);
        assert!(path.exists());

        let reloaded = Ranker::new(Some(path), 8000);
        assert!(reloaded.is_fitted());
        assert_eq!(reloaded.vocabulary_len(), ranker.vocabulary_len());
        let ranked = reloaded
            .rank(vec![record("a.txt", "python sql")], "python sql")
            .unwrap();
        assert!((ranked[0].score.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_corrupt_model_file_starts_unfitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(&path, b"not json").unwrap();

        let ranker = Ranker::new(Some(path), 8000);
        assert!(!ranker.is_fitted());
    }

    #[test]
    fn test_model_with_out_of_range_index_starts_unfitted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        fs::write(
            &path,
            r#"{"ngram_range":[1,2],"max_features":8000,"vocabulary":{"python":5},"idf":[1.0],"fitted":true}"#,
        )
        .unwrap();

        let ranker = Ranker::new(Some(path), 8000);
        assert!(!ranker.is_fitted());
    }

    #[test]
    fn test_failed_save_keeps_in_memory_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing-subdir").join("model.json");

        let mut ranker = Ranker::new(Some(path.clone()), 8000);
        ranker.fit(&["python sql"]);
        assert!(!path.exists());
        assert!(ranker.is_fitted());
        assert_eq!(ranker.vocabulary_len(), 3);
    }
}
