use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use std::{fmt, path::Path};
use tracing::{info, warn};

use super::classifier::{label_by_rule, KnnModel, Mood, TrainingPoint};
use super::dataset::ReferenceSong;
use super::error::{MoodError, MoodResult};

/// Labels every song by rule. Songs with invalid features are left out and logged.
pub fn label_songs(songs: &[ReferenceSong]) -> Vec<TrainingPoint> {
    songs
        .iter()
        .filter_map(|s| {
            let features = s.features();
            if let Err(e) = features.validate() {
                warn!("Leaving {} / {} out of training: {e}", s.song_name, s.singer);
                return None;
            }
            Some(TrainingPoint { features, label: label_by_rule(&features) })
        })
        .collect()
}

/// Copies `source` to `out` row for row, keeping every original column and
/// appending a `target` column (0 = Happy, 1 = Sad). Returns the row count.
pub fn write_labeled_csv(source: impl AsRef<Path>, out: impl AsRef<Path>) -> MoodResult<usize> {
    let mut reader = csv::Reader::from_path(source.as_ref())?;
    let headers = reader.headers()?.clone();
    let mut writer = csv::Writer::from_path(out.as_ref())?;

    let mut out_headers = headers.clone();
    out_headers.push_field("target");
    writer.write_record(&out_headers)?;

    let mut rows = 0;
    for (i, record) in reader.records().enumerate() {
        let mut record = record.map_err(|source| MoodError::Dataset { row: i + 2, source })?;
        let song: ReferenceSong = record
            .deserialize(Some(&headers))
            .map_err(|source| MoodError::Dataset { row: i + 2, source })?;
        let target = label_by_rule(&song.features()).class();
        record.push_field(&target.to_string());
        writer.write_record(&record)?;
        rows += 1;
    }
    writer.flush()?;
    info!("Saved {rows} labeled rows to {}", out.as_ref().display());
    Ok(rows)
}

/// Seeded shuffle, then `ceil(n * test_size)` rows go to the test split.
/// At least one row always stays in the training split.
pub fn train_test_split<T: Clone>(rows: &[T], test_size: f64, seed: u64) -> MoodResult<(Vec<T>, Vec<T>)> {
    if rows.is_empty() {
        return Err(MoodError::EmptyTrainingSet);
    }
    if !(0.0..1.0).contains(&test_size) {
        return Err(MoodError::Model(format!("test size must be in [0, 1), got {test_size}")));
    }

    let mut shuffled = rows.to_vec();
    shuffled.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_test = ((rows.len() as f64) * test_size).ceil() as usize;
    let n_test = n_test.min(rows.len() - 1);
    let test = shuffled.split_off(rows.len() - n_test);
    Ok((shuffled, test))
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClassScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub happy: ClassScore,
    /// Sad is the positive class for the headline precision/recall/F1.
    pub sad: ClassScore,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn class_score(truth: &[Mood], predicted: &[Mood], class: Mood) -> ClassScore {
    let pairs = truth.iter().zip(predicted);
    let tp = pairs.clone().filter(|(t, p)| **t == class && **p == class).count();
    let predicted_pos = predicted.iter().filter(|p| **p == class).count();
    let support = truth.iter().filter(|t| **t == class).count();

    let precision = ratio(tp, predicted_pos);
    let recall = ratio(tp, support);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };
    ClassScore { precision, recall, f1, support }
}

pub fn evaluate(truth: &[Mood], predicted: &[Mood]) -> Evaluation {
    let correct = truth.iter().zip(predicted).filter(|(t, p)| t == p).count();
    Evaluation {
        accuracy: ratio(correct, truth.len()),
        happy: class_score(truth, predicted, Mood::Happy),
        sad: class_score(truth, predicted, Mood::Sad),
    }
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Model Evaluation ===")?;
        writeln!(f, "Accuracy : {:.4}", self.accuracy)?;
        writeln!(f, "Precision: {:.4}", self.sad.precision)?;
        writeln!(f, "Recall   : {:.4}", self.sad.recall)?;
        writeln!(f, "F1 Score : {:.4}", self.sad.f1)?;
        writeln!(f)?;
        writeln!(f, "{:>10} {:>10} {:>10} {:>10} {:>10}", "", "precision", "recall", "f1-score", "support")?;
        for (name, s) in [("Happy (0)", &self.happy), ("Sad (1)", &self.sad)] {
            writeln!(
                f,
                "{:>10} {:>10.2} {:>10.2} {:>10.2} {:>10}",
                name, s.precision, s.recall, s.f1, s.support
            )?;
        }
        Ok(())
    }
}

pub struct TrainingOutcome {
    pub model: KnnModel,
    pub evaluation: Evaluation,
    pub train_len: usize,
    pub test_len: usize,
    /// Songs left out because their features were invalid.
    pub skipped: usize,
}

/// Label with the rule, split, fit and score on the held-out rows.
pub fn train(songs: &[ReferenceSong], k: usize, test_size: f64, seed: u64) -> MoodResult<TrainingOutcome> {
    let points = label_songs(songs);
    let skipped = songs.len() - points.len();
    if skipped > 0 {
        warn!("Skipped {skipped} of {} songs with invalid features", songs.len());
    }
    let (train_set, test_set) = train_test_split(&points, test_size, seed)?;
    let model = KnnModel::fit(k, train_set.clone())?;

    let test_features: Vec<_> = test_set.iter().map(|p| p.features).collect();
    let truth: Vec<Mood> = test_set.iter().map(|p| p.label).collect();
    let predicted = model.classify(&test_features)?;

    Ok(TrainingOutcome {
        model,
        evaluation: evaluate(&truth, &predicted),
        train_len: train_set.len(),
        test_len: test_set.len(),
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::dataset::ReferenceDataset;
    use std::io::Write;

    fn songs(n: usize) -> Vec<ReferenceSong> {
        (0..n)
            .map(|i| {
                let x = (i % 10) as f64 / 10.0 + 0.05;
                ReferenceSong::new(&format!("song {i}"), "artist", x, x, 60.0 + (i % 10) as f64 * 10.0)
            })
            .collect()
    }

    #[test]
    fn test_split_sizes() {
        let rows: Vec<usize> = (0..10).collect();
        let (train, test) = train_test_split(&rows, 0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let rows: Vec<usize> = (0..11).collect();
        let (train, test) = train_test_split(&rows, 0.2, 42).unwrap();
        assert_eq!((train.len(), test.len()), (8, 3));
    }

    #[test]
    fn test_split_keeps_one_training_row() {
        let (train, test) = train_test_split(&[1], 0.5, 42).unwrap();
        assert_eq!(train, vec![1]);
        assert!(test.is_empty());
    }

    #[test]
    fn test_split_is_seeded_partition() {
        let rows: Vec<usize> = (0..50).collect();
        let a = train_test_split(&rows, 0.2, 7).unwrap();
        let b = train_test_split(&rows, 0.2, 7).unwrap();
        assert_eq!(a, b);

        let mut all: Vec<usize> = a.0.iter().chain(a.1.iter()).copied().collect();
        all.sort_unstable();
        assert_eq!(all, rows);
    }

    #[test]
    fn test_split_rejects_bad_input() {
        assert!(matches!(train_test_split::<u8>(&[], 0.2, 1), Err(MoodError::EmptyTrainingSet)));
        assert!(train_test_split(&[1, 2], 1.0, 1).is_err());
    }

    #[test]
    fn test_evaluate_counts() {
        use Mood::*;
        let truth = [Sad, Sad, Sad, Happy, Happy];
        let predicted = [Sad, Sad, Happy, Sad, Happy];
        let e = evaluate(&truth, &predicted);

        assert!((e.accuracy - 0.6).abs() < 1e-9);
        assert!((e.sad.precision - 2.0 / 3.0).abs() < 1e-9);
        assert!((e.sad.recall - 2.0 / 3.0).abs() < 1e-9);
        assert!((e.sad.f1 - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(e.sad.support, 3);
        assert!((e.happy.precision - 0.5).abs() < 1e-9);
        assert_eq!(e.happy.support, 2);
    }

    #[test]
    fn test_evaluate_without_positive_predictions() {
        let e = evaluate(&[Mood::Sad], &[Mood::Happy]);
        assert_eq!(e.sad.precision, 0.0);
        assert_eq!(e.sad.f1, 0.0);
        assert_eq!(e.accuracy, 0.0);
    }

    #[test]
    fn test_train_end_to_end() {
        let outcome = train(&songs(40), 5, 0.2, 42).unwrap();
        assert_eq!(outcome.train_len, 32);
        assert_eq!(outcome.test_len, 8);
        assert_eq!(outcome.model.len(), 32);
        assert!(outcome.evaluation.accuracy >= 0.0 && outcome.evaluation.accuracy <= 1.0);
        assert!(outcome.evaluation.to_string().contains("Accuracy"));
    }

    #[test]
    fn test_train_skips_invalid_rows() {
        let mut rows = songs(40);
        rows.push(ReferenceSong::new("broken", "artist", 0.0, 0.0, 0.0));
        rows.push(ReferenceSong::new("loud", "artist", 1.5, 0.5, 120.0));

        let outcome = train(&rows, 5, 0.2, 42).unwrap();
        assert_eq!(outcome.skipped, 2);
        assert_eq!(outcome.train_len + outcome.test_len, 40);
        assert_eq!(outcome.model.len(), 32);
    }

    #[test]
    fn test_label_songs_drops_only_invalid() {
        let points = label_songs(&[
            ReferenceSong::new("Up", "A", 0.9, 0.9, 120.0),
            ReferenceSong::new("Bad", "B", f64::NAN, 0.9, 120.0),
            ReferenceSong::new("Down", "C", 0.2, 0.3, 80.0),
        ]);
        let labels: Vec<Mood> = points.iter().map(|p| p.label).collect();
        assert_eq!(labels, vec![Mood::Happy, Mood::Sad]);
    }

    #[test]
    fn test_train_with_only_invalid_rows_fails() {
        let rows = vec![ReferenceSong::new("broken", "artist", 0.5, 0.5, 0.0)];
        assert!(matches!(train(&rows, 5, 0.2, 42), Err(MoodError::EmptyTrainingSet)));
    }

    #[test]
    fn test_labeled_csv_keeps_all_columns_and_rows() {
        let dir = std::env::temp_dir();
        let source = dir.join(format!("moodlist-source-{}.csv", std::process::id()));
        let out = dir.join(format!("moodlist-labeled-{}.csv", std::process::id()));
        let mut file = std::fs::File::create(&source).unwrap();
        file.write_all(
            b"Singer,Song name,danceability,energy,valence,tempo\n\
              A,Up,0.7,0.9,0.9,120\n\
              A,Up,0.7,0.9,0.9,120\n\
              B,Down,0.2,0.2,0.3,80\n",
        )
        .unwrap();
        drop(file);

        let written = write_labeled_csv(&source, &out).unwrap();
        let text = std::fs::read_to_string(&out).unwrap();
        // the labeled file must still load as a reference dataset
        let reloaded = ReferenceDataset::load(&out).unwrap();
        std::fs::remove_file(&source).ok();
        std::fs::remove_file(&out).ok();

        assert_eq!(written, 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Singer,Song name,danceability,energy,valence,tempo,target");
        assert_eq!(lines[1], "A,Up,0.7,0.9,0.9,120,0");
        assert_eq!(lines[2], "A,Up,0.7,0.9,0.9,120,0");
        assert_eq!(lines[3], "B,Down,0.2,0.2,0.3,80,1");
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_labeled_csv_reports_bad_row() {
        let dir = std::env::temp_dir();
        let source = dir.join(format!("moodlist-badsource-{}.csv", std::process::id()));
        let out = dir.join(format!("moodlist-badlabeled-{}.csv", std::process::id()));
        std::fs::write(&source, "Singer,Song name,energy,valence,tempo\nA,Up,high,0.9,120\n").unwrap();

        let err = write_labeled_csv(&source, &out).unwrap_err();
        std::fs::remove_file(&source).ok();
        std::fs::remove_file(&out).ok();

        assert!(matches!(err, MoodError::Dataset { row: 2, .. }));
    }
}
