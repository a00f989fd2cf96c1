use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use super::error::{MoodError, MoodResult};
use super::features::Features;

pub const DEFAULT_NEIGHBORS: usize = 5;
const FORMAT_VERSION: u32 = 1;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumIter,
)]
pub enum Mood {
    #[strum(to_string = "Happy 😊")]
    Happy,
    #[strum(to_string = "Sad 😭")]
    Sad,
}

impl Default for Mood {
    fn default() -> Self {
        Mood::Happy
    }
}

impl Mood {
    /// Numeric class used by the model: 0 = Happy, 1 = Sad.
    pub fn class(self) -> u8 {
        match self {
            Mood::Happy => 0,
            Mood::Sad => 1,
        }
    }

    pub fn from_class(class: u8) -> Option<Mood> {
        match class {
            0 => Some(Mood::Happy),
            1 => Some(Mood::Sad),
            _ => None,
        }
    }

    /// Plain name, used in playlist titles.
    pub fn short_name(self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
        }
    }

    pub fn toggle(self) -> Mood {
        match self {
            Mood::Happy => Mood::Sad,
            Mood::Sad => Mood::Happy,
        }
    }
}

/// Deterministic labelling rule the training set is built from.
pub fn label_by_rule(f: &Features) -> Mood {
    if f.valence <= 0.5 || f.energy <= 0.5 || f.tempo <= 90.0 {
        Mood::Sad
    } else {
        Mood::Happy
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingPoint {
    #[serde(flatten)]
    pub features: Features,
    #[serde(with = "class_label")]
    pub label: Mood,
}

mod class_label {
    use super::Mood;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(mood: &Mood, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(mood.class())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Mood, D::Error> {
        let class = u8::deserialize(d)?;
        Mood::from_class(class).ok_or_else(|| D::Error::custom(format!("unknown class {class}")))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    k: usize,
    points: Vec<TrainingPoint>,
}

/// k-nearest-neighbour classifier over raw (energy, valence, tempo).
#[derive(Debug, Clone, PartialEq)]
pub struct KnnModel {
    k: usize,
    points: Vec<TrainingPoint>,
}

impl KnnModel {
    pub fn fit(k: usize, points: Vec<TrainingPoint>) -> MoodResult<Self> {
        if k == 0 {
            return Err(MoodError::Model("k must be at least 1".into()));
        }
        if points.is_empty() {
            return Err(MoodError::EmptyTrainingSet);
        }
        for p in &points {
            p.features.validate()?;
        }
        Ok(KnnModel { k, points })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// One label per input row, same order. An empty input yields an empty output.
    pub fn classify(&self, features: &[Features]) -> MoodResult<Vec<Mood>> {
        features
            .iter()
            .map(|f| {
                f.validate()?;
                Ok(self.predict_one(f))
            })
            .collect()
    }

    fn predict_one(&self, query: &Features) -> Mood {
        let mut ranked: Vec<(f64, Mood)> = self
            .points
            .iter()
            .map(|p| (p.features.distance(query), p.label))
            .collect();
        // stable: equal distances keep training order
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0));

        let sad = ranked
            .iter()
            .take(self.k)
            .filter(|(_, label)| *label == Mood::Sad)
            .count();
        let happy = ranked.len().min(self.k) - sad;

        // vote ties go to the lower class
        if sad > happy {
            Mood::Sad
        } else {
            Mood::Happy
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> MoodResult<()> {
        let artifact = ModelArtifact {
            format_version: FORMAT_VERSION,
            k: self.k,
            points: self.points.clone(),
        };
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer(std::io::BufWriter::new(file), &artifact)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> MoodResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let artifact: ModelArtifact = serde_json::from_reader(std::io::BufReader::new(file))?;
        if artifact.format_version != FORMAT_VERSION {
            return Err(MoodError::Model(format!(
                "unsupported model format version {}",
                artifact.format_version
            )));
        }
        let model = Self::fit(artifact.k, artifact.points)?;
        info!("Loaded k={} model with {} points from {}", model.k, model.len(), path.display());
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn point(energy: f64, valence: f64, tempo: f64, label: Mood) -> TrainingPoint {
        TrainingPoint { features: Features::new(energy, valence, tempo), label }
    }

    fn labelled_grid() -> Vec<TrainingPoint> {
        let mut points = Vec::new();
        for e in [0.1, 0.3, 0.6, 0.8, 0.95] {
            for v in [0.1, 0.3, 0.6, 0.8, 0.95] {
                for t in [70.0, 85.0, 110.0, 125.0, 140.0] {
                    let f = Features::new(e, v, t);
                    points.push(TrainingPoint { features: f, label: label_by_rule(&f) });
                }
            }
        }
        points
    }

    #[test]
    fn test_rule_labels() {
        assert_eq!(label_by_rule(&Features::new(0.9, 0.9, 120.0)), Mood::Happy);
        assert_eq!(label_by_rule(&Features::new(0.2, 0.3, 80.0)), Mood::Sad);
        // each threshold is inclusive
        assert_eq!(label_by_rule(&Features::new(0.5, 0.9, 120.0)), Mood::Sad);
        assert_eq!(label_by_rule(&Features::new(0.9, 0.5, 120.0)), Mood::Sad);
        assert_eq!(label_by_rule(&Features::new(0.9, 0.9, 90.0)), Mood::Sad);
        assert_eq!(label_by_rule(&Features::new(0.51, 0.51, 90.1)), Mood::Happy);
    }

    #[test]
    fn test_model_agrees_with_rule_on_clear_points() {
        let model = KnnModel::fit(DEFAULT_NEIGHBORS, labelled_grid()).unwrap();
        let labels = model
            .classify(&[Features::new(0.9, 0.9, 120.0), Features::new(0.2, 0.3, 80.0)])
            .unwrap();
        assert_eq!(labels, vec![Mood::Happy, Mood::Sad]);
    }

    #[test]
    fn test_classify_is_deterministic() {
        let model = KnnModel::fit(DEFAULT_NEIGHBORS, labelled_grid()).unwrap();
        let input = vec![
            Features::new(0.52, 0.49, 91.0),
            Features::new(0.7, 0.7, 100.0),
            Features::new(0.1, 0.9, 140.0),
        ];
        assert_eq!(model.classify(&input).unwrap(), model.classify(&input).unwrap());
    }

    #[test]
    fn test_classify_empty() {
        let model = KnnModel::fit(1, vec![point(0.5, 0.5, 100.0, Mood::Sad)]).unwrap();
        assert!(model.classify(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_classify_rejects_invalid_row() {
        let model = KnnModel::fit(1, vec![point(0.5, 0.5, 100.0, Mood::Sad)]).unwrap();
        let err = model
            .classify(&[Features::new(0.5, 0.5, 100.0), Features::new(0.5, 2.0, 100.0)])
            .unwrap_err();
        assert!(matches!(err, MoodError::InvalidFeatures { field: "valence", .. }));
    }

    #[test]
    fn test_majority_vote() {
        let model = KnnModel::fit(
            3,
            vec![
                point(0.9, 0.9, 120.0, Mood::Happy),
                point(0.2, 0.2, 70.0, Mood::Sad),
                point(0.21, 0.2, 70.0, Mood::Sad),
                point(0.22, 0.2, 70.0, Mood::Sad),
            ],
        )
        .unwrap();
        // nearest three are all Sad even though the query sits on the Happy point
        assert_eq!(model.classify(&[Features::new(0.9, 0.9, 71.0)]).unwrap(), vec![Mood::Sad]);
    }

    #[test]
    fn test_vote_tie_goes_to_happy() {
        let model = KnnModel::fit(
            2,
            vec![point(0.4, 0.4, 100.0, Mood::Sad), point(0.6, 0.6, 100.0, Mood::Happy)],
        )
        .unwrap();
        assert_eq!(model.classify(&[Features::new(0.5, 0.5, 100.0)]).unwrap(), vec![Mood::Happy]);
    }

    #[test]
    fn test_distance_tie_prefers_earlier_point() {
        let model = KnnModel::fit(
            1,
            vec![point(0.4, 0.5, 100.0, Mood::Sad), point(0.6, 0.5, 100.0, Mood::Happy)],
        )
        .unwrap();
        assert_eq!(model.classify(&[Features::new(0.5, 0.5, 100.0)]).unwrap(), vec![Mood::Sad]);
    }

    #[test]
    fn test_k_larger_than_training_set() {
        let model = KnnModel::fit(5, vec![point(0.1, 0.1, 60.0, Mood::Sad)]).unwrap();
        assert_eq!(model.classify(&[Features::new(0.9, 0.9, 130.0)]).unwrap(), vec![Mood::Sad]);
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(matches!(KnnModel::fit(5, vec![]), Err(MoodError::EmptyTrainingSet)));
        assert!(matches!(
            KnnModel::fit(0, vec![point(0.1, 0.1, 60.0, Mood::Sad)]),
            Err(MoodError::Model(_))
        ));
    }

    #[test]
    fn test_save_and_load_artifact() {
        let model = KnnModel::fit(DEFAULT_NEIGHBORS, labelled_grid()).unwrap();
        let path = std::env::temp_dir().join(format!("moodlist-model-{}.json", std::process::id()));
        model.save(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        let loaded = KnnModel::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(raw.contains("\"format_version\":1"));
        assert!(raw.contains("\"label\":1"));
        assert_eq!(loaded.k(), model.k());
        assert_eq!(loaded.len(), model.len());
        let probe = [Features::new(0.9, 0.9, 120.0), Features::new(0.55, 0.45, 95.0)];
        assert_eq!(loaded.classify(&probe).unwrap(), model.classify(&probe).unwrap());
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let path = std::env::temp_dir().join(format!("moodlist-model-v9-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"format_version":9,"k":1,"points":[{"energy":0.5,"valence":0.5,"tempo":100.0,"label":0}]}"#,
        )
        .unwrap();
        let err = KnnModel::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, MoodError::Model(_)));
    }

    #[test]
    fn test_mood_names() {
        let moods: Vec<Mood> = Mood::iter().collect();
        assert_eq!(moods, vec![Mood::Happy, Mood::Sad]);
        assert_eq!(Mood::Happy.to_string(), "Happy 😊");
        assert_eq!(Mood::Sad.short_name(), "Sad");
        assert_eq!(Mood::from_class(Mood::Sad.class()), Some(Mood::Sad));
        assert_eq!(Mood::from_class(2), None);
        assert_eq!(Mood::Happy.toggle(), Mood::Sad);
    }
}
