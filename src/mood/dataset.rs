use serde::{Deserialize, Serialize};
use std::{collections::HashSet, path::Path};
use tracing::{debug, info, warn};

use super::error::{MoodError, MoodResult};
use super::features::Features;
use super::matcher::normalize;

/// One row of the reference dataset. Column names follow the CSV headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceSong {
    #[serde(rename = "Song name")]
    pub song_name: String,
    #[serde(rename = "Singer")]
    pub singer: String,
    pub energy: f64,
    pub valence: f64,
    pub tempo: f64,
}

impl ReferenceSong {
    pub fn new(song_name: &str, singer: &str, energy: f64, valence: f64, tempo: f64) -> Self {
        ReferenceSong {
            song_name: song_name.to_string(),
            singer: singer.to_string(),
            energy,
            valence,
            tempo,
        }
    }

    pub fn features(&self) -> Features {
        Features::new(self.energy, self.valence, self.tempo)
    }
}

/// The static song table, loaded once and never mutated.
/// Every song in it has valid features.
#[derive(Debug, Clone, Default)]
pub struct ReferenceDataset {
    songs: Vec<ReferenceSong>,
}

/// Reads every row of a reference CSV as-is: no validation, no dedup.
pub fn read_rows(path: impl AsRef<Path>) -> MoodResult<Vec<ReferenceSong>> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut rows = Vec::new();
    for (i, row) in reader.deserialize::<ReferenceSong>().enumerate() {
        // +2: one for the header line, one for 1-based numbering
        rows.push(row.map_err(|source| MoodError::Dataset { row: i + 2, source })?);
    }
    Ok(rows)
}

impl ReferenceDataset {
    /// Drops rows with out-of-range features, then keeps the first record of every
    /// (song, singer) pair, compared after normalization.
    pub fn from_records(records: impl IntoIterator<Item = ReferenceSong>) -> Self {
        let mut seen = HashSet::new();
        let mut songs = Vec::new();
        for song in records {
            if let Err(e) = song.features().validate() {
                warn!("Skipping reference song {} / {}: {e}", song.song_name, song.singer);
                continue;
            }
            let key = (normalize(&song.song_name), normalize(&song.singer));
            if seen.insert(key) {
                songs.push(song);
            } else {
                debug!("Skipping duplicate reference song {} / {}", song.song_name, song.singer);
            }
        }
        ReferenceDataset { songs }
    }

    pub fn load(path: impl AsRef<Path>) -> MoodResult<Self> {
        let path = path.as_ref();
        let dataset = Self::from_records(read_rows(path)?);
        info!("Loaded {} reference songs from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    pub fn songs(&self) -> &[ReferenceSong] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_csv(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("moodlist-{}-{name}.csv", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_load_reads_named_columns() {
        let path = temp_csv(
            "named",
            "Singer,Song name,danceability,energy,valence,tempo\n\
             Ann,Blue Skies,0.4,0.9,0.8,120.5\n\
             Sam,Bluebird,0.3,0.1,0.2,60\n",
        );
        let dataset = ReferenceDataset::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.songs()[0].song_name, "Blue Skies");
        assert_eq!(dataset.songs()[0].singer, "Ann");
        assert_eq!(dataset.songs()[0].features(), Features::new(0.9, 0.8, 120.5));
    }

    #[test]
    fn test_load_reports_bad_row() {
        let path = temp_csv(
            "bad",
            "Singer,Song name,energy,valence,tempo\n\
             Ann,Blue Skies,0.9,0.8,120\n\
             Sam,Bluebird,loud,0.2,60\n",
        );
        let err = ReferenceDataset::load(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, MoodError::Dataset { row: 3, .. }));
    }

    #[test]
    fn test_from_records_keeps_first_duplicate() {
        let dataset = ReferenceDataset::from_records(vec![
            ReferenceSong::new("Halo", "Beyonce", 0.7, 0.4, 80.0),
            ReferenceSong::new(" halo ", "BEYONCE", 0.1, 0.1, 60.0),
            ReferenceSong::new("Halo", "Other", 0.5, 0.5, 100.0),
        ]);
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.songs()[0].energy, 0.7);
        assert_eq!(dataset.songs()[1].singer, "Other");
    }

    #[test]
    fn test_invalid_row_does_not_shadow_valid_duplicate() {
        let dataset = ReferenceDataset::from_records(vec![
            ReferenceSong::new("Halo", "Beyonce", 1.7, 0.4, 80.0),
            ReferenceSong::new("Halo", "Beyonce", 0.6, 0.4, 80.0),
            ReferenceSong::new("Creep", "Radiohead", 0.3, 0.1, 0.0),
        ]);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.songs()[0].energy, 0.6);
    }

    #[test]
    fn test_read_rows_keeps_everything() {
        let path = temp_csv(
            "raw",
            "Singer,Song name,energy,valence,tempo\n\
             Ann,Blue Skies,0.9,0.8,120\n\
             Ann,Blue Skies,0.9,0.8,120\n\
             Sam,Bluebird,0.1,0.2,0\n",
        );
        let rows = read_rows(&path).unwrap();
        let dataset = ReferenceDataset::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(rows.len(), 3);
        assert_eq!(dataset.len(), 1);
    }
}
