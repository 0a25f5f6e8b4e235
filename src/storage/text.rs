//! Plain-text tournament files.
//!
//! Players file: one player per line, `name[,rating]`.
//! Round file: a header line, then `table,player one,a:b,player two`. A
//! trailing ` (score)` after a name is ignored, so a filled-in pairings file
//! can be loaded back as the next round.

use std::fs;
use std::io::{self, Stdout, Write};
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use super::{create_file, StorageError};
use crate::calculate::{PairingRow, StandingRow};
use crate::models::{TournamentBuilder, TournamentData, DEFAULT_RATING};
use crate::session::{TournamentSink, TournamentSource};

const ROUND_HEADER: &str = "table,player one,result,player two";

/// Loads a roster and its completed rounds from text files.
#[derive(Debug, Clone)]
pub struct TextFileInput {
    pub players_file: PathBuf,
    pub round_files: Vec<PathBuf>,
    pub separator: String,
    pub default_rating: i32,
}

impl TextFileInput {
    pub fn new(players_file: PathBuf, round_files: Vec<PathBuf>) -> Self {
        Self {
            players_file,
            round_files,
            separator: ",".to_string(),
            default_rating: DEFAULT_RATING,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn with_default_rating(mut self, rating: i32) -> Self {
        self.default_rating = rating;
        self
    }

    fn load_players(&self, builder: &mut TournamentBuilder) -> Result<(), StorageError> {
        let contents = fs::read_to_string(&self.players_file)?;
        let mut count = 0;

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut fields = line.split(self.separator.as_str()).map(str::trim);
            let name = fields.next().unwrap_or_default();
            let rating = match fields.next() {
                Some(rating) if !rating.is_empty() => {
                    rating.parse::<i32>().map_err(|_| StorageError::MalformedLine {
                        path: self.players_file.clone(),
                        line: index + 1,
                        reason: format!("invalid rating: {}", rating),
                    })?
                }
                _ => self.default_rating,
            };
            builder.register_with_rating(name, rating)?;
            count += 1;
        }

        debug!("Registered {} players from {:?}", count, self.players_file);
        Ok(())
    }

    fn load_round(
        &self,
        path: &Path,
        name_re: &Regex,
        builder: &mut TournamentBuilder,
    ) -> Result<(), StorageError> {
        let contents = fs::read_to_string(path)?;
        builder.next_round();

        let malformed = |line: usize, reason: String| StorageError::MalformedLine {
            path: path.to_path_buf(),
            line,
            reason,
        };

        for (index, line) in contents.lines().enumerate().skip(1) {
            if line.trim().is_empty() {
                continue;
            }
            let columns: Vec<&str> = line.split(self.separator.as_str()).collect();
            let [_, one, result, two] = columns.as_slice() else {
                return Err(malformed(
                    index + 1,
                    format!("expected 4 columns, found {}", columns.len()),
                ));
            };
            let one = player_name(name_re, one)
                .ok_or_else(|| malformed(index + 1, "missing first player".to_string()))?;
            let two = player_name(name_re, two)
                .ok_or_else(|| malformed(index + 1, "missing second player".to_string()))?;
            builder.add_match(one, result.trim(), two)?;
        }

        debug!("Loaded round from {:?}", path);
        Ok(())
    }
}

impl TournamentSource for TextFileInput {
    fn load(&self) -> Result<TournamentData, StorageError> {
        let name_re = Regex::new(r"^\s*(?P<name>[^(]*?)\s*(?:\(.*)?$")?;
        let mut builder = TournamentBuilder::new();

        self.load_players(&mut builder)?;
        for path in &self.round_files {
            self.load_round(path, &name_re, &mut builder)?;
        }

        Ok(builder.build())
    }
}

/// Name column with any `(score)` annotation removed.
fn player_name<'a>(name_re: &Regex, column: &'a str) -> Option<&'a str> {
    name_re
        .captures(column)
        .and_then(|c| c.name("name"))
        .map(|m| m.as_str())
        .filter(|name| !name.is_empty())
}

/// Explicit round files followed by the sorted matches of `pattern`.
/// Files already listed are not repeated.
pub fn expand_round_files(
    explicit: &[PathBuf],
    pattern: Option<&str>,
) -> Result<Vec<PathBuf>, StorageError> {
    let mut files = explicit.to_vec();
    if let Some(pattern) = pattern {
        let mut matched = Vec::new();
        for entry in glob::glob(pattern)? {
            matched.push(entry?);
        }
        matched.sort();
        for path in matched {
            if !files.contains(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn format_points(points: &[f64]) -> impl Iterator<Item = String> + '_ {
    points.iter().map(|p| p.to_string())
}

/// Writes standings and pairings to two text files.
#[derive(Debug, Clone)]
pub struct TextFileOutput {
    pub standings_file: PathBuf,
    pub pairings_file: PathBuf,
    pub separator: String,
}

impl TextFileOutput {
    pub fn new(standings_file: PathBuf, pairings_file: PathBuf) -> Self {
        Self {
            standings_file,
            pairings_file,
            separator: ",".to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }
}

impl TournamentSink for TextFileOutput {
    fn standings(&mut self, rows: &[StandingRow]) -> Result<(), StorageError> {
        let mut out = create_file(&self.standings_file)?;
        for row in rows {
            let line = std::iter::once(row.name.clone())
                .chain(format_points(&row.points_per_round))
                .collect::<Vec<_>>()
                .join(self.separator.as_str());
            debug!("{}", line);
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        info!("Wrote {} standings to {:?}", rows.len(), self.standings_file);
        Ok(())
    }

    fn pairings(&mut self, rows: &[PairingRow]) -> Result<(), StorageError> {
        let mut out = create_file(&self.pairings_file)?;
        writeln!(out, "{}", ROUND_HEADER.replace(',', &self.separator))?;
        for (table, row) in rows.iter().enumerate() {
            let line = [
                (table + 1).to_string(),
                format!("{} ({})", row.player_one, row.score_one),
                format!("{}:{}", row.points_one, row.points_two),
                format!("{} ({})", row.player_two, row.score_two),
            ]
            .join(self.separator.as_str());
            debug!("{}", line);
            writeln!(out, "{}", line)?;
        }
        out.flush()?;
        info!("Wrote {} pairings to {:?}", rows.len(), self.pairings_file);
        Ok(())
    }
}

/// Writes standings and pairings as tables to a terminal (or any writer).
pub struct TextStdOutput<W = Stdout> {
    writer: W,
    separator: String,
}

impl TextStdOutput<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TextStdOutput<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            separator: "\t".to_string(),
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TournamentSink for TextStdOutput<W> {
    fn standings(&mut self, rows: &[StandingRow]) -> Result<(), StorageError> {
        writeln!(self.writer, "== STANDINGS ==")?;
        for row in rows {
            let line = [row.name.clone(), format!("({})", row.rating)]
                .into_iter()
                .chain(format_points(&row.points_per_round))
                .collect::<Vec<_>>()
                .join(self.separator.as_str());
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn pairings(&mut self, rows: &[PairingRow]) -> Result<(), StorageError> {
        writeln!(self.writer, "== PAIRINGS ==")?;
        for row in rows {
            let line = [
                format!("{} ({})", row.player_one, row.score_one),
                format!("{}:{}", row.points_one, row.points_two),
                format!("{} ({})", row.player_two, row.score_two),
            ]
            .join(self.separator.as_str());
            writeln!(self.writer, "{}", line)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate;
    use crate::models::{PlayerId, TournamentError};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_players_and_rounds() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice\nBob,1800\n\nCarol\nDan\n");
        let round = write(
            &temp_dir,
            "round1.csv",
            "table,player one,result,player two\n1,Alice (0),1:0,Bob (0)\n2,Carol,0.5:0.5,Dan\n",
        );

        let data = TextFileInput::new(players, vec![round]).load().unwrap();

        assert_eq!(data.player_count(), 4);
        assert_eq!(data.players()[0].rating, DEFAULT_RATING);
        assert_eq!(data.players()[1].rating, 1800);
        assert_eq!(data.rounds().len(), 1);
        assert_eq!(data.players()[0].score, 1.0);
        assert_eq!(data.players()[3].points_per_round, vec![0.5]);
        assert!(data.players()[1].has_faced(PlayerId::new(0)));
    }

    #[test]
    fn test_load_rejects_duplicate_player() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice\nAlice\n");

        let err = TextFileInput::new(players, vec![]).load().unwrap_err();

        assert!(matches!(
            err,
            StorageError::Tournament(TournamentError::DuplicateRegistration(_))
        ));
    }

    #[test]
    fn test_load_rejects_unknown_player_in_round() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice\nBob\n");
        let round = write(&temp_dir, "round1.csv", "header\n1,Alice,1:0,Zed\n");

        let err = TextFileInput::new(players, vec![round]).load().unwrap_err();

        assert!(matches!(
            err,
            StorageError::Tournament(TournamentError::UnknownPlayer(name)) if name == "Zed"
        ));
    }

    #[test]
    fn test_load_reports_malformed_line() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice\nBob\n");
        let round = write(&temp_dir, "round1.csv", "header\nAlice,1:0,Bob\n");

        let err = TextFileInput::new(players, vec![round]).load().unwrap_err();

        assert!(matches!(err, StorageError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_load_custom_separator() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice;1700\nBob\n");
        let round = write(&temp_dir, "round1.csv", "header\n1;Alice (0);0:1;Bob (0)\n");

        let data = TextFileInput::new(players, vec![round])
            .with_separator(";")
            .with_default_rating(1500)
            .load()
            .unwrap();

        assert_eq!(data.players()[0].rating, 1700);
        assert_eq!(data.players()[1].rating, 1500);
        assert_eq!(data.players()[1].score, 1.0);
    }

    #[test]
    fn test_player_name_strips_score() {
        let re = Regex::new(r"^\s*(?P<name>[^(]*?)\s*(?:\(.*)?$").unwrap();
        assert_eq!(player_name(&re, "Alice (2.5)"), Some("Alice"));
        assert_eq!(player_name(&re, " Mary Ann "), Some("Mary Ann"));
        assert_eq!(player_name(&re, " (1)"), None);
    }

    #[test]
    fn test_expand_round_files() {
        let temp_dir = TempDir::new().unwrap();
        let r2 = write(&temp_dir, "round2.csv", "header\n");
        let r1 = write(&temp_dir, "round1.csv", "header\n");
        let pattern = temp_dir.path().join("round*.csv");

        let files = expand_round_files(&[r2.clone()], Some(pattern.to_str().unwrap())).unwrap();

        assert_eq!(files, vec![r2, r1]);
    }

    #[test]
    fn test_file_output_round_trips_as_round() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice\nBob\n");
        let data = TextFileInput::new(players.clone(), vec![]).load().unwrap();
        let pairings_file = temp_dir.path().join("out/pairings.csv");
        let mut output = TextFileOutput::new(temp_dir.path().join("out/standings.csv"), pairings_file.clone());

        let rows = calculate::pairing_rows(
            &data,
            &[crate::models::Match::pairing(PlayerId::new(0), PlayerId::new(1))],
        );
        output.pairings(&rows).unwrap();
        output.standings(&calculate::standings(&data)).unwrap();

        let written = fs::read_to_string(&pairings_file).unwrap();
        assert_eq!(written, "table,player one,result,player two\n1,Alice (0),0:0,Bob (0)\n");

        let reloaded = TextFileInput::new(players, vec![pairings_file]).load().unwrap();
        assert_eq!(reloaded.rounds().len(), 1);
        assert!(reloaded.players()[0].has_faced(PlayerId::new(1)));
    }

    #[test]
    fn test_standings_file_format() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice\nBob\n");
        let round = write(&temp_dir, "round1.csv", "header\n1,Alice,1:0,Bob\n");
        let data = TextFileInput::new(players, vec![round]).load().unwrap();
        let standings_file = temp_dir.path().join("standings.csv");
        let mut output = TextFileOutput::new(standings_file.clone(), temp_dir.path().join("p.csv"));

        output.standings(&calculate::standings(&data)).unwrap();

        assert_eq!(fs::read_to_string(standings_file).unwrap(), "Alice,1\nBob,0\n");
    }

    #[test]
    fn test_std_output_tables() {
        let temp_dir = TempDir::new().unwrap();
        let players = write(&temp_dir, "players.txt", "Alice,1700\nBob\n");
        let round = write(&temp_dir, "round1.csv", "header\n1,Alice,0.5:0.5,Bob\n");
        let data = TextFileInput::new(players, vec![round]).load().unwrap();
        let mut output = TextStdOutput::new(Vec::new());

        output.standings(&calculate::standings(&data)).unwrap();
        output
            .pairings(&calculate::pairing_rows(
                &data,
                &[crate::models::Match::pairing(PlayerId::new(1), PlayerId::new(0))],
            ))
            .unwrap();

        let text = String::from_utf8(output.into_inner()).unwrap();
        assert_eq!(
            text,
            "== STANDINGS ==\nAlice\t(1700)\t0.5\nBob\t(1600)\t0.5\n== PAIRINGS ==\nBob (0.5)\t0:0\tAlice (0.5)\n"
        );
    }
}
