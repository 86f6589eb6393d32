//! yev-logging: NDJSON events and run manifests.
//!
//! Append-only NDJSON logs for post-mortems of simulations and decisions.
//! Events carry plain values (pip lists, category names) so this crate stays
//! independent of the engine types.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run manifest schema version.
pub const RUN_MANIFEST_VERSION: u32 = 1;

/// Event schema version carried in every event's `v` block.
pub const EVENT_SCHEMA_VERSION: u32 = 1;

/// Scoring rules the events were produced under.
pub const RULESET_ID: &str = "yahtzee_13cat_bonus35_v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifestV1 {
    pub run_manifest_version: u32,

    pub run_id: String,
    pub created_ts_ms: u64,
    pub ruleset_id: String,

    // Hashes for reproducibility.
    pub git_hash: Option<String>,
    pub config_hash: Option<String>,

    // What was run.
    pub command: String,
    pub strategies: Vec<String>,
    pub games_per_strategy: u64,
    pub seed: u64,
    pub events_path: Option<String>,

    // Counters.
    pub games_completed: u64,
    pub finished_ts_ms: Option<u64>,
}

impl RunManifestV1 {
    pub fn new(run_id: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            run_manifest_version: RUN_MANIFEST_VERSION,
            run_id: run_id.into(),
            created_ts_ms: now_ms(),
            ruleset_id: RULESET_ID.to_string(),
            git_hash: None,
            config_hash: None,
            command: command.into(),
            strategies: Vec::new(),
            games_per_strategy: 0,
            seed: 0,
            events_path: None,
            games_completed: 0,
            finished_ts_ms: None,
        }
    }
}

pub fn now_ms() -> u64 {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    d.as_millis() as u64
}

pub fn hash_config_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

pub fn try_git_hash() -> Option<String> {
    use std::process::Command;

    let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
    if !out.status.success() {
        return None;
    }
    let s = String::from_utf8(out.stdout).ok()?;
    let t = s.trim();
    if t.is_empty() {
        None
    } else {
        Some(t.to_string())
    }
}

pub fn read_manifest(path: impl AsRef<Path>) -> Result<RunManifestV1, NdjsonError> {
    let bytes = std::fs::read(path)?;
    Ok(serde_json::from_slice::<RunManifestV1>(&bytes)?)
}

pub fn write_manifest_atomic(path: impl AsRef<Path>, m: &RunManifestV1) -> Result<(), NdjsonError> {
    let path = path.as_ref();
    let tmp = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(m)?;
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct VersionInfoV1 {
    pub schema_version: u32,
    pub ruleset_id: &'static str,
    pub yev_version: &'static str,
}

impl Default for VersionInfoV1 {
    fn default() -> Self {
        Self {
            schema_version: EVENT_SCHEMA_VERSION,
            ruleset_id: RULESET_ID,
            yev_version: VERSION,
        }
    }
}

/// One engine decision inside a turn.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub run_id: String,
    pub strategy: String,
    pub game_id: u64,
    pub turn: u8,
    /// Index of the decision within the turn.
    pub step: u8,

    /// Pip values on the table, ascending.
    pub dice: Vec<u8>,
    /// "commit" | "reroll"
    pub action: &'static str,
    pub category: Option<String>,
    pub keep: Option<Vec<u8>>,
    pub expected_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnSummaryV1 {
    pub turn: u8,
    pub category: String,
    pub dice: Vec<u8>,
    pub score: i32,
    pub rolls: u8,
}

/// A finished game.
#[derive(Debug, Clone, Serialize)]
pub struct GameEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub run_id: String,
    pub strategy: String,
    pub game_id: u64,
    pub seed: u64,

    pub total: i32,
    pub upper_total: i32,
    pub upper_bonus: bool,
    pub rolls_used: u64,
    pub turns: Vec<TurnSummaryV1>,
}

/// Aggregate of one strategy's simulation.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummaryEventV1 {
    pub event: &'static str,
    pub ts_ms: u64,
    pub v: VersionInfoV1,

    pub run_id: String,
    pub strategy: String,
    pub games: u64,
    pub seed: u64,

    pub mean: f64,
    pub median: i32,
    pub std_dev: f64,
    pub min: i32,
    pub max: i32,
    pub upper_bonus_rate: f64,

    pub ev_cache_hits: u64,
    pub ev_cache_misses: u64,
    pub elapsed_ms: u64,
}

#[derive(Debug)]
pub enum NdjsonError {
    Io(io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for NdjsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "event log I/O error: {e}"),
            Self::Json(e) => write!(f, "event log JSON error: {e}"),
        }
    }
}

impl std::error::Error for NdjsonError {}

impl From<io::Error> for NdjsonError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for NdjsonError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Append-only NDJSON writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct NdjsonWriter {
    w: BufWriter<File>,
    lines_since_flush: u64,
    flush_every_lines: u64,
    lines_written: u64,
}

impl NdjsonWriter {
    /// Open a file for append. Creates it if it doesn't exist.
    pub fn open_append(path: impl AsRef<Path>) -> Result<Self, NdjsonError> {
        Self::open_append_with_flush(path, 0)
    }

    /// `flush_every_lines=0` disables periodic flushing.
    pub fn open_append_with_flush(
        path: impl AsRef<Path>,
        flush_every_lines: u64,
    ) -> Result<Self, NdjsonError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let f = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            w: BufWriter::new(f),
            lines_since_flush: 0,
            flush_every_lines,
            lines_written: 0,
        })
    }

    pub fn write_event<T: Serialize>(&mut self, event: &T) -> Result<(), NdjsonError> {
        let mut buf = serde_json::to_vec(event)?;
        buf.push(b'\n');
        self.w.write_all(&buf)?;
        self.lines_written += 1;
        self.lines_since_flush += 1;
        if self.flush_every_lines > 0 && self.lines_since_flush >= self.flush_every_lines {
            self.flush()?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<(), NdjsonError> {
        self.w.flush()?;
        self.lines_since_flush = 0;
        Ok(())
    }

    /// Lines written through this writer.
    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::Value;

    fn read_ndjson_lenient(path: &Path) -> Vec<Value> {
        let s = fs::read_to_string(path).expect("read");
        let mut out = Vec::new();
        for line in s.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if let Ok(v) = serde_json::from_str::<Value>(line) {
                out.push(v);
            }
        }
        out
    }

    fn sample_game(game_id: u64) -> GameEventV1 {
        GameEventV1 {
            event: "game",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            run_id: "r".to_string(),
            strategy: "Greedy".to_string(),
            game_id,
            seed: 7 + game_id,
            total: 120,
            upper_total: 60,
            upper_bonus: false,
            rolls_used: 13,
            turns: vec![TurnSummaryV1 {
                turn: 0,
                category: "yahtzee".to_string(),
                dice: vec![5, 5, 5, 5, 5],
                score: 50,
                rolls: 1,
            }],
        }
    }

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn writes_one_valid_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        let mut w = NdjsonWriter::open_append(&path).unwrap();

        w.write_event(&sample_game(0)).unwrap();
        w.write_event(&sample_game(1)).unwrap();
        w.flush().unwrap();
        assert_eq!(w.lines_written(), 2);

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 2);
        assert_eq!(vals[0]["event"], "game");
        assert_eq!(vals[1]["game_id"], 1);
        assert_eq!(vals[1]["seed"], 8);
        assert_eq!(vals[0]["v"]["ruleset_id"], RULESET_ID);
        assert_eq!(vals[0]["turns"][0]["dice"], serde_json::json!([5, 5, 5, 5, 5]));
    }

    #[test]
    fn periodic_flush_makes_lines_visible() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.ndjson");
        let mut w = NdjsonWriter::open_append_with_flush(&path, 1).unwrap();

        let e = DecisionEventV1 {
            event: "decision",
            ts_ms: now_ms(),
            v: VersionInfoV1::default(),
            run_id: "r".to_string(),
            strategy: "ExpectedValue".to_string(),
            game_id: 3,
            turn: 4,
            step: 1,
            dice: vec![1, 2, 3, 4, 6],
            action: "reroll",
            category: None,
            keep: Some(vec![2, 3, 4, 6]),
            expected_value: 40.0 / 6.0,
        };
        w.write_event(&e).unwrap();

        // No explicit flush: flush_every=1 already pushed the line out.
        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["action"], "reroll");
        assert_eq!(vals[0]["category"], Value::Null);
        assert_eq!(vals[0]["keep"], serde_json::json!([2, 3, 4, 6]));
    }

    #[test]
    fn append_preserves_earlier_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");
        for id in 0..2 {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&sample_game(id)).unwrap();
            w.flush().unwrap();
        }
        assert_eq!(read_ndjson_lenient(&path).len(), 2);
    }

    #[test]
    fn lenient_reader_tolerates_trailing_partial_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.ndjson");

        {
            let mut w = NdjsonWriter::open_append(&path).unwrap();
            w.write_event(&sample_game(0)).unwrap();
            w.flush().unwrap();
        }

        // Simulate crash: append a partial JSON line (no newline, invalid JSON).
        let mut f = OpenOptions::new().append(true).open(&path).unwrap();
        f.write_all(br#"{"event":"game","total":"#).unwrap();
        f.flush().unwrap();

        let vals = read_ndjson_lenient(&path);
        assert_eq!(vals.len(), 1);
        assert_eq!(vals[0]["total"], 120);
    }

    #[test]
    fn config_hash_is_stable_hex() {
        let a = hash_config_bytes(b"engine:\n  max_attempts: 3\n");
        let b = hash_config_bytes(b"engine:\n  max_attempts: 3\n");
        let c = hash_config_bytes(b"engine:\n  max_attempts: 2\n");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn manifest_write_is_atomic_wrt_tmp_file() {
        let dir = tempfile::tempdir().unwrap();
        let run_json = dir.path().join("run.json");

        let mut m = RunManifestV1::new("r", "sim");
        m.config_hash = Some("abc".to_string());
        m.strategies = vec!["Greedy".to_string()];
        m.games_per_strategy = 10;
        write_manifest_atomic(&run_json, &m).unwrap();

        // Simulate crash leaving a corrupt tmp file around; run.json must remain readable.
        let tmp = run_json.with_extension("json.tmp");
        fs::write(&tmp, b"{not valid json").unwrap();

        let got = read_manifest(&run_json).unwrap();
        assert_eq!(got.run_id, "r");
        assert_eq!(got.ruleset_id, RULESET_ID);

        // Update manifest and ensure it overwrites cleanly.
        m.games_completed = 10;
        m.finished_ts_ms = Some(now_ms());
        write_manifest_atomic(&run_json, &m).unwrap();
        let got2 = read_manifest(&run_json).unwrap();
        assert_eq!(got2.games_completed, 10);
        assert!(got2.finished_ts_ms.is_some());
    }
}
