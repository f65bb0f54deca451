use chrono::{SecondsFormat, Utc};
use clap::Parser;
use otyugh_dungeon::actors::Monster;
use otyugh_dungeon::constants::MIN_TERMINAL_DISTANCE;
use otyugh_dungeon::types::{Location, MoveOutcome, Odor, PickTarget, ShotOutcome};
use otyugh_dungeon::{DungeonConfig, DungeonError, DungeonGame, GeneratedDungeon, RandomSource, Rng};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    cols: Option<usize>,
    #[arg(long)]
    interconnectivity: Option<usize>,
    #[arg(long)]
    wrap: bool,
    #[arg(long)]
    percentage: Option<u32>,
    #[arg(long)]
    monsters: Option<usize>,
    /// JSON dungeon config; overrides the individual dungeon options.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 10)]
    sessions: usize,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 500)]
    max_turns: usize,
    #[arg(long)]
    match_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SessionOutcome {
    Escaped,
    Eaten,
    TurnLimit,
    GenerationFailed,
}

#[derive(Clone, Debug, Serialize)]
struct SessionResultLine {
    session: usize,
    seed: u32,
    outcome: SessionOutcome,
    turns: usize,
    kills: usize,
    treasure: u32,
    #[serde(rename = "arrowsFired")]
    arrows_fired: usize,
    visited: usize,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    turn: usize,
    message: String,
}

#[derive(Clone, Debug, Serialize)]
struct SessionRunResult {
    #[serde(flatten)]
    result: SessionResultLine,
    #[serde(rename = "anomalyRecords")]
    anomaly_records: Vec<AnomalyRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(rename = "startedAt")]
    started_at: String,
    #[serde(rename = "finishedAt")]
    finished_at: String,
    config: DungeonConfig,
    #[serde(rename = "sessionCount")]
    session_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageTurns")]
    average_turns: usize,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    sessions: Vec<SessionResultLine>,
}

#[derive(Clone, Debug, Serialize)]
struct StructuredLogLine {
    timestamp: String,
    level: String,
    event: String,
    #[serde(rename = "matchId")]
    match_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    session: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    turn: Option<usize>,
    details: Value,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let started_at = now_rfc3339();
    let base_seed = normalize_seed(cli.seed.unwrap_or_else(|| Utc::now().timestamp_millis() as u64));
    let match_id = cli
        .match_id
        .clone()
        .unwrap_or_else(|| default_match_id(base_seed, Utc::now().timestamp_millis()));

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            emit_log(
                "error",
                "config_invalid",
                &match_id,
                None,
                None,
                None,
                json!({ "error": error.to_string() }),
            );
            std::process::exit(2);
        }
    };

    let mut has_anomaly = false;
    let mut session_results = Vec::new();
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_turns = 0usize;
    let mut total_anomalies = 0usize;

    for session in 0..cli.sessions {
        let seed = base_seed.wrapping_add(session as u32);
        emit_log(
            "info",
            "session_started",
            &match_id,
            Some(session),
            Some(seed),
            None,
            json!({
                "rows": config.rows,
                "cols": config.cols,
                "wrap": config.wrap,
                "interconnectivity": config.interconnectivity,
            }),
        );
        let run = run_session(&config, session, seed, cli.max_turns);

        if let Some(error) = run.error.as_ref() {
            emit_log(
                "warn",
                "session_failed",
                &match_id,
                Some(session),
                Some(seed),
                None,
                json!({ "error": error }),
            );
        }
        for anomaly in &run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &match_id,
                Some(session),
                Some(seed),
                Some(anomaly.turn),
                json!({ "message": anomaly.message }),
            );
        }

        if !run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += run.anomaly_records.len();
        total_turns += run.result.turns;
        *outcome_counts
            .entry(outcome_key(run.result.outcome))
            .or_insert(0) += 1;

        emit_log(
            "info",
            "session_finished",
            &match_id,
            Some(session),
            Some(seed),
            Some(run.result.turns),
            json!({
                "outcome": run.result.outcome,
                "kills": run.result.kills,
                "treasure": run.result.treasure,
                "anomalyCount": run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                "error",
                "result_serialize_failed",
                &match_id,
                Some(session),
                Some(seed),
                None,
                json!({ "error": error.to_string() }),
            ),
        }
        session_results.push(run.result);
    }

    let summary = build_run_summary(
        match_id.clone(),
        started_at,
        now_rfc3339(),
        config,
        session_results,
        outcome_counts,
        total_anomalies,
        total_turns,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &match_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &match_id,
        None,
        None,
        None,
        json!({
            "sessionCount": summary.session_count,
            "anomalyCount": summary.anomaly_count,
            "averageTurns": summary.average_turns,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn resolve_config(cli: &Cli) -> Result<DungeonConfig, DungeonError> {
    if let Some(path) = cli.config.as_ref() {
        return DungeonConfig::from_json_file(path);
    }
    let defaults = DungeonConfig::default();
    let config = DungeonConfig::new(
        cli.rows.unwrap_or(defaults.rows),
        cli.cols.unwrap_or(defaults.cols),
        cli.interconnectivity.unwrap_or(defaults.interconnectivity),
        cli.wrap,
        cli.percentage.unwrap_or(defaults.resource_percentage),
        cli.monsters.unwrap_or(defaults.monster_count),
    );
    config.validate()?;
    Ok(config)
}

fn run_session(config: &DungeonConfig, session: usize, seed: u32, max_turns: usize) -> SessionRunResult {
    let mut rng = Rng::new(seed);
    let mut anomalies = Vec::new();
    let mut anomaly_records = Vec::new();
    let mut anomaly_seen = HashSet::new();

    let mut game = match DungeonGame::new(config, &mut rng) {
        Ok(game) => game,
        Err(error) => {
            return SessionRunResult {
                result: SessionResultLine {
                    session,
                    seed,
                    outcome: SessionOutcome::GenerationFailed,
                    turns: 0,
                    kills: 0,
                    treasure: 0,
                    arrows_fired: 0,
                    visited: 0,
                    anomalies,
                },
                anomaly_records,
                error: Some(error.to_string()),
            };
        }
    };
    for message in collect_layout_anomalies(game.layout()) {
        push_anomaly(&mut anomalies, &mut anomaly_records, &mut anomaly_seen, 0, message);
    }

    let mut turns = 0usize;
    let mut kills = 0usize;
    let mut arrows_fired = 0usize;
    let mut outcome = SessionOutcome::TurnLimit;
    let mut error = None;

    if let Err(session_error) = game.create_player().and_then(|_| game.attach_player()) {
        error = Some(session_error.to_string());
    }

    while error.is_none() {
        match game.is_game_over() {
            Ok(true) => {
                outcome = if game.is_player_dead() {
                    SessionOutcome::Eaten
                } else {
                    SessionOutcome::Escaped
                };
                break;
            }
            Ok(false) => {}
            Err(session_error) => {
                error = Some(session_error.to_string());
                break;
            }
        }
        if turns >= max_turns {
            break;
        }
        turns += 1;

        match play_turn(&mut game, &mut rng) {
            Ok(TurnAction::Shot(shot)) => {
                arrows_fired += 1;
                if shot == ShotOutcome::Kill {
                    kills += 1;
                }
            }
            Ok(TurnAction::Moved) => {}
            Err(turn_error) => push_anomaly(
                &mut anomalies,
                &mut anomaly_records,
                &mut anomaly_seen,
                turns,
                format!("bot turn rejected: {turn_error}"),
            ),
        }

        for message in collect_turn_anomalies(&game) {
            push_anomaly(&mut anomalies, &mut anomaly_records, &mut anomaly_seen, turns, message);
        }
    }

    let view = game.player_view().ok();
    SessionRunResult {
        result: SessionResultLine {
            session,
            seed,
            outcome,
            turns,
            kills,
            treasure: view
                .as_ref()
                .map(|view| view.inventory.treasure_total())
                .unwrap_or(0),
            arrows_fired,
            visited: view.as_ref().map(|view| view.visited.len()).unwrap_or(0),
            anomalies,
        },
        anomaly_records,
        error,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TurnAction {
    Moved,
    Shot(ShotOutcome),
}

fn play_turn(game: &mut DungeonGame, rng: &mut dyn RandomSource) -> Result<TurnAction, DungeonError> {
    for target in [PickTarget::AllTreasure, PickTarget::AllArrows] {
        match game.pick_item(target, 0) {
            Ok(_) | Err(DungeonError::NothingToPick { .. }) => {}
            Err(error) => return Err(error),
        }
    }

    let here = game.player_location()?;
    let doors = game.doors_at(here)?.open_directions();
    if doors.is_empty() {
        return Err(DungeonError::illegal_session_state(format!(
            "no open doors at {here}"
        )));
    }

    let odor = game.odor_at(&here.to_string())?;
    if odor == Odor::Terrible && game.player_inventory()?.arrows > 0 {
        let direction = doors[rng.next_int(0, doors.len())];
        let shot = game.shoot(direction, 1)?;
        return Ok(TurnAction::Shot(shot));
    }

    let grid = game.layout().grid;
    let visited: HashSet<Location> = game
        .player_view()?
        .visited
        .into_iter()
        .collect();
    let fresh: Vec<_> = doors
        .iter()
        .copied()
        .filter(|direction| {
            grid.step(here, *direction)
                .is_some_and(|next| !visited.contains(&next))
        })
        .collect();
    let choices = if fresh.is_empty() { &doors } else { &fresh };
    let direction = choices[rng.next_int(0, choices.len())];
    match game.move_player(direction, rng)? {
        MoveOutcome::Survived | MoveOutcome::Eaten => Ok(TurnAction::Moved),
    }
}

fn collect_layout_anomalies(layout: &GeneratedDungeon) -> Vec<String> {
    let mut anomalies = Vec::new();
    let distances = layout.hop_distances(layout.start);
    if distances.iter().any(Option::is_none) {
        anomalies.push("maze does not reach every location".to_string());
    }
    match distances[layout.grid.index_of(layout.end)] {
        Some(distance) if distance >= MIN_TERMINAL_DISTANCE => {}
        other => anomalies.push(format!("start/end distance too short: {other:?}")),
    }

    for monster in &layout.monsters {
        let location = monster.location();
        if location == layout.start {
            anomalies.push(format!("monster on start: {location}"));
        }
        if layout.cell(location).map_or(true, |cell| cell.is_tunnel()) {
            anomalies.push(format!("monster outside a cave: {location}"));
        }
    }
    if !layout
        .monsters
        .iter()
        .any(|monster| monster.location() == layout.end)
    {
        anomalies.push(format!("no monster at end: {}", layout.end));
    }

    for cell in layout.cells.iter().filter(|cell| cell.is_tunnel()) {
        if cell.stock.has_treasure() {
            anomalies.push(format!("treasure in tunnel: {}", cell.location));
        }
    }
    anomalies
}

fn collect_turn_anomalies(game: &DungeonGame) -> Vec<String> {
    let mut anomalies = Vec::new();
    if game.monster_locations().len() > game.layout().monsters.len() {
        anomalies.push("monster count grew".to_string());
    }
    if let Ok(location) = game.player_location() {
        if !game.layout().grid.contains(location) {
            anomalies.push(format!("player outside grid: {location}"));
        }
    }
    anomalies
}

fn normalize_seed(seed: u64) -> u32 {
    seed as u32
}

fn push_anomaly(
    anomalies: &mut Vec<String>,
    anomaly_records: &mut Vec<AnomalyRecord>,
    anomaly_seen: &mut HashSet<String>,
    turn: usize,
    message: String,
) {
    anomaly_records.push(AnomalyRecord {
        turn,
        message: message.clone(),
    });
    if anomaly_seen.insert(message.clone()) {
        anomalies.push(message);
    }
}

fn default_match_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

#[allow(clippy::too_many_arguments)]
fn build_run_summary(
    match_id: String,
    started_at: String,
    finished_at: String,
    config: DungeonConfig,
    sessions: Vec<SessionResultLine>,
    outcome_counts: BTreeMap<String, usize>,
    anomaly_count: usize,
    total_turns: usize,
) -> RunSummary {
    let session_count = sessions.len();
    let average_turns = if session_count == 0 {
        0
    } else {
        total_turns / session_count
    };
    RunSummary {
        match_id,
        started_at,
        finished_at,
        config,
        session_count,
        anomaly_count,
        average_turns,
        outcome_counts,
        sessions,
    }
}

fn emit_log(
    level: &str,
    event: &str,
    match_id: &str,
    session: Option<usize>,
    seed: Option<u32>,
    turn: Option<usize>,
    details: Value,
) {
    let log_line = StructuredLogLine {
        timestamp: now_rfc3339(),
        level: level.to_string(),
        event: event.to_string(),
        match_id: match_id.to_string(),
        session,
        seed,
        turn,
        details,
    };
    match serde_json::to_string(&log_line) {
        Ok(line) => eprintln!("{line}"),
        Err(error) => eprintln!("{level} {event}: {error}"),
    }
}

fn outcome_key(outcome: SessionOutcome) -> String {
    match outcome {
        SessionOutcome::Escaped => "escaped",
        SessionOutcome::Eaten => "eaten",
        SessionOutcome::TurnLimit => "turn_limit",
        SessionOutcome::GenerationFailed => "generation_failed",
    }
    .to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session_result(outcome: SessionOutcome, turns: usize) -> SessionResultLine {
        SessionResultLine {
            session: 0,
            seed: 42,
            outcome,
            turns,
            kills: 0,
            treasure: 0,
            arrows_fired: 0,
            visited: 1,
            anomalies: Vec::new(),
        }
    }

    #[test]
    fn default_match_id_contains_seed_and_timestamp() {
        assert_eq!(default_match_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_calculates_average_turns() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            "2026-01-01T00:00:00.000Z".to_string(),
            "2026-01-01T00:00:01.000Z".to_string(),
            DungeonConfig::default(),
            vec![
                make_session_result(SessionOutcome::Escaped, 30),
                make_session_result(SessionOutcome::Eaten, 12),
            ],
            BTreeMap::from([("eaten".to_string(), 1usize), ("escaped".to_string(), 1usize)]),
            0,
            42,
        );
        assert_eq!(summary.average_turns, 21);
        assert_eq!(summary.session_count, 2);
        let json = serde_json::to_value(&summary).expect("summary serializes");
        assert_eq!(json["outcomeCounts"]["escaped"], 1);
        assert_eq!(json["config"]["monsterCount"], 2);
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("otyugh-dungeon-missing-{}", Utc::now().timestamp_millis()))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            now_rfc3339(),
            now_rfc3339(),
            DungeonConfig::default(),
            vec![make_session_result(SessionOutcome::TurnLimit, 500)],
            BTreeMap::from([("turn_limit".to_string(), 1usize)]),
            0,
            500,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn push_anomaly_keeps_records_and_deduplicates_summary_messages() {
        let mut anomalies = Vec::new();
        let mut records = Vec::new();
        let mut seen = HashSet::new();
        push_anomaly(&mut anomalies, &mut records, &mut seen, 10, "same anomaly".to_string());
        push_anomaly(&mut anomalies, &mut records, &mut seen, 11, "same anomaly".to_string());

        assert_eq!(anomalies.len(), 1);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].turn, 10);
        assert_eq!(records[1].turn, 11);
    }

    #[test]
    fn sessions_are_reproducible_per_seed() {
        let config = DungeonConfig::new(6, 6, 4, true, 40, 3);
        let first = run_session(&config, 0, 77, 200);
        let second = run_session(&config, 0, 77, 200);
        assert_eq!(first.result.outcome, second.result.outcome);
        assert_eq!(first.result.turns, second.result.turns);
        assert_eq!(first.result.visited, second.result.visited);
    }

    #[test]
    fn generated_sessions_report_no_anomalies() {
        let config = DungeonConfig::new(5, 6, 2, false, 30, 2);
        for seed in 0..20 {
            let run = run_session(&config, seed as usize, seed, 300);
            assert!(run.result.anomalies.is_empty(), "seed {seed}: {:?}", run.result.anomalies);
            assert!(run.result.turns <= 300);
        }
    }

    #[test]
    fn invalid_cli_dimensions_are_rejected() {
        let cli = Cli::parse_from(["simulate", "--rows", "2"]);
        assert!(matches!(
            resolve_config(&cli),
            Err(DungeonError::InvalidConfiguration { .. })
        ));
        let cli = Cli::parse_from(["simulate", "--wrap", "--monsters", "3"]);
        let config = resolve_config(&cli).expect("defaults fill the rest");
        assert!(config.wrap);
        assert_eq!(config.monster_count, 3);
        assert_eq!(outcome_key(SessionOutcome::TurnLimit), "turn_limit");
    }
}
