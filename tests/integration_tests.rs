//! Integration tests - sessions over the SQLite store and command text

use strategic_2048::config::AppConfig;
use strategic_2048::core::{
    ProgressStore, Session, SessionConfig, SessionEvent, SessionState,
};
use strategic_2048::store::SqliteProgressStore;
use strategic_2048::types::{Direction, GameCommand, GameMode};

fn run_script<S: ProgressStore>(session: &mut Session<S>, script: &[&str]) -> Vec<SessionEvent> {
    script
        .iter()
        .filter_map(|line| GameCommand::from_str(line))
        .flat_map(|command| session.apply(command))
        .collect()
}

#[test]
fn test_high_score_persists_between_sessions() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game_data.db");
    let config = SessionConfig {
        history_capacity: 10,
        seed: Some(314),
    };

    let best = {
        let store = SqliteProgressStore::open(&path).unwrap();
        let mut session = Session::new(GameMode::Classic, store, config);
        session.apply(GameCommand::SelectLevel(1));
        for i in 0..60 {
            session.apply(GameCommand::Move(Direction::ALL[i % 4]));
        }
        assert!(session.score() > 0);
        session.high_score()
    };

    let store = SqliteProgressStore::open(&path).unwrap();
    assert_eq!(store.high_score(GameMode::Classic), best);

    let session = Session::new(GameMode::Classic, store, config);
    assert_eq!(session.snapshot().high_score, best);
}

#[test]
fn test_text_commands_drive_a_session() {
    let store = SqliteProgressStore::open_in_memory().unwrap();
    let mut session = Session::new(
        GameMode::Adventure,
        store,
        SessionConfig {
            history_capacity: 5,
            seed: Some(2),
        },
    );

    let events = run_script(
        &mut session,
        &["select 1", "left", "up", "right", "down", "undo", "restart"],
    );

    assert_eq!(events[0], SessionEvent::LevelStarted { level: 1 });
    assert!(events.contains(&SessionEvent::Undone));
    assert_eq!(events.last(), Some(&SessionEvent::Restarted));
    assert_eq!(session.moves_used(), 0);
    assert_eq!(session.state(), SessionState::Playing);

    assert_eq!(run_script(&mut session, &["home"]), vec![SessionEvent::Exited]);
    assert!(run_script(&mut session, &["select 1", "left"]).is_empty());
}

#[test]
fn test_unknown_text_is_not_a_command() {
    for line in ["", "jump", "select", "select x", "left now"] {
        assert_eq!(GameCommand::from_str(line), None, "{line:?}");
    }
}

#[test]
fn test_snapshot_serializes_for_driver() {
    let store = SqliteProgressStore::open_in_memory().unwrap();
    let mut session = Session::new(
        GameMode::Swift,
        store,
        SessionConfig {
            history_capacity: 0,
            seed: Some(1),
        },
    );
    let events = session.apply(GameCommand::SelectLevel(1));

    let events_json = serde_json::to_value(&events).unwrap();
    assert_eq!(events_json[0]["event"], "level_started");
    assert_eq!(events_json[0]["level"], 1);

    let snapshot = serde_json::to_value(session.snapshot()).unwrap();
    assert_eq!(snapshot["mode"], "swift");
    assert_eq!(snapshot["budget"]["kind"], "time");
    assert_eq!(snapshot["budget"]["limit_ms"], 120_000);
    assert_eq!(snapshot["can_undo"], false);
}

#[test]
fn test_config_feeds_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let db = dir.path().join("progress.db");
    std::fs::write(
        &path,
        format!(
            "database = {:?}\nhistory_capacity = 1\nseed = 99\n",
            db.display().to_string()
        ),
    )
    .unwrap();

    let config = AppConfig::load(Some(&path));
    assert_eq!(config.database_path(), Some(db.clone()));

    let store = SqliteProgressStore::open(config.database_path().unwrap()).unwrap();
    let mut session = Session::new(GameMode::Classic, store, config.session_config());
    session.apply(GameCommand::SelectLevel(1));
    for dir in Direction::ALL {
        session.apply(GameCommand::Move(dir));
    }

    let undone = run_script(&mut session, &["undo", "undo"]);
    assert!(undone.len() <= 1);
    assert!(db.exists());
}
