use breach_engine::{
    Choice, Direction, EndReason, Game, GameConfig, Input, Notification, Phase, SequenceStatus,
};
use rand::{rngs::StdRng, SeedableRng};

const CAMPAIGN: &str = r#"{
  "stages": [
    {
      "type": "breach",
      "config": {
        "matrix": 3, "buffer": 4, "timer": 30,
        "grid": [["55", "BD", "E9"], ["BD", "E9", "55"], ["E9", "55", "BD"]],
        "sequences": [
          {
            "size": 2, "description": "Initialize connection", "points": 10,
            "symbols": ["55", "BD"]
          },
          {
            "size": 3, "description": "Steal credentials", "points": 30,
            "symbols": ["55", "BD", "E9"]
          }
        ]
      }
    },
    {
      "type": "briefing",
      "config": { "title": "Deeper", "text": "Netwatch noticed you." }
    },
    {
      "type": "breach",
      "config": {
        "matrix": 3, "buffer": 3, "timer": 10,
        "grid": [["1C", "1C", "1C"], ["7A", "7A", "7A"], ["1C", "1C", "1C"]],
        "sequences": [
          { "size": 2, "description": "Remove logs", "points": 5, "symbols": ["7A", "7A"] }
        ]
      }
    }
  ]
}"#;

fn new_game() -> (Game, Vec<Notification>) {
    let config = GameConfig::from_json(CAMPAIGN).unwrap();
    Game::new(config, StdRng::seed_from_u64(0))
}

fn play(game: &mut Game, inputs: &[Input]) -> Vec<Notification> {
    inputs.iter().flat_map(|input| game.handle(*input)).collect()
}

#[test]
fn full_campaign_to_victory() {
    let (mut game, opening) = new_game();
    assert!(matches!(
        opening[0],
        Notification::RoundStarted {
            stage: 0,
            size: 3,
            capacity: 4,
            deadline_secs: 30
        }
    ));

    // (0,0)=55, down to (0,1)=BD, right to (1,1)=E9: both sequences in three picks
    let out = play(
        &mut game,
        &[
            Input::Commit,
            Input::Move(Direction::Down),
            Input::Commit,
            Input::Move(Direction::Right),
            Input::Commit,
        ],
    );
    assert!(out.contains(&Notification::RoundOver {
        reason: EndReason::AllCompleted,
        won: true,
        score: 40
    }));
    assert_eq!(game.score(), 40);

    let out = game.handle(Input::Choose(Choice::Continue));
    assert!(matches!(out[0], Notification::BriefingStarted { stage: 1, .. }));

    game.handle(Input::Commit);
    assert_eq!(game.phase(), &Phase::Playing(2));

    // burn a 1C to reach column 0, then take 7A twice along row 1
    let out = play(
        &mut game,
        &[
            Input::Commit,
            Input::Move(Direction::Down),
            Input::Commit,
            Input::Move(Direction::Right),
            Input::Commit,
        ],
    );
    assert!(out.contains(&Notification::RoundOver {
        reason: EndReason::BufferFull,
        won: true,
        score: 5
    }));
    assert_eq!(game.score(), 45);

    let out = game.handle(Input::Choose(Choice::Continue));
    assert_eq!(
        out[0],
        Notification::GameOver {
            terminal: true,
            victory: true,
            score: 45
        }
    );
    let out = game.handle(Input::Quit);
    assert_eq!(out, vec![Notification::Terminated { score: 45 }]);
}

#[test]
fn timeout_loses_and_restart_starts_over() {
    let (mut game, _) = new_game();
    let out = play(
        &mut game,
        &[
            Input::Commit,
            Input::Tick(std::time::Duration::from_secs(15)),
            Input::Tick(std::time::Duration::from_secs(15)),
        ],
    );
    assert!(out.contains(&Notification::RoundOver {
        reason: EndReason::TimedOut,
        won: false,
        score: 0
    }));
    assert!(out.contains(&Notification::ChoiceOffered {
        options: vec![Choice::Restart, Choice::Quit],
        highlighted: Choice::Restart
    }));

    let out = game.handle(Input::Commit);
    assert!(matches!(out[0], Notification::RoundStarted { stage: 0, .. }));
    let round = game.round().unwrap();
    assert!(round
        .sequences()
        .iter()
        .all(|sequence| sequence.status() == SequenceStatus::Running));
    assert_eq!(round.buffer().remaining_capacity(), 4);
}

#[test]
fn notifications_serialize_as_tagged_json() {
    let json = serde_json::to_string(&Notification::SequenceStatusChanged {
        id: 2,
        status: SequenceStatus::Failed,
        reward: 0,
    })
    .unwrap();
    assert_eq!(
        json,
        r#"{"event":"sequence_status_changed","id":2,"status":"failed","reward":0}"#
    );

    let json = serde_json::to_string(&Notification::Hovered {
        x: 1,
        y: 0,
        symbol: Some(breach_engine::Symbol::ByteE9),
    })
    .unwrap();
    assert_eq!(json, r#"{"event":"hovered","x":1,"y":0,"symbol":"E9"}"#);
}
