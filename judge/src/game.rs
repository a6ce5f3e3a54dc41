use quantum::Phase;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::bot::{Bot, Claim};
use crate::recording::GameRecording;
use crate::table::{Action, ActionOutcome, Table};
use crate::Config;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameResult {
    WonByPlayer { player_idx: usize },
    /// Nobody won within the move limit.
    Abandoned,
    /// The player kept proposing rejected actions.
    Stalled { player_idx: usize },
}

/// The result of one game. Players are indexed like the bots passed to
/// [`play_game`], not by their seat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameReport {
    pub result: GameResult,
    pub move_number: u32,
    pub contradiction_count: Vec<u32>,
}

/// Seats the bots in random order and plays one game.
///
/// Returns an error only if the table cannot be set up or the recording
/// fails, not when a bot misbehaves.
pub fn play_game(config: &mut Config, bots: &mut [Box<dyn Bot>]) -> anyhow::Result<GameReport> {
    let mut seating: Vec<usize> = (0..bots.len()).collect();
    seating.shuffle(&mut config.rng);

    let mut table = Table::new(bots.len(), config.max_hint_level)?;
    let result = match seat_players(config, &mut table, bots, &seating)? {
        Some(result) => result,
        None => play_rounds(config, &mut table, bots, &seating)?,
    };

    if let Some(recorder) = &mut config.recorder {
        let recording = GameRecording {
            players: seating
                .iter()
                .map(|&player_idx| String::from(bots[player_idx].name()))
                .collect(),
            suit_names: table.suit_names().to_vec(),
            winner: table.game().winner(),
            log: table.log().to_vec(),
        };
        recorder.write_game_recording(&recording)?;
    }

    let mut contradiction_count = vec![0; bots.len()];
    for (seat, &count) in table.contradiction_count().iter().enumerate() {
        contradiction_count[seating[seat]] = count;
    }
    Ok(GameReport {
        result,
        move_number: table.game().move_number(),
        contradiction_count,
    })
}

/// Lets every bot pick a suit name and a hint level.
fn seat_players(
    config: &Config,
    table: &mut Table,
    bots: &mut [Box<dyn Bot>],
    seating: &[usize],
) -> anyhow::Result<Option<GameResult>> {
    for (seat, &player_idx) in seating.iter().enumerate() {
        let bot = &mut bots[player_idx];
        let mut rejected = Vec::new();
        loop {
            if rejected.len() >= config.max_attempts {
                return Ok(Some(GameResult::Stalled { player_idx }));
            }
            let suit_name = bot.choose_suit_name(&rejected);
            match table.apply(
                seat,
                Action::SetSuitName {
                    suit_name: suit_name.clone(),
                },
            ) {
                Ok(_) => break,
                Err(err) => {
                    debug!(player = bot.name(), %err, "Rejected suit name");
                    rejected.push(suit_name);
                }
            }
        }
        let hint_level = bot.hint_level(table.max_hint_level());
        table.apply(seat, Action::SetHintLevel { hint_level })?;
    }
    Ok(None)
}

fn play_rounds(
    config: &Config,
    table: &mut Table,
    bots: &mut [Box<dyn Bot>],
    seating: &[usize],
) -> anyhow::Result<GameResult> {
    while let Some(seat) = table.game().player_to_act() {
        if table.game().move_number() > config.max_moves {
            return Ok(GameResult::Abandoned);
        }
        let player_idx = seating[seat];
        let bot = &mut bots[player_idx];
        let view = table.export_state(Some(seat))?;

        match view.game.phase {
            Phase::TargetPlayer => {
                // Without hints most of the (player, suit) pairs can be contradictions.
                let number_of_players = table.number_of_players();
                let max_attempts = config
                    .max_attempts
                    .max(number_of_players * number_of_players);
                let mut rejected = Vec::new();
                loop {
                    if rejected.len() >= max_attempts {
                        return Ok(GameResult::Stalled { player_idx });
                    }
                    let Some((targeted_player, suit)) = bot.choose_target(&view, &rejected) else {
                        return Ok(GameResult::Stalled { player_idx });
                    };
                    let action = Action::TargetPlayer {
                        targeted_player,
                        suit,
                    };
                    if let Ok(ActionOutcome::Success) = table.apply(seat, action) {
                        break;
                    }
                    rejected.push((targeted_player, suit));
                }
            }
            Phase::Response => {
                let mut rejected = Vec::new();
                loop {
                    if rejected.len() >= config.max_attempts {
                        return Ok(GameResult::Stalled { player_idx });
                    }
                    let Some(response) = bot.respond(&view, &rejected) else {
                        return Ok(GameResult::Stalled { player_idx });
                    };
                    if let Ok(ActionOutcome::Success) =
                        table.apply(seat, Action::RespondToTarget { response })
                    {
                        break;
                    }
                    rejected.push(response);
                }
            }
            Phase::ClaimWin => {
                let action = match bot.claim(&view) {
                    Claim::NoWin => Action::ClaimNoWin,
                    Claim::OwnSuit(suit) => Action::ClaimOwnSuit { suit },
                    Claim::AllSuitsDetermined(suit_allocation) => {
                        Action::ClaimAllSuitsDetermined { suit_allocation }
                    }
                };
                match table.apply(seat, action) {
                    Ok(ActionOutcome::Won | ActionOutcome::Success) => {}
                    // A wrong claim of a suit already ended the round.
                    Ok(_) if table.game().phase() != Phase::ClaimWin => {}
                    _ => {
                        table.apply(seat, Action::ClaimNoWin)?;
                    }
                }
            }
            Phase::Finished => break,
        }
    }

    Ok(match table.game().winner() {
        Some(seat) => GameResult::WonByPlayer {
            player_idx: seating[seat],
        },
        None => GameResult::Abandoned,
    })
}
