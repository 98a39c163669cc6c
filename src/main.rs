//! Parade Catch entry point
//!
//! The native build runs a headless demo session: the idle-mode AI plays
//! a few simulated minutes at a fixed frame delta and logs the outcome.
//! On the web the crate is consumed as a cdylib by the renderer shell, so
//! the wasm entry only wires up logging.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use parade_catch::api::{NullSink, SubmitScore, submit_score_fire_and_forget};
    use parade_catch::consts::SIM_DEMO_DT;
    use parade_catch::highscores::{HighScoreEntry, HighScores};
    use parade_catch::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(0xC0FFEE);

    let mut state = GameState::new(seed);
    state.start_game();
    log::info!(
        "demo session: seed={}, color={}, target={}",
        seed,
        state.player_color.as_str(),
        state.target_score
    );

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    // Up to five simulated minutes, advancing level by level
    let mut frames = 0u32;
    while state.clock_ms < 300_000.0 {
        tick(&mut state, &input, SIM_DEMO_DT);
        frames += 1;

        if state.phase == GamePhase::Won {
            match state.end_reason {
                Some(parade_catch::sim::EndReason::Completed) => {
                    log::info!(
                        "level {} cleared at {:.1}s (combo peak {}x)",
                        state.level,
                        state.clock_ms / 1000.0,
                        state.max_combo
                    );
                    state.next_level();
                }
                reason => {
                    log::info!("run ended: {:?} at {:.1}s", reason, state.clock_ms / 1000.0);
                    break;
                }
            }
        }
    }

    log::info!(
        "demo over after {} frames: level={}, score={}/{}, catches={}, misses={}, coins={}",
        frames,
        state.level,
        state.score,
        state.target_score,
        state.total_catches,
        state.missed_throws,
        state.coins
    );
    for bot in &state.bot_scores {
        log::info!("  {} ({}): {} catches", bot.name, bot.color, bot.catches);
    }

    // Local table plus the fire-and-forget remote push
    let mut table = HighScores::load();
    let _ = table.add_score(HighScoreEntry {
        name: "demo".to_string(),
        score: state.score,
        level: state.level,
        max_combo: state.max_combo,
        timestamp: 0.0,
    });
    table.save();
    submit_score_fire_and_forget(
        &mut NullSink,
        SubmitScore {
            name: "demo".to_string(),
            score: state.score,
        },
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    parade_catch::init_wasm_logging();
    log::info!("parade-catch loaded; the shell drives the simulation");
}
