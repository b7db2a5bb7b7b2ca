use std::time::Duration;

use clap::Args;
use roundbell_core::{AppConfig, AppState, Event, SettingsPatch};
use tokio::time::MissedTickBehavior;
use tracing::debug;

use crate::common::{describe, format_clock, open_app, parse_duration_secs};

#[derive(Args)]
pub struct RunArgs {
    /// Round length (90, 90s, 3m, 1m30s); saved as the new default
    #[arg(long = "round", value_parser = parse_duration_secs)]
    round: Option<u32>,
    /// Break length, may be 0; saved as the new default
    #[arg(long = "break", value_parser = parse_duration_secs)]
    break_: Option<u32>,
    /// Number of rounds; saved as the new default
    #[arg(long)]
    rounds: Option<u32>,
    /// Record the partial workout when interrupted with Ctrl-C
    #[arg(long)]
    save_on_quit: bool,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let mut app = open_app(&config)?;

    let patch = SettingsPatch {
        round_duration: args.round,
        break_duration: args.break_,
        rounds: args.rounds,
        ..Default::default()
    };
    if !patch.is_empty() {
        app.update_settings(&patch);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(drive(&mut app, config.tick_interval(), args.save_on_quit));

    app.flush();
    result
}

/// Tick once per `period` until the workout completes or Ctrl-C pauses it.
async fn drive(
    app: &mut AppState,
    period: Duration,
    save_on_quit: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    app.start();
    let settings = app.settings().clone();
    println!(
        "{} rounds of {} with {} breaks",
        settings.rounds,
        format_clock(settings.round_duration),
        format_clock(settings.break_duration)
    );
    render(app);

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // the first tick completes immediately
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if !app.should_tick() {
                    break;
                }
                match app.tick() {
                    Some(Event::BreakStarted { fact, .. }) => {
                        render(app);
                        println!("  {fact}");
                    }
                    Some(Event::WorkoutCompleted { .. }) => {
                        if let Some(message) = &app.timer().status_message {
                            println!("{message}");
                        }
                        if let Some(record) = app.workouts().first() {
                            println!("saved {}", describe(record));
                        }
                        break;
                    }
                    _ => render(app),
                }
            }
            _ = &mut ctrl_c => {
                app.pause();
                println!("paused at {}", format_clock(app.timer().remaining_time));
                if save_on_quit {
                    if let Some(record) = app.save_workout(None, None, None) {
                        println!("saved {}", describe(record));
                    }
                }
                break;
            }
        }
    }

    debug!(phase = ?app.phase(), "run loop finished");
    Ok(())
}

fn render(app: &AppState) {
    let timer = app.timer();
    if timer.is_break {
        println!("Break         {}", format_clock(timer.remaining_time));
    } else {
        println!(
            "Round {}/{}     {}",
            timer.current_round,
            app.settings().rounds,
            format_clock(timer.remaining_time)
        );
    }
}
