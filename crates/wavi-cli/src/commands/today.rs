use chrono::Local;
use serde_json::json;
use tokio::sync::mpsc;
use wavi_core::status::lock;
use wavi_core::{Config, DeactivationCause, Event, RemoteGateway, SystemClock, TodayController};

use crate::common::{self, CliResult};

type Today = TodayController<RemoteGateway, SystemClock>;

pub fn run(json: bool, config: &Config) -> CliResult {
    let mut today = common::controller(config)?;
    common::runtime()?.block_on(today.load())?;
    if json {
        let rows: Vec<_> = today
            .cards()
            .into_iter()
            .map(|c| json!({ "habit": c.habit, "display": c.display }))
            .collect();
        common::print_json(&rows)
    } else {
        print_cards(&today);
        Ok(())
    }
}

/// Load once, then keep sweeping until Ctrl-C. A new calendar date triggers
/// a reload so yesterday's statuses are dropped.
pub fn watch(config: &Config) -> CliResult {
    let rt = common::runtime()?;
    rt.block_on(async {
        let mut today = common::controller(config)?;
        for event in today.load().await? {
            print_event(&event);
        }
        print_cards(&today);

        let period = config.sweep_interval();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut sweeper = today.spawn_sweeper(period, Some(tx));
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                Some(event) = rx.recv() => print_event(&event),
                _ = ticker.tick() => {
                    let last = lock(today.store()).last_refresh_date();
                    if last != Some(Local::now().date_naive()) {
                        match today.load().await {
                            Ok(events) => events.iter().for_each(print_event),
                            Err(e) => tracing::warn!(error = %e, "reload failed"),
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }
        sweeper.stop();
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

fn print_cards(today: &Today) {
    if let Some(nickname) = today.nickname() {
        println!("Hi {nickname}, here is today:");
    }
    let cards = today.cards();
    if cards.is_empty() {
        println!("no habits scheduled today");
        return;
    }
    for card in cards {
        let h = &card.habit;
        println!(
            "{:>4}  {} {:<24} {}  {:<9} {}",
            h.id,
            h.icon,
            h.name,
            h.time_range(),
            h.status.as_str(),
            card.display
        );
    }
}

fn print_event(event: &Event) {
    match event {
        Event::HabitsRefreshed {
            total,
            scheduled_today,
            ..
        } => println!("refreshed: {scheduled_today} of {total} habits scheduled today"),
        Event::DayRolledOver { current, cleared, .. } => {
            println!("new day {current}: {cleared} statuses reset")
        }
        Event::HabitCompleted { habit_id, .. } => println!("habit {habit_id} completed"),
        Event::HabitDeactivated {
            habit_id, cause, ..
        } => match cause {
            DeactivationCause::UserFailure => println!("habit {habit_id} marked failed"),
            DeactivationCause::Expired => println!("habit {habit_id} expired"),
        },
        Event::HabitRemoved { habit_id, .. } => println!("habit {habit_id} removed"),
    }
}
