use clap::Subcommand;
use wavi_core::{Config, DaysOfWeek, HabitDraft, HabitId};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// List habits (today's by default)
    List {
        /// Every habit, not only today's
        #[arg(long)]
        all: bool,
    },
    /// Show one habit as JSON
    Show {
        id: HabitId,
    },
    /// Create a habit
    Create {
        #[arg(long)]
        name: String,
        /// Comma-separated weekdays, 1 = Monday .. 7 = Sunday
        #[arg(long)]
        days: String,
        #[arg(long, default_value = "✅")]
        icon: String,
        /// HH:MM or HH:MM:SS
        #[arg(long)]
        start: String,
        /// HH:MM or HH:MM:SS
        #[arg(long)]
        end: String,
    },
    /// Change a habit; omitted fields keep their value
    Update {
        id: HabitId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        days: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Delete a habit
    Delete {
        id: HabitId,
    },
}

pub fn run(action: HabitAction, config: &Config) -> CliResult {
    let rt = common::runtime()?;
    match action {
        HabitAction::List { all } => {
            let gateway = common::gateway(config)?;
            let habits = if all {
                rt.block_on(gateway.fetch_all_habits())?
            } else {
                rt.block_on(gateway.fetch_today_habits())?
            };
            common::print_json(&habits)?;
        }
        HabitAction::Show { id } => {
            let habit = rt.block_on(common::gateway(config)?.fetch_habit(id))?;
            common::print_json(&habit)?;
        }
        HabitAction::Create {
            name,
            days,
            icon,
            start,
            end,
        } => {
            let draft = HabitDraft {
                name,
                days_of_week: parse_days(&days)?,
                icon,
                start_time: wire_time(&start),
                end_time: wire_time(&end),
            };
            let mut today = common::controller(config)?;
            match rt.block_on(today.create_habit(&draft))? {
                Some(habit) => println!("habit created: {}", habit.id),
                None => println!("habit created"),
            }
        }
        HabitAction::Update {
            id,
            name,
            days,
            icon,
            start,
            end,
        } => {
            let mut today = common::controller(config)?;
            let current = rt.block_on(today.gateway().fetch_habit(id))?;
            let mut draft = current.to_draft();
            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(days) = days {
                draft.days_of_week = parse_days(&days)?;
            }
            if let Some(icon) = icon {
                draft.icon = icon;
            }
            if let Some(start) = start {
                draft.start_time = wire_time(&start);
            }
            if let Some(end) = end {
                draft.end_time = wire_time(&end);
            }
            rt.block_on(today.update_habit(id, &draft))?;
            println!("habit {id} updated");
        }
        HabitAction::Delete { id } => {
            let mut today = common::controller(config)?;
            rt.block_on(today.delete_habit(id))?;
            println!("habit {id} deleted");
        }
    }
    Ok(())
}

fn parse_days(value: &str) -> Result<DaysOfWeek, Box<dyn std::error::Error>> {
    let days = value
        .split(',')
        .map(|d| d.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid --days '{value}': {e}"))?;
    Ok(DaysOfWeek::new(days)?)
}

/// Accept `HH:MM` on the command line; the backend wants `HH:MM:SS`.
fn wire_time(value: &str) -> String {
    let value = value.trim();
    if value.len() == 5 {
        format!("{value}:00")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_parse_from_comma_list() {
        let days = parse_days("1, 3,5").unwrap();
        assert_eq!(Vec::<u8>::from(days), vec![1, 3, 5]);
        assert!(parse_days("0").is_err());
        assert!(parse_days("mon").is_err());
    }

    #[test]
    fn short_times_gain_seconds() {
        assert_eq!(wire_time("07:30"), "07:30:00");
        assert_eq!(wire_time("07:30:15"), "07:30:15");
    }
}
