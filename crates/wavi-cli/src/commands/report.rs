use chrono::{Local, NaiveDate};
use clap::Subcommand;
use wavi_core::api::{LogQuery, ReportQuery};
use wavi_core::report::{format_percent, format_points};
use wavi_core::{Config, DailySummary, ReportKind};

use crate::common::{self, CliResult};

#[derive(Subcommand)]
pub enum ReportAction {
    /// What was scheduled on a day and how it went
    Daily {
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Reports for the week containing the date
    Weekly {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Reports for the month containing the date
    Monthly {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
    /// Reports for the year containing the date
    Yearly {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: ReportAction, config: &Config) -> CliResult {
    let today = Local::now().date_naive();
    match action {
        ReportAction::Daily { date } => daily(config, date.unwrap_or(today)),
        ReportAction::Weekly { date, json } => server(config, ReportKind::Weekly, date.unwrap_or(today), json),
        ReportAction::Monthly { date, json } => server(config, ReportKind::Monthly, date.unwrap_or(today), json),
        ReportAction::Yearly { date, json } => server(config, ReportKind::Yearly, date.unwrap_or(today), json),
    }
}

fn daily(config: &Config, date: NaiveDate) -> CliResult {
    let gateway = common::gateway(config)?;
    let rt = common::runtime()?;
    let habits = rt.block_on(gateway.fetch_all_habits())?;
    let logs = rt.block_on(gateway.fetch_logs(LogQuery::on(date)))?;
    let summary = DailySummary::build(date, &habits, &logs);

    println!(
        "{date}: {}/{} done, success rate {}",
        summary.completed_count(),
        summary.entries.len(),
        format_percent(summary.success_rate)
    );
    for entry in &summary.entries {
        let mark = if entry.completed { "x" } else { " " };
        println!("  [{mark}] {} {}", entry.icon, entry.name);
    }
    Ok(())
}

fn server(config: &Config, kind: ReportKind, date: NaiveDate, json: bool) -> CliResult {
    let (start, end) = kind.range(date);
    let query = ReportQuery {
        kind: Some(kind),
        start_date: Some(start),
        end_date: Some(end),
    };
    let reports = common::runtime()?.block_on(common::gateway(config)?.fetch_reports(query))?;
    if json {
        return common::print_json(&reports);
    }
    if reports.is_empty() {
        println!("no {} report for {start} .. {end}", kind.as_str().to_lowercase());
        return Ok(());
    }
    for report in &reports {
        println!("{} report {} .. {}", report.kind, report.start_date, report.end_date);
        if let Some(rate) = report.overall_success_rate {
            println!("  overall: {}", format_points(rate));
        }
        if let Some(summary) = &report.summary {
            println!("  {summary}");
        }
        for rate in report.habit_success_rates.iter().flatten() {
            println!("  {:<24} {}", rate.name, format_points(rate.rate));
        }
        for reason in report.top_failure_reasons.iter().flatten() {
            println!("  #{} {}", reason.priority, reason.reason);
        }
        for rec in report.recommendations.iter().flatten() {
            println!("  try: {} ({} - {})", rec.name, rec.start_time, rec.end_time);
        }
        if let Some(ci) = &report.consistency_index {
            println!("  consistency {}: {}", format_points(ci.success_rate), ci.display_message);
        }
    }
    Ok(())
}
