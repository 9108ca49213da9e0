use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use stride_core::history::{self, date_key};
use stride_core::predictability::PredictabilityOutcome;
use stride_core::*;

#[derive(Parser)]
#[command(name = "stride")]
#[command(about = "Athlete wellness tracking and derived metrics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Athlete whose records to use (defaults to profile.default_athlete)
    #[arg(long, global = true)]
    athlete: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's check-in and print insights
    Checkin {
        /// Hours slept last night (0-24)
        #[arg(long, required_unless_present = "payload")]
        sleep: Option<f64>,

        /// Mood from 1 (low) to 5 (great)
        #[arg(long, required_unless_present = "payload")]
        mood: Option<i64>,

        /// Water bottles drunk (0-20)
        #[arg(long, required_unless_present = "payload")]
        water: Option<i64>,

        /// Training session completed
        #[arg(long)]
        trained: bool,

        /// Homework done
        #[arg(long)]
        homework: bool,

        /// Protein intake (low, medium, high)
        #[arg(long)]
        protein: Option<String>,

        /// Day to record under (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Raw JSON check-in payload instead of flags
        #[arg(long, conflicts_with_all = ["sleep", "mood", "water", "trained", "homework", "protein"])]
        payload: Option<String>,
    },

    /// Import daily activity totals from a phone app or wearable
    ImportActivity {
        #[arg(long, required_unless_present = "payload")]
        steps: Option<u64>,

        #[arg(long, required_unless_present = "payload")]
        active_minutes: Option<u64>,

        #[arg(long, required_unless_present = "payload")]
        calories: Option<u64>,

        /// Distance covered
        #[arg(long)]
        distance: Option<f64>,

        #[arg(long)]
        heart_rate_avg: Option<u64>,

        /// Where the numbers came from (defaults to phone_app)
        #[arg(long)]
        source: Option<String>,

        /// Day to record under (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Raw JSON activity payload instead of flags
        #[arg(long, conflicts_with_all = ["steps", "active_minutes", "calories", "distance", "heart_rate_avg", "source"])]
        payload: Option<String>,
    },

    /// Record or review height and weight
    Growth {
        #[command(subcommand)]
        action: GrowthAction,
    },

    /// Manage the competition calendar
    Competition {
        #[command(subcommand)]
        action: CompetitionAction,
    },

    /// Show the check-in stored for a single day
    Day {
        /// Date as YYYY-MM-DD
        date: NaiveDate,
    },

    /// Injury risk over the last week
    Risk,

    /// Recovery score and recommendations
    Recovery,

    /// Predictability index, sub-scores and alerts
    Analytics,

    /// Compare the last two weeks
    Trends,

    /// Sleep analysis over the last month
    Sleep,

    /// Activity totals over the last week
    Activity,

    /// Nutrition recommendations for today
    Nutrition {
        /// Hour of day to plan for, 0-23 (defaults to now)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..24))]
        hour: Option<u32>,
    },

    /// Suggested sessions for the rest of the day
    Schedule {
        /// Plan as of this time, e.g. 2024-03-06T08:00:00 (defaults to now)
        #[arg(long)]
        at: Option<NaiveDateTime>,
    },

    /// Write the check-in history to a CSV file
    Export {
        #[arg(long)]
        output: PathBuf,
    },

    /// Set and track personal goals
    Goal {
        #[command(subcommand)]
        action: GoalAction,
    },

    /// Store today's summary from a wearable device
    WearableSync {
        #[arg(long)]
        heart_rate_avg: Option<u64>,

        #[arg(long)]
        steps: Option<u64>,

        #[arg(long)]
        sleep_quality: Option<f64>,

        #[arg(long)]
        recovery_score: Option<f64>,

        /// Day to record under (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Raw JSON device payload instead of flags
        #[arg(long, conflicts_with_all = ["heart_rate_avg", "steps", "sleep_quality", "recovery_score"])]
        payload: Option<String>,
    },

    /// List stored wearable summaries
    Wearables,
}

#[derive(Subcommand)]
enum GoalAction {
    /// Create a new active goal
    Add {
        #[arg(long, required_unless_present = "payload")]
        title: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// What counts as done, e.g. "13.9s"
        #[arg(long)]
        target: Option<String>,

        /// Target date as YYYY-MM-DD
        #[arg(long)]
        by: Option<NaiveDate>,

        /// Raw JSON goal payload instead of flags
        #[arg(long, conflicts_with_all = ["title", "category", "target", "by"])]
        payload: Option<String>,
    },

    /// List goals, oldest first
    List,

    /// Mark a goal as completed
    Complete {
        id: uuid::Uuid,
    },
}

#[derive(Subcommand)]
enum GrowthAction {
    /// Record a measurement
    Add {
        #[arg(long)]
        height: f64,

        #[arg(long)]
        weight: f64,

        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Show growth trends and the measurement history
    Show,
}

#[derive(Subcommand)]
enum CompetitionAction {
    /// Add a competition to the calendar
    Add {
        #[arg(long)]
        name: String,

        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: NaiveDate,

        #[arg(long)]
        location: Option<String>,
    },

    /// List the next competitions
    Upcoming {
        /// Count days from this date instead of today
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

/// Everything a command needs besides its own arguments
struct Session {
    store: JsonFileStore,
    athlete: String,
    pretty: bool,
    indicators: bool,
}

impl Session {
    fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        println!("{}", out);
        Ok(())
    }

    fn checkins(&self) -> Result<Vec<CheckIn>> {
        history::load_checkins(&self.store, &self.athlete)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    stride_core::logging::init_with_level("warn");

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let athlete = cli
        .athlete
        .map(|a| a.trim().to_string())
        .unwrap_or_else(|| config.profile.default_athlete.clone());
    tracing::debug!("Using data dir {:?} for athlete {}", data_dir, athlete);

    let mut session = Session {
        store: JsonFileStore::new(&data_dir),
        athlete,
        pretty: cli.pretty || config.display.pretty,
        indicators: config.display.indicators,
    };

    match cli.command {
        Commands::Checkin {
            sleep,
            mood,
            water,
            trained,
            homework,
            protein,
            date,
            payload,
        } => {
            let payload = match payload {
                Some(raw) => serde_json::from_str(&raw)?,
                None => {
                    let mut fields = Map::new();
                    insert_some(&mut fields, "sleep_hours", sleep);
                    insert_some(&mut fields, "mood", mood);
                    insert_some(&mut fields, "water_bottles", water);
                    fields.insert("training_completed".into(), json!(trained));
                    fields.insert("homework_done".into(), json!(homework));
                    insert_some(&mut fields, "protein_level", protein);
                    Value::Object(fields)
                }
            };
            cmd_checkin(&mut session, &payload, date)
        }
        Commands::ImportActivity {
            steps,
            active_minutes,
            calories,
            distance,
            heart_rate_avg,
            source,
            date,
            payload,
        } => {
            let payload = match payload {
                Some(raw) => serde_json::from_str(&raw)?,
                None => {
                    let mut fields = Map::new();
                    insert_some(&mut fields, "steps", steps);
                    insert_some(&mut fields, "active_minutes", active_minutes);
                    insert_some(&mut fields, "calories", calories);
                    insert_some(&mut fields, "distance", distance);
                    insert_some(&mut fields, "heart_rate_avg", heart_rate_avg);
                    insert_some(&mut fields, "source", source);
                    Value::Object(fields)
                }
            };
            cmd_import_activity(&mut session, &payload, date)
        }
        Commands::Growth { action } => match action {
            GrowthAction::Add {
                height,
                weight,
                date,
            } => cmd_growth_add(&mut session, height, weight, date),
            GrowthAction::Show => cmd_growth_show(&session),
        },
        Commands::Competition { action } => match action {
            CompetitionAction::Add {
                name,
                date,
                location,
            } => cmd_competition_add(&mut session, name, date, location),
            CompetitionAction::Upcoming { today } => {
                let events = history::load_competitions(&session.store, &session.athlete)?;
                session.print(&upcoming_events(&events, today.unwrap_or_else(today_local)))
            }
        },
        Commands::Day { date } => {
            match history::checkin_on(&session.store, &session.athlete, date)? {
                Some(checkin) => session.print(&checkin),
                None => session.print(&json!({})),
            }
        }
        Commands::Risk => session.print(&assess_injury_risk(&session.checkins()?)),
        Commands::Recovery => session.print(&optimize_recovery(&session.checkins()?)),
        Commands::Analytics => cmd_analytics(&session),
        Commands::Trends => session.print(&performance_trends(&session.checkins()?)),
        Commands::Sleep => session.print(&analyze_sleep(&session.checkins()?)),
        Commands::Activity => {
            let imports = history::load_activity(&session.store, &session.athlete)?;
            session.print(&activity_stats(&imports))
        }
        Commands::Nutrition { hour } => {
            let now = Local::now().naive_local();
            let today = history::checkin_on(&session.store, &session.athlete, now.date())?;
            let advice = nutrition_recommendations(today.as_ref(), hour.unwrap_or(now.hour()));
            session.print(&advice)
        }
        Commands::Schedule { at } => {
            let now = at.unwrap_or_else(|| Local::now().naive_local());
            session.print(&smart_schedule(&session.checkins()?, now))
        }
        Commands::Export { output } => cmd_export(&session, &output),
        Commands::Goal { action } => match action {
            GoalAction::Add {
                title,
                category,
                target,
                by,
                payload,
            } => {
                let payload = match payload {
                    Some(raw) => serde_json::from_str(&raw)?,
                    None => {
                        let mut fields = Map::new();
                        insert_some(&mut fields, "title", title);
                        insert_some(&mut fields, "category", category);
                        insert_some(&mut fields, "target", target);
                        insert_some(&mut fields, "target_date", by.map(date_key));
                        Value::Object(fields)
                    }
                };
                cmd_goal_add(&mut session, &payload)
            }
            GoalAction::List => {
                let goals = history::load_goals(&session.store, &session.athlete)?;
                session.print(&json!({ "goals": goals }))
            }
            GoalAction::Complete { id } => cmd_goal_complete(&mut session, id),
        },
        Commands::WearableSync {
            heart_rate_avg,
            steps,
            sleep_quality,
            recovery_score,
            date,
            payload,
        } => {
            let payload = match payload {
                Some(raw) => serde_json::from_str(&raw)?,
                None => {
                    let mut fields = Map::new();
                    insert_some(&mut fields, "heart_rate_avg", heart_rate_avg);
                    insert_some(&mut fields, "steps", steps);
                    insert_some(&mut fields, "sleep_quality", sleep_quality);
                    insert_some(&mut fields, "recovery_score", recovery_score);
                    Value::Object(fields)
                }
            };
            cmd_wearable_sync(&mut session, &payload, date)
        }
        Commands::Wearables => cmd_wearables(&session),
    }
}

fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

fn insert_some<T: Serialize>(fields: &mut Map<String, Value>, key: &str, value: Option<T>) {
    if let Some(value) = value {
        if let Ok(value) = serde_json::to_value(value) {
            fields.insert(key.to_string(), value);
        }
    }
}

fn cmd_checkin(session: &mut Session, payload: &Value, date: Option<NaiveDate>) -> Result<()> {
    let checkin = intake::parse_checkin(payload, Local::now().naive_local())?;
    let date = date.unwrap_or_else(today_local);

    history::record_checkin(&mut session.store, &session.athlete, date, &checkin)?;

    session.print(&json!({
        "status": "success",
        "insights": daily_insights(&checkin),
    }))
}

fn cmd_import_activity(session: &mut Session, payload: &Value, date: Option<NaiveDate>) -> Result<()> {
    let activity = intake::parse_activity(payload, Local::now().naive_local())?;
    let date = date.unwrap_or_else(today_local);

    history::record_activity(&mut session.store, &session.athlete, date, &activity)?;

    session.print(&json!({
        "status": "imported",
        "date": date_key(date),
    }))
}

fn cmd_growth_add(session: &mut Session, height: f64, weight: f64, date: Option<NaiveDate>) -> Result<()> {
    if !(height > 0.0 && weight > 0.0) {
        return Err(Error::Validation("Invalid growth measurement".into()));
    }
    let date = date.unwrap_or_else(today_local);
    let entry = GrowthEntry {
        height: Some(height),
        weight: Some(weight),
    };

    history::record_growth(&mut session.store, &session.athlete, date, &entry)?;

    session.print(&json!({
        "status": "recorded",
        "date": date_key(date),
    }))
}

fn cmd_growth_show(session: &Session) -> Result<()> {
    let dated = history::load_dated_growth(&session.store, &session.athlete)?;
    let entries: Vec<GrowthEntry> = dated.iter().map(|d| d.record.clone()).collect();

    let history: Vec<Value> = dated
        .iter()
        .map(|d| {
            json!({
                "date": date_key(d.date),
                "height": d.record.height,
                "weight": d.record.weight,
            })
        })
        .collect();

    session.print(&json!({
        "trends": growth_trends(&entries),
        "history": history,
    }))
}

fn cmd_competition_add(
    session: &mut Session,
    name: String,
    date: NaiveDate,
    location: Option<String>,
) -> Result<()> {
    let name = intake::sanitize_text(&name);
    if name.is_empty() {
        return Err(Error::Validation("Competition name must not be empty".into()));
    }
    let event = CompetitionEvent {
        id: uuid::Uuid::new_v4(),
        name,
        date,
        location: location
            .map(|l| intake::sanitize_text(&l))
            .filter(|l| !l.is_empty()),
    };

    history::record_competition(&mut session.store, &session.athlete, &event)?;

    session.print(&json!({
        "status": "created",
        "event": event,
    }))
}

/// Predictability report, with colour glyphs when `display.indicators` is on
fn cmd_analytics(session: &Session) -> Result<()> {
    let outcome = predictability_report(&session.checkins()?);
    let mut value = serde_json::to_value(&outcome)?;

    if session.indicators {
        let status = match &outcome {
            PredictabilityOutcome::NoData { status, .. } => *status,
            PredictabilityOutcome::Report(report) => {
                let alerts: Vec<String> = report
                    .alert_kinds
                    .iter()
                    .map(|kind| format!("{} {}", kind.indicator(), kind.message()))
                    .collect();
                value["alerts"] = json!(alerts);
                report.status
            }
        };
        value["status_indicator"] = json!(status.indicator());
    }

    session.print(&value)
}

fn cmd_export(session: &Session, output: &Path) -> Result<()> {
    let dated = history::load_dated_checkins(&session.store, &session.athlete)?;
    let rows = export::export_checkins(&dated, output)?;

    session.print(&json!({
        "status": "exported",
        "rows": rows,
        "path": output.display().to_string(),
    }))
}

fn cmd_goal_add(session: &mut Session, payload: &Value) -> Result<()> {
    let goal = intake::parse_goal(payload, uuid::Uuid::new_v4(), today_local())?;

    history::record_goal(&mut session.store, &session.athlete, &goal)?;

    session.print(&json!({
        "status": "success",
        "goal_id": goal.id,
    }))
}

fn cmd_goal_complete(session: &mut Session, id: uuid::Uuid) -> Result<()> {
    let mut goal = history::load_goals(&session.store, &session.athlete)?
        .into_iter()
        .find(|g| g.id == id)
        .ok_or_else(|| Error::Validation(format!("Unknown goal {}", id)))?;
    goal.status = GoalStatus::Completed;

    history::record_goal(&mut session.store, &session.athlete, &goal)?;

    session.print(&json!({
        "status": "completed",
        "goal_id": goal.id,
    }))
}

fn cmd_wearable_sync(session: &mut Session, payload: &Value, date: Option<NaiveDate>) -> Result<()> {
    let (snapshot, data_points) = intake::parse_wearable(payload)?;
    let date = date.unwrap_or_else(today_local);

    history::record_wearable(&mut session.store, &session.athlete, date, &snapshot)?;

    session.print(&json!({
        "status": "synced",
        "data_points": data_points,
    }))
}

fn cmd_wearables(session: &Session) -> Result<()> {
    let wearables: Vec<Value> = history::load_dated_wearables(&session.store, &session.athlete)?
        .into_iter()
        .map(|d| {
            let mut entry = json!({ "date": date_key(d.date) });
            if let (Value::Object(fields), Ok(Value::Object(record))) =
                (&mut entry, serde_json::to_value(&d.record))
            {
                fields.extend(record);
            }
            entry
        })
        .collect();

    session.print(&json!({ "wearables": wearables }))
}
