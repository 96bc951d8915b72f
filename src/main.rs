use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use snowday_oracle::config::{OracleConfig, CONFIG_FILE};
use snowday_oracle::crowd;
use snowday_oracle::report::{AccuracyReport, RecordReview, SeasonStats};
use snowday_oracle::store::{JsonFileStore, KeyValueStore, Leaderboard, RecordBook, VoteLedger, FORECAST_KEY};
use snowday_oracle::weather::{self, Forecast, ForecastFeed, HttpForecastProvider};
use snowday_oracle::{AccuracyRecord, EventDetails, Measurement, Outcome, Probability, Vote};

#[derive(Parser)]
#[command(name = "snowday", about = "Snow-day predictions: crowd votes, accuracy and storm severity")]
struct Cli {
    /// Path to the config file
    #[arg(long, default_value = CONFIG_FILE)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the latest forecast and classify conditions
    Forecast {
        /// Also show this user's vote for tomorrow
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Cast a vote for tomorrow (or --day)
    #[command(group(ArgGroup::new("ballot").required(true).args(["probability", "likely", "unlikely"])))]
    Vote {
        /// Username
        #[arg(short, long)]
        user: String,
        /// Probability estimate, 0-100
        #[arg(short, long)]
        probability: Option<i64>,
        /// Quick vote: likely
        #[arg(long)]
        likely: bool,
        /// Quick vote: unlikely
        #[arg(long)]
        unlikely: bool,
        /// Day the vote is for (YYYY-MM-DD)
        #[arg(short, long)]
        day: Option<NaiveDate>,
    },
    /// Show community consensus, vote distribution and leaderboard
    Crowd,
    /// Show Brier scores, calibration and recent trend
    Accuracy,
    /// Show season stats and every resolved day
    History,
    /// Record the outcome of a day
    Resolve {
        /// Day being resolved (YYYY-MM-DD)
        #[arg(short, long)]
        day: NaiveDate,
        /// Model probability for that day, 0-100
        #[arg(short, long)]
        model: i64,
        /// Community probability; defaults to that day's consensus
        #[arg(short, long)]
        community: Option<i64>,
        /// 1 if the event happened, 0 if not
        #[arg(short, long)]
        outcome: i64,
        /// Event name, e.g. "Winter Storm Warning"
        #[arg(long)]
        name: Option<String>,
        /// Snowfall that day (inches)
        #[arg(long)]
        snowfall: Option<f64>,
        /// Temperature that day (°F)
        #[arg(long)]
        temperature: Option<f64>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Classify storm severity from raw measurements
    Classify {
        /// Snow accumulation (inches)
        #[arg(short, long)]
        accumulation: f64,
        /// Wind speed (mph)
        #[arg(short, long)]
        wind: f64,
        /// Visibility (miles)
        #[arg(short, long)]
        visibility: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "snowday_oracle=info,snowday=info".into()),
        )
        .init();

    // Load .env if present (override system env vars)
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();
    let config = OracleConfig::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    let mut store = JsonFileStore::new(&config.data_dir);

    match cli.command {
        Commands::Forecast { user } => handle_forecast(&config, &mut store, user.as_deref()).await?,
        Commands::Vote { user, probability, likely, unlikely: _, day } => {
            let vote = match probability {
                Some(p) => Vote::probability(p)?,
                None => Vote::thumbs(likely),
            };
            let day = match day {
                Some(d) => d,
                None => tomorrow()?,
            };

            let mut ledger = VoteLedger::load(&store).context("Failed to load votes")?;
            let cast = ledger.submit(&user, day, vote)?.clone();
            ledger.save(&mut store).context("Failed to save votes")?;

            println!("\n✅ Vote recorded for {}", day);
            println!("   {} says {} ({})", user, cast.value(), cast.kind());
            match crowd::consensus(&ledger.votes_on(day)) {
                Some(c) => println!("   Consensus for {}: {}", day, c),
                None => println!("   No consensus yet"),
            }
        }
        Commands::Crowd => {
            let ledger = VoteLedger::load(&store).context("Failed to load votes")?;
            let board = Leaderboard::load(&store).context("Failed to load leaderboard")?;
            let votes = ledger.votes();

            println!("\n👥 Community Consensus");
            match crowd::consensus(votes) {
                Some(c) => println!("   {} from {} votes", c, votes.len()),
                None => println!("   No consensus yet (no votes)"),
            }

            println!("\n{:<10} {:>6} {:>6}", "Range", "Votes", "Share");
            println!("{}", "-".repeat(24));
            for bucket in crowd::distribution(votes) {
                println!("{:<10} {:>6} {:>5}%", bucket.range_label, bucket.count, bucket.percent_of_total);
            }

            println!("\n🏆 Leaderboard (lower Brier is better)");
            println!("{:<4} {:<20} {:>7} {:>6} {:>5} {:>7}", "#", "User", "Brier", "Votes", "Acc", "Streak");
            println!("{}", "-".repeat(54));
            let ranked = crowd::rank(board.stats(), config.report.leaderboard_size);
            if ranked.is_empty() {
                println!("   No forecasters yet");
            }
            for (i, stat) in ranked.iter().enumerate() {
                println!(
                    "{:<4} {:<20} {:>7.3} {:>6} {:>4}% {:>7}",
                    i + 1,
                    truncate(&stat.username, 20),
                    stat.brier_score,
                    stat.total_votes,
                    stat.accuracy_percent,
                    stat.streak,
                );
            }
        }
        Commands::Accuracy => {
            let book = RecordBook::load(&store).context("Failed to load accuracy history")?;
            let report = AccuracyReport::build(book.records(), config.report.trend_window);

            println!("\n🎯 Forecast Accuracy ({} resolved days)", book.records().len());
            for summary in [&report.model, &report.community] {
                println!(
                    "   {:<10} Brier {:.3} | Accuracy {:>3}% | {}",
                    summary.source, summary.brier, summary.accuracy_percent, summary.rating
                );
            }
            println!(
                "\n   {} leads by {:.3} Brier",
                report.head_to_head.leader, report.head_to_head.margin
            );

            println!("\n📊 Calibration (community)");
            println!("{:<10} {:>9} {:>9} {:>7}", "Range", "Predicted", "Observed", "Count");
            println!("{}", "-".repeat(38));
            if report.calibration.is_empty() {
                println!("   No resolved days yet");
            }
            for bucket in &report.calibration {
                println!(
                    "{:<10} {:>8}% {:>8}% {:>7}",
                    bucket.range_label, bucket.predicted_midpoint, bucket.observed_percent, bucket.sample_count
                );
            }

            println!("\n📈 Recent Trend");
            for record in &report.recent {
                println!(
                    "   {}  outcome {}  M: {:.3} | C: {:.3}",
                    record.date(),
                    record.actual_outcome(),
                    record.brier_score(snowday_oracle::Source::Model),
                    record.brier_score(snowday_oracle::Source::Community),
                );
            }
        }
        Commands::History => {
            let book = RecordBook::load(&store).context("Failed to load accuracy history")?;

            match SeasonStats::compute(book.records()) {
                Some(stats) => {
                    println!("\n❄️  Season");
                    println!("   Events: {}  |  Snow days: {}", stats.total_events, stats.event_days);
                    println!(
                        "   Model accuracy: {}%  |  Community accuracy: {}%",
                        stats.model_accuracy, stats.community_accuracy
                    );
                }
                None => {
                    println!("\nNo resolved days yet");
                    return Ok(());
                }
            }

            println!("\n{:<12} {:<4} {:>10} {:>7} {:>10} {:>7}", "Date", "Out", "Model", "Brier", "Community", "Brier");
            println!("{}", "-".repeat(56));
            for record in book.records().iter().rev() {
                let review = RecordReview::of(record);
                println!(
                    "{:<12} {:<4} {:>10} {:>7.3} {:>10} {:>7.3}",
                    review.date,
                    review.outcome,
                    review.model_tier,
                    review.model_brier,
                    review.community_tier,
                    review.community_brier,
                );
                let event = record.event();
                if event.is_empty() {
                    continue;
                }
                let mut details = Vec::new();
                if let Some(name) = &event.name {
                    details.push(name.clone());
                }
                if let Some(snowfall) = event.snowfall {
                    details.push(format!("{:.1}in snow", snowfall));
                }
                if let Some(temperature) = event.temperature {
                    details.push(format!("{:.0}°F", temperature));
                }
                if !details.is_empty() {
                    println!("{:<12} {}", "", details.join(" | "));
                }
                if let Some(notes) = &event.notes {
                    println!("{:<12} {}", "", truncate(notes, 60));
                }
            }
        }
        Commands::Resolve { day, model, community, outcome, name, snowfall, temperature, notes } => {
            let model = Probability::new(model)?;
            let outcome = Outcome::new(outcome)?;
            let community = match community {
                Some(c) => Probability::new(c)?,
                None => {
                    let ledger = VoteLedger::load(&store).context("Failed to load votes")?;
                    crowd::consensus(&ledger.votes_on(day)).with_context(|| {
                        format!("No votes for {} and no --community given", day)
                    })?
                }
            };

            let event = EventDetails { name, snowfall, temperature, notes };
            let record = AccuracyRecord::resolve(day, model, community, outcome).with_event(event)?;
            let mut book = RecordBook::load(&store).context("Failed to load accuracy history")?;
            book.append(record.clone())?;
            book.save(&mut store).context("Failed to save accuracy history")?;

            let review = RecordReview::of(&record);
            println!("\n✅ Resolved {} (outcome {})", day, outcome);
            println!("   Model     {:>4}  {:<10} Brier {:.3}", model, review.model_tier, review.model_brier);
            println!("   Community {:>4}  {:<10} Brier {:.3}", community, review.community_tier, review.community_brier);
        }
        Commands::Classify { accumulation, wind, visibility } => {
            let measurement = Measurement::new(accumulation, wind, visibility)?;
            let category = weather::classify(&measurement);
            println!("\n🌨  {}", category);
        }
    }

    Ok(())
}

async fn handle_forecast(config: &OracleConfig, store: &mut JsonFileStore, user: Option<&str>) -> Result<()> {
    let cached: Option<Forecast> = store.get(FORECAST_KEY, None).unwrap_or_else(|e| {
        warn!("Ignoring cached forecast: {}", e);
        None
    });
    let provider = HttpForecastProvider::new(&config.forecast)
        .context("Set forecast.url in the config file")?;
    let mut feed = ForecastFeed::new(provider, Duration::from_secs(config.forecast.timeout_secs))
        .with_cached(cached);

    match feed.refresh().await {
        Ok(forecast) => {
            store.set(FORECAST_KEY, forecast).context("Failed to cache forecast")?;
            info!("Cached forecast observed at {}", forecast.observed_at);
        }
        Err(e) if e.is_retryable() => {
            println!("\n⚠️  Could not refresh forecast: {}", e);
            println!("   Showing last known data; try again shortly.");
        }
        Err(e) => return Err(e.into()),
    }

    let Some(forecast) = feed.latest() else {
        println!("   No forecast data available yet.");
        return Ok(());
    };

    println!("\n❄️  Tomorrow's Snow Day Probability: {} ({})", forecast.model_probability, forecast.verdict());
    println!("   Conditions: {}", forecast.severity());
    println!(
        "   {:.0}°F | {:.1}in snow | {:.0}mph wind | {:.2}mi visibility",
        forecast.temperature,
        forecast.measurement.accumulation,
        forecast.measurement.wind_speed,
        forecast.measurement.visibility,
    );
    for alert in &forecast.alerts {
        println!("   ⚠️  {}", alert);
    }
    println!("   Updated: {}", forecast.observed_at.format("%Y-%m-%d %H:%M UTC"));

    let day = tomorrow()?;
    let ledger = VoteLedger::load(&*store).context("Failed to load votes")?;
    match crowd::consensus(&ledger.votes_on(day)) {
        Some(c) => println!("\n👥 Community average: {}", c),
        None => println!("\n👥 No community votes yet"),
    }
    if let Some(user) = user {
        match ledger.ballot(user, day) {
            Some(vote) => println!("   Your vote: {} ({})", vote.value(), vote.kind()),
            None => println!("   You have not voted for {} yet", day),
        }
    }
    Ok(())
}

fn tomorrow() -> Result<NaiveDate> {
    Local::now()
        .date_naive()
        .succ_opt()
        .context("Date out of range")
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
