use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use wellness_core::*;

#[derive(Parser)]
#[command(name = "wellness")]
#[command(about = "Wellness calculators and recommendation lookup", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory (local JSONL stores)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print the full gateway envelope instead of just the body
    #[arg(long, global = true)]
    raw: bool,

    /// Log at info level (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Body mass index from height (cm) and weight (kg)
    Bmi {
        #[arg(long)]
        height: String,
        #[arg(long)]
        weight: String,
    },

    /// Lung-health score from breath-hold time and pulse
    Lung {
        #[arg(long)]
        age: String,
        #[arg(long)]
        gender: String,
        #[arg(long)]
        pulse: String,
        /// Breath-hold time in seconds
        #[arg(long)]
        breath_hold: String,
    },

    /// Diet report: daily servings per food group (absent groups count as 0)
    Diet {
        #[arg(long)]
        vegetables: Option<f64>,
        #[arg(long)]
        protein: Option<f64>,
        #[arg(long)]
        grains: Option<f64>,
        #[arg(long)]
        nuts_seeds: Option<f64>,
        #[arg(long)]
        dairy: Option<f64>,
        #[arg(long)]
        fruits: Option<f64>,
    },

    /// Recovery report from sleep hours and recovery/relaxation minutes
    Recovery {
        #[arg(long)]
        sleep: f64,
        #[arg(long)]
        workout_recovery: f64,
        #[arg(long)]
        relaxation: f64,
    },

    /// Show the posture report for an id
    Posture { posture_id: String },

    /// List training questions for a relationship type
    Questions {
        relationship_type: String,
        #[arg(long)]
        category: Option<String>,
    },

    /// Import the training-question CSV export into the local store
    ImportQuestions { csv: PathBuf },

    /// Add a diet recommendation to the local store
    AddRecommendation {
        /// Recommendation key, e.g. veg-below
        key: String,
        text: String,
    },
}

/// Local store locations under the data directory
struct Stores {
    dir: PathBuf,
}

impl Stores {
    fn new(data_dir: &Path) -> Self {
        Self {
            dir: data_dir.join("stores"),
        }
    }

    fn open(&self, table: &str, partition_key: &str) -> JsonlStore {
        JsonlStore::new(self.dir.join(format!("{}.jsonl", table)), partition_key)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        wellness_core::logging::init();
    } else {
        wellness_core::logging::init_with_level("warn");
    }

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let stores = Stores::new(&data_dir);
    let tables = &config.tables;
    tracing::debug!("Using data directory {:?}", data_dir);

    let envelope = match cli.command {
        Commands::Bmi { height, weight } => {
            let body = json!({ "height": height, "weight": weight }).to_string();
            handlers::bmi(Some(body.as_str()))
        }
        Commands::Lung {
            age,
            gender,
            pulse,
            breath_hold,
        } => {
            let body = json!({
                "age": age,
                "gender": gender,
                "pulse": pulse,
                "breathHoldTime": breath_hold,
            })
            .to_string();
            handlers::lung_health(Some(body.as_str()))
        }
        Commands::Diet {
            vegetables,
            protein,
            grains,
            nuts_seeds,
            dairy,
            fruits,
        } => {
            let mut body = Map::new();
            let given = [
                (FoodGroup::Vegetables, vegetables),
                (FoodGroup::Protein, protein),
                (FoodGroup::Grains, grains),
                (FoodGroup::NutsSeeds, nuts_seeds),
                (FoodGroup::Dairy, dairy),
                (FoodGroup::Fruits, fruits),
            ];
            for (group, servings) in given {
                if let Some(servings) = servings {
                    body.insert(group.field_name().to_string(), json!(servings));
                }
            }
            let body = Value::Object(body).to_string();
            let store = stores.open(&tables.diet_report, "reportId");
            handlers::diet_report(&store, config.lookup.timeout(), Some(body.as_str())).await
        }
        Commands::Recovery {
            sleep,
            workout_recovery,
            relaxation,
        } => {
            let body = json!({
                "sleep": sleep,
                "workoutRecovery": workout_recovery,
                "relaxation": relaxation,
            })
            .to_string();
            handlers::recovery_report(Some(body.as_str()))
        }
        Commands::Posture { posture_id } => {
            let store = stores.open(&tables.posture_report, "posture_id");
            handlers::posture_report(&store, Some(posture_id.as_str())).await
        }
        Commands::Questions {
            relationship_type,
            category,
        } => {
            let store = stores.open(&tables.questions, questions::PARTITION_ATTRIBUTE);
            handlers::training_questions(
                &store,
                Some(relationship_type.as_str()),
                category.as_deref(),
            )
            .await
        }
        Commands::ImportQuestions { csv } => {
            let store = stores.open(&tables.questions, questions::PARTITION_ATTRIBUTE);
            tracing::info!("Importing questions from {:?}", csv);
            let count = questions::import_questions(&csv, &store).await?;
            println!("✓ Imported {} questions", count);
            println!("  Store: {}", store.path().display());
            return Ok(ExitCode::SUCCESS);
        }
        Commands::AddRecommendation { key, text } => {
            let store = stores.open(&tables.diet_report, "reportId");
            store
                .put(
                    Record::new()
                        .with("reportId", key.as_str())
                        .with(resolver::RECOMMENDATION_ATTRIBUTE, text),
                )
                .await?;
            println!("✓ Added recommendation {}", key);
            return Ok(ExitCode::SUCCESS);
        }
    };

    display_envelope(&envelope, cli.raw)?;

    if envelope.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::info!("Request failed with status {}", envelope.status_code);
        eprintln!("Request failed with status {}", envelope.status_code);
        Ok(ExitCode::FAILURE)
    }
}

fn display_envelope(envelope: &Envelope, raw: bool) -> Result<()> {
    let output = if raw {
        serde_json::to_string_pretty(envelope)?
    } else {
        serde_json::to_string_pretty(&envelope.body)?
    };
    println!("{}", output);
    Ok(())
}
