#[macro_use]
extern crate log;

use std::{io, path::PathBuf, sync::Arc};

use calpredict::{
    DatabaseHandler, FetchError, HealthDataFetcher, HealthExport, MetricPublisher, ModelSource,
    PredictionInvoker,
    algo::{FeatureForm, FeatureValidator, FieldBounds},
    types::{DataType, MetricState},
};
use clap::{Args, CommandFactory, Parser, Subcommand};
use dotenv::dotenv;

#[derive(Parser)]
#[command(name = "calpredict")]
pub struct CalPredictCli {
    #[arg(env, long)]
    pub database_url: String,
    ///
    /// Regression model document, the bundled model is used when absent
    ///
    #[arg(env = "MODEL_PATH", long = "model")]
    pub model: Option<PathBuf>,
    #[clap(subcommand)]
    pub subcommand: CalPredictCommand,
}

#[derive(Subcommand)]
pub enum CalPredictCommand {
    ///
    /// Import samples and workouts from a JSON export
    ///
    Import { file: PathBuf },
    ///
    /// Grant read access to data types (all when none are given)
    ///
    Grant { types: Vec<DataType> },
    ///
    /// Revoke read access to data types (all when none are given)
    ///
    Revoke { types: Vec<DataType> },
    ///
    /// Fetch the latest value of every metric
    ///
    Fetch,
    ///
    /// Predict calories burned
    ///
    Predict(PredictArgs),
    ///
    /// Print shell completions
    ///
    Completions { shell: clap_complete::Shell },
}

#[derive(Args)]
pub struct PredictArgs {
    #[arg(long, default_value = "male")]
    pub gender: String,
    #[arg(long, default_value_t = 25)]
    pub age: u32,
    /// Height in cm
    #[arg(long)]
    pub height: Option<String>,
    /// Weight in kg
    #[arg(long)]
    pub weight: Option<String>,
    /// Workout duration in minutes
    #[arg(long)]
    pub duration: Option<String>,
    /// Average heart rate in bpm
    #[arg(long)]
    pub heart_rate: Option<String>,
    /// Body temperature in °C
    #[arg(long)]
    pub body_temp: Option<String>,
    /// Pre-fill fields from the store before applying the values above
    #[arg(long)]
    pub fetch: bool,
    /// Reject values outside plausible ranges
    #[arg(long)]
    pub strict: bool,
}

impl PredictArgs {
    fn apply(self, form: &mut FeatureForm) {
        form.gender = self.gender;
        form.age = self.age;

        let overrides = [
            (&mut form.height, self.height),
            (&mut form.weight, self.weight),
            (&mut form.duration, self.duration),
            (&mut form.heart_rate, self.heart_rate),
            (&mut form.body_temp, self.body_temp),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(error) = dotenv() {
        println!("{}", error);
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("sqlx::query", log::LevelFilter::Off)
        .filter_module("sea_orm_migration::migrator", log::LevelFilter::Off)
        .init();

    let cli = CalPredictCli::parse();
    if let CalPredictCommand::Completions { shell } = cli.subcommand {
        let mut command = CalPredictCli::command();
        let name = command.get_name().to_owned();
        clap_complete::generate(shell, &mut command, name, &mut io::stdout());
        return Ok(());
    }

    let db_handler = DatabaseHandler::new(cli.database_url).await?;

    match cli.subcommand {
        CalPredictCommand::Import { file } => {
            let export = HealthExport::from_path(&file)?;
            let report = db_handler.import(export).await?;
            println!("{}", report);
            Ok(())
        }
        CalPredictCommand::Grant { types } => {
            let types = or_all(types);
            db_handler.set_authorization(&types, true).await?;
            println!("Granted: {:?}", db_handler.granted_types().await?);
            Ok(())
        }
        CalPredictCommand::Revoke { types } => {
            let types = or_all(types);
            db_handler.set_authorization(&types, false).await?;
            println!("Revoked: {:?}", types);
            println!("Still granted: {:?}", db_handler.granted_types().await?);
            Ok(())
        }
        CalPredictCommand::Fetch => {
            let state = fetch_metrics(db_handler).await;
            println!("{}", state);
            Ok(())
        }
        CalPredictCommand::Predict(args) => {
            let mut form = FeatureForm::default();
            if args.fetch {
                let state = fetch_metrics(db_handler).await;
                form.prefill(&state);
            }

            let validator = if args.strict {
                FeatureValidator::with_bounds(FieldBounds::form_defaults())
            } else {
                FeatureValidator::new()
            };
            args.apply(&mut form);

            let invoker = PredictionInvoker::new(ModelSource::from(cli.model));
            let result = validator.validate(&form).and_then(|input| {
                debug!("features: {:?}", input);
                invoker.predict(&input)
            });

            match result {
                Ok(prediction) => println!("Prediction: {} kcal", prediction),
                Err(error) => {
                    debug!("{}", error);
                    println!("{}", error.user_message());
                }
            }
            Ok(())
        }
        CalPredictCommand::Completions { .. } => Ok(()),
    }
}

fn or_all(types: Vec<DataType>) -> Vec<DataType> {
    if types.is_empty() {
        DataType::READ_TYPES.to_vec()
    } else {
        types
    }
}

async fn fetch_metrics(db_handler: DatabaseHandler) -> MetricState {
    let (publisher, sink) = MetricPublisher::new();
    let fetcher = HealthDataFetcher::new(Arc::new(db_handler), sink);

    match fetcher.request_authorization().await {
        Ok(tasks) => tasks.join().await,
        Err(FetchError::AuthorizationDenied(denied)) => {
            warn!("read access missing for {:?}, run `calpredict grant`", denied);
        }
        Err(error) => error!("{}", error),
    }

    drop(fetcher);
    publisher.run().await
}
