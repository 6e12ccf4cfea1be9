//! The interpretation of the commands that the CLI can handle.

mod configuration_file;
mod exit_codes;
pub mod logging;
mod output;


use std::io::Write;
use std::process::exit;

use clap::{Args, Parser, Subcommand, ValueHint};
use mongodb::bson::{Bson, Document};
use mongodb_support::{SortKey, SortSpecification};
use sort_examples_common::{
    demonstrations::run_examples,
    interface_types::ConnectionConfig,
    mongodb::DatabaseTrait,
    query::{compare_paths, run_sorted, PathComparison, SortPath, SortedQuery},
    seed::tea_ratings,
    state::try_init_state,
};

pub use self::configuration_file::{read_configuration_file, ConfigurationFile};
pub use self::exit_codes::ExitCode;
pub use self::output::OutputFormat;

pub const CONNECTION_URI_ENV_VAR: &str = "MONGODB_URI";

pub const DEFAULT_COLLECTION_NAME: &str = "ratings";

/// Options that apply to every command. Each may also be given in a configuration file.
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalOptions {
    #[arg(
        long = "connection-uri",
        env = CONNECTION_URI_ENV_VAR,
        value_name = "URI",
        value_hint = ValueHint::Url
    )]
    pub connection_uri: Option<String>,

    /// Database to use. Defaults to the database named in the connection URI, or "tea".
    #[arg(long, value_name = "NAME")]
    pub database: Option<String>,

    /// Collection to seed and read. Defaults to "ratings".
    #[arg(long, value_name = "NAME")]
    pub collection: Option<String>,

    /// Format for printed documents
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Sort keys and paging shared by the `sort` and `verify` commands.
#[derive(Debug, Clone, Default, Parser)]
pub struct QueryArgs {
    /// A sort key, `FIELD`, `FIELD:asc`, or `FIELD:desc`. Repeat for a multi-key sort; earlier
    /// keys take precedence.
    #[arg(long = "key", short = 'k', value_name = "FIELD[:DIRECTION]")]
    pub keys: Vec<SortKey>,

    /// Filter as extended JSON, e.g. '{"rating": {"$gte": 7}}'
    #[arg(long, value_name = "JSON", value_parser = parse_filter)]
    pub filter: Option<Document>,

    #[arg(long, value_name = "N")]
    pub skip: Option<u64>,

    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,
}

impl QueryArgs {
    pub fn sorted_query(&self) -> Result<SortedQuery, mongodb_support::error::Error> {
        let sort = SortSpecification::build(self.keys.iter().cloned())?;
        let mut query = SortedQuery::new(sort);
        if let Some(filter) = &self.filter {
            query = query.with_filter(filter.clone());
        }
        if let Some(skip) = self.skip {
            query = query.with_skip(skip)?;
        }
        if let Some(limit) = self.limit {
            query = query.with_limit(limit)?;
        }
        Ok(query)
    }
}

#[derive(Debug, Clone, Default, Parser)]
pub struct DemoArgs {
    /// Read the collection as it is instead of dropping and re-seeding it
    #[arg(long = "no-seed")]
    pub no_seed: bool,
}

#[derive(Debug, Clone, Parser)]
pub struct SortArgs {
    #[command(flatten)]
    pub query: QueryArgs,

    /// Sort with a `$sort` aggregation stage instead of a find option
    #[arg(long)]
    pub aggregate: bool,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Seed the collection with tea ratings and print the results of four sorted reads.
    Demo(DemoArgs),

    /// Print the documents of the collection in the given order.
    Sort(SortArgs),

    /// Run the same sorted read through find and through aggregate and check that the results
    /// match.
    Verify(QueryArgs),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Context {
    /// `None` when no connection URI was given anywhere
    pub connection: Option<ConnectionConfig>,
    pub collection: String,
    pub format: OutputFormat,

    /// Documents for the `demo` command to insert in place of the tea ratings
    pub seed: Option<Vec<Document>>,
}

impl Context {
    /// Combine command line options with values from a configuration file. Command line options
    /// win.
    pub fn resolve(options: GlobalOptions, file: ConfigurationFile) -> anyhow::Result<Context> {
        let seed = file.seed_documents()?;
        let connection = options
            .connection_uri
            .or(file.connection_uri)
            .map(|uri| ConnectionConfig {
                connection_uri: uri,
                database: options.database.or(file.database),
            });
        Ok(Context {
            connection,
            collection: options
                .collection
                .or(file.collection)
                .unwrap_or_else(|| DEFAULT_COLLECTION_NAME.to_owned()),
            format: options.format.or(file.format).unwrap_or_default(),
            seed,
        })
    }
}

/// What a command needs once its arguments are validated
enum Task {
    Demo(DemoArgs),
    Sort(SortPath, SortedQuery),
    Verify(SortedQuery),
}

/// Run a command against the database given in the context.
pub async fn run(command: Command, context: &Context) -> anyhow::Result<()> {
    let task = match command {
        Command::Demo(args) => Task::Demo(args),
        Command::Sort(args) => {
            let path = if args.aggregate {
                SortPath::Aggregate
            } else {
                SortPath::Find
            };
            Task::Sort(path, sorted_query_or_exit(&args.query))
        }
        Command::Verify(args) => Task::Verify(sorted_query_or_exit(&args)),
    };
    let Some(connection) = &context.connection else {
        eprintln!(
            "No connection URI given. Use --connection-uri, set {CONNECTION_URI_ENV_VAR}, or set connectionUri in a configuration file."
        );
        exit(ExitCode::MissingConnectionUri.into())
    };
    let state = try_init_state(connection).await?;
    let database = state.database();
    let mut stdout = std::io::stdout();

    let result = match task {
        Task::Demo(args) => demo(&database, context, &args, &mut stdout)
            .await
            .map(|()| None),
        Task::Sort(path, query) => sort(&database, context, path, &query, &mut stdout)
            .await
            .map(|()| None),
        Task::Verify(query) => verify(&database, context, &query, &mut stdout)
            .await
            .map(Some),
    };
    state.shutdown().await;
    if let Some(comparison) = result? {
        if !comparison.is_equivalent() {
            exit(ExitCode::PathsDiffer.into())
        }
    }
    Ok(())
}

/// Build the query, or exit with a specific error code if the sort keys or paging are invalid
fn sorted_query_or_exit(args: &QueryArgs) -> SortedQuery {
    match args.sorted_query() {
        Ok(query) => query,
        Err(err) => {
            eprintln!("Invalid query: {err}");
            exit(ExitCode::InvalidQuery.into())
        }
    }
}

/// Seed the collection, unless asked not to, then print the four sorted reads.
async fn demo(
    database: &impl DatabaseTrait,
    context: &Context,
    args: &DemoArgs,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let seed = if args.no_seed {
        None
    } else {
        Some(context.seed.clone().unwrap_or_else(tea_ratings))
    };
    let run = run_examples(database, &context.collection, seed).await?;
    output::write_examples_run(out, context.format, run)?;
    Ok(())
}

async fn sort(
    database: &impl DatabaseTrait,
    context: &Context,
    path: SortPath,
    query: &SortedQuery,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let collection = database.collection(&context.collection);
    let documents = run_sorted(&collection, path, query).await?;
    output::write_documents(out, context.format, documents)?;
    Ok(())
}

async fn verify(
    database: &impl DatabaseTrait,
    context: &Context,
    query: &SortedQuery,
    out: &mut impl Write,
) -> anyhow::Result<PathComparison> {
    let collection = database.collection(&context.collection);
    let comparison = compare_paths(&collection, query).await?;
    output::write_path_comparison(out, context.format, &comparison)?;
    Ok(comparison)
}

fn parse_filter(input: &str) -> anyhow::Result<Document> {
    let json: serde_json::Value = serde_json::from_str(input)?;
    match Bson::try_from(json)? {
        Bson::Document(filter) => Ok(filter),
        other => Err(anyhow::anyhow!(
            "filter must be a JSON object, but found {:?}",
            other.element_type()
        )),
    }
}
