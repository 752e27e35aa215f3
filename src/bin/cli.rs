//! gredis CLI Client
//!
//! Command-line interface for interacting with a GRedis server.

use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use gredis::protocol::WIRE_TARGET;
use gredis::{BulkValue, Client, InsertPosition, NonEmpty, Options};
use tracing_subscriber::{fmt, EnvFilter};

/// gredis CLI
#[derive(Parser, Debug)]
#[command(name = "gredis-cli")]
#[command(about = "CLI for the GRedis key-value server")]
#[command(version)]
struct Args {
    /// Connection string: gredis://[:PASSWORD@]HOST[:PORT][/DB]
    #[arg(short, long, default_value = "gredis://localhost:16379")]
    url: String,

    /// Log raw protocol traffic to stderr
    #[arg(short, long)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Position {
    Before,
    After,
}

impl From<Position> for InsertPosition {
    fn from(position: Position) -> Self {
        match position {
            Position::Before => InsertPosition::Before,
            Position::After => InsertPosition::After,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ping the server
    Ping {
        /// Optional payload echoed back
        message: Option<String>,
    },

    /// Echo a message
    Echo { message: String },

    /// List the commands the server supports
    Commands,

    /// List keys matching a regular expression
    Keys { pattern: String },

    /// Count how many of the keys exist
    Exists {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set a timeout on a key
    Expire { key: String, seconds: i64 },

    /// Set a key-value pair
    Set { key: String, value: String },

    /// Get a value by key
    Get { key: String },

    /// Delete keys
    Del {
        #[arg(required = true)]
        keys: Vec<String>,
    },

    /// Set a hash field
    Hset {
        key: String,
        field: String,
        value: String,
    },

    /// Get a hash field
    Hget { key: String, field: String },

    /// Delete hash fields
    Hdel {
        key: String,
        #[arg(required = true)]
        fields: Vec<String>,
    },

    /// Number of fields in a hash
    Hlen { key: String },

    /// Whether a hash field exists
    Hexists { key: String, field: String },

    /// Push values to the head of a list
    Lpush {
        key: String,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Push values to the tail of a list
    Rpush {
        key: String,
        #[arg(required = true)]
        values: Vec<String>,
    },

    /// Pop the first element of a list
    Lpop { key: String },

    /// Pop the last element of a list
    Rpop { key: String },

    /// Length of a list
    Llen { key: String },

    /// Insert a value next to a pivot element
    Linsert {
        key: String,
        #[arg(value_enum)]
        position: Position,
        pivot: String,
        value: String,
    },

    /// Element at an index (negative counts from the tail)
    Lindex {
        key: String,
        #[arg(allow_hyphen_values = true)]
        index: i64,
    },

    /// Elements between two indices, inclusive
    Lrange {
        key: String,
        #[arg(allow_hyphen_values = true)]
        start: i64,
        #[arg(allow_hyphen_values = true)]
        stop: i64,
    },

    /// Ask the server to shut down
    Shutdown,
}

const DEFAULT_FILTER: &str = "warn,gredis=info";

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing/logging
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref(), args.trace);

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("(error) {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `RUST_LOG` (or the default) plus wire events when `--trace` is given
fn log_filter(env: Option<&str>, trace: bool) -> EnvFilter {
    let filter = env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER));

    if !trace {
        return filter;
    }
    match format!("{}=debug", WIRE_TARGET).parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn run(args: Args) -> gredis::Result<()> {
    let mut options = Options::from_url(&args.url)?;
    options.trace_protocol = args.trace;

    tracing::debug!("Connecting to {}", options.address());
    let client = Client::dial(options)?;

    match args.command {
        Commands::Ping { message: None } => println!("{}", client.ping()?),
        Commands::Ping {
            message: Some(message),
        } => print_bulk(&client.ping_message(message)?),
        Commands::Echo { message } => print_bulk(&client.echo(message)?),
        Commands::Commands => print_array(&client.commands()?),
        Commands::Keys { pattern } => print_array(&client.keys(&pattern)?),
        Commands::Exists { keys } => print_int(client.exists(NonEmpty::from_vec(keys)?)?),
        Commands::Expire { key, seconds } => print_int(client.expire(key, seconds)?),
        Commands::Set { key, value } => print_ok(client.set(key, value)?),
        Commands::Get { key } => print_bulk(&client.get(key)?),
        Commands::Del { keys } => print_int(client.del(NonEmpty::from_vec(keys)?)?),
        Commands::Hset { key, field, value } => print_int(client.hset(key, field, value)?),
        Commands::Hget { key, field } => print_bulk(&client.hget(key, field)?),
        Commands::Hdel { key, fields } => print_int(client.hdel(key, NonEmpty::from_vec(fields)?)?),
        Commands::Hlen { key } => print_int(client.hlen(key)?),
        Commands::Hexists { key, field } => print_int(client.hexists(key, field)?),
        Commands::Lpush { key, values } => print_int(client.lpush(key, NonEmpty::from_vec(values)?)?),
        Commands::Rpush { key, values } => print_int(client.rpush(key, NonEmpty::from_vec(values)?)?),
        Commands::Lpop { key } => print_bulk(&client.lpop(key)?),
        Commands::Rpop { key } => print_bulk(&client.rpop(key)?),
        Commands::Llen { key } => print_int(client.llen(key)?),
        Commands::Linsert {
            key,
            position,
            pivot,
            value,
        } => print_int(client.linsert(key, position.into(), pivot, value)?),
        Commands::Lindex { key, index } => print_bulk(&client.lindex(key, index)?),
        Commands::Lrange { key, start, stop } => print_array(&client.lrange(key, start, stop)?),
        Commands::Shutdown => {
            client.shutdown()?;
            return Ok(());
        }
    }

    client.close();
    Ok(())
}

fn print_ok(_: bool) {
    println!("OK");
}

fn print_int(value: i64) {
    println!("(integer) {}", value);
}

fn print_bulk(value: &BulkValue) {
    match value {
        Some(data) => println!("\"{}\"", data.escape_ascii()),
        None => println!("(nil)"),
    }
}

fn print_array(values: &[BulkValue]) {
    if values.is_empty() {
        println!("(empty array)");
        return;
    }
    for (idx, value) in values.iter().enumerate() {
        print!("{}) ", idx + 1);
        print_bulk(value);
    }
}
