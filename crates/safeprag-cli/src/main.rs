mod commands;
mod output;

use clap::{Parser, Subcommand};
use commands::Context;
use output::Format;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "safeprag",
    version,
    about = "Field-service tool for pest-control inspections and service orders"
)]
struct Cli {
    /// Directory holding the stored data
    #[arg(long, global = true, env = "SAFEPRAG_DATA_DIR", default_value = ".safeprag")]
    data_dir: PathBuf,

    /// Custom JSON catalog (default: built-in catalog)
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress device numbers into ranges ("1-3, 5"), or expand them back
    Ranges {
        numbers: Vec<u32>,

        /// Expand a range text instead
        #[arg(long, value_name = "TEXT", conflicts_with = "numbers")]
        expand: Option<String>,
    },
    /// List the statuses offered for a device type
    Statuses {
        device_type: String,

        /// Custom statuses to include
        #[arg(long = "added", value_name = "STATUS")]
        added: Vec<String>,

        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,
    },
    /// Inspect and validate catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage planned visits
    Schedule {
        #[command(subcommand)]
        action: ScheduleAction,
    },
    /// Drive the service-order lifecycle
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Select, mark and save devices for the active visit
    Devices {
        #[command(subcommand)]
        action: DevicesAction,
    },
    /// Count pests per device
    Pests {
        #[command(subcommand)]
        action: PestsAction,
    },
    /// Manage the services performed during the visit
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },
    /// Assemble the report of a stored order or of a report-input JSON file
    Report {
        order_id: Option<String>,

        /// Report input JSON instead of a stored order
        #[arg(long, value_name = "FILE", conflicts_with = "order_id")]
        input: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,

        /// Write the report JSON to a file
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Dump every stored key to a JSON file
    Backup { file: PathBuf },
    /// Merge a backup file into the store
    Restore { file: PathBuf },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List predefined catalogs
    List,
    /// Validate a custom catalog file
    Validate { file: PathBuf },
    /// Print the catalog JSON schema with an example
    Schema,
}

#[derive(Subcommand)]
enum ScheduleAction {
    /// Add a planned visit
    Add {
        #[arg(long)]
        id: Option<String>,
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        client_name: String,
        #[arg(long, default_value = "")]
        address: String,
        /// Visit date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        #[arg(long, default_value = "")]
        start_time: String,
        #[arg(long, default_value = "")]
        end_time: String,
        #[arg(long)]
        service_type: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// List planned visits
    List {
        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Start a service order for a schedule (retroactive when --date is given)
    Start {
        schedule_id: String,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, requires = "date")]
        start_time: Option<String>,
        #[arg(long, requires = "date")]
        end_time: Option<String>,
    },
    /// Register that a scheduled visit could not happen
    NoService { schedule_id: String, reason: String },
    /// Finish the active order and print its report
    Finish {
        #[arg(long)]
        observations: Option<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Approve a completed order
    Approve { order_id: String },
    /// Abandon an in-progress order
    Cancel {
        order_id: String,
        #[arg(default_value = "")]
        reason: String,
    },
    /// Show one order, or all orders
    Show {
        order_id: Option<String>,
        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,
    },
}

#[derive(Subcommand)]
enum DevicesAction {
    /// Select a device type and quantity, replacing the working set
    Select {
        device_type: String,
        #[arg(allow_hyphen_values = true)]
        quantity: i64,
        #[arg(long, default_value_t = 1)]
        start: u32,
    },
    /// Choose the status applied by taps (empty for the default)
    Status {
        status: String,
        /// Add it as a custom status first
        #[arg(long)]
        add: bool,
    },
    /// Toggle the status of devices by number
    Tap {
        #[arg(required = true)]
        numbers: Vec<u32>,
    },
    /// Mark every unassigned device with the default status
    SelectAll,
    /// Save the working set
    Save,
    /// Show the working set and saved-device summary
    Show {
        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,
    },
}

#[derive(Subcommand)]
enum PestsAction {
    /// Add to a pest's count (negative to subtract)
    Record {
        device_type: String,
        number: u32,
        pest: String,
        #[arg(allow_hyphen_values = true, default_value_t = 1)]
        delta: i64,
    },
    /// Set a pest's count
    Set {
        device_type: String,
        number: u32,
        pest: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
    /// Keep a device's positive counts for the report
    Commit { device_type: String, number: u32 },
    /// Add a custom pest
    Add { name: String },
}

#[derive(Subcommand)]
enum ServicesAction {
    /// Add a service entry
    Add {
        service_type: String,
        #[arg(long, default_value = "")]
        target: String,
        #[arg(long, default_value = "")]
        location: String,
        /// Product id from the catalog
        #[arg(long)]
        product: Option<String>,
        #[arg(long, default_value = "")]
        amount: String,
    },
    /// Remove a service entry by id
    Remove { id: String },
    /// Add a custom service type
    AddType { name: String },
    /// Show the service list
    Show {
        #[arg(short, long, value_enum, default_value = "table")]
        output: Format,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let ctx = Context {
        data_dir: cli.data_dir,
        catalog: cli.catalog,
    };

    let result = match cli.command {
        Commands::Ranges { numbers, expand } => commands::ranges::run(&numbers, expand.as_deref()),
        Commands::Statuses {
            device_type,
            added,
            output,
        } => commands::catalog::statuses(&ctx, &device_type, &added, output),
        Commands::Catalog { action } => match action {
            CatalogAction::List => commands::catalog::list(),
            CatalogAction::Validate { file } => commands::catalog::validate(&file),
            CatalogAction::Schema => commands::catalog::schema(),
        },
        Commands::Schedule { action } => match action {
            ScheduleAction::Add {
                id,
                client_id,
                client_name,
                address,
                date,
                start_time,
                end_time,
                service_type,
                notes,
            } => commands::schedule::add(
                &ctx,
                commands::schedule::NewSchedule {
                    id,
                    client_id,
                    client_name,
                    client_address: address,
                    date,
                    start_time,
                    end_time,
                    service_type,
                    notes,
                },
            ),
            ScheduleAction::List { output } => commands::schedule::list(&ctx, output),
        },
        Commands::Order { action } => match action {
            OrderAction::Start {
                schedule_id,
                date,
                start_time,
                end_time,
            } => commands::order::start(&ctx, &schedule_id, date, start_time, end_time),
            OrderAction::NoService {
                schedule_id,
                reason,
            } => commands::order::no_service(&ctx, &schedule_id, &reason),
            OrderAction::Finish {
                observations,
                output,
                out,
            } => commands::order::finish(&ctx, observations, output, out),
            OrderAction::Approve { order_id } => commands::order::approve(&ctx, &order_id),
            OrderAction::Cancel { order_id, reason } => {
                commands::order::cancel(&ctx, &order_id, &reason)
            }
            OrderAction::Show { order_id, output } => {
                commands::order::show(&ctx, order_id.as_deref(), output)
            }
        },
        Commands::Devices { action } => match action {
            DevicesAction::Select {
                device_type,
                quantity,
                start,
            } => commands::devices::select(&ctx, &device_type, quantity, start),
            DevicesAction::Status { status, add } => commands::devices::status(&ctx, &status, add),
            DevicesAction::Tap { numbers } => commands::devices::tap(&ctx, &numbers),
            DevicesAction::SelectAll => commands::devices::select_all(&ctx),
            DevicesAction::Save => commands::devices::save(&ctx),
            DevicesAction::Show { output } => commands::devices::show(&ctx, output),
        },
        Commands::Pests { action } => match action {
            PestsAction::Record {
                device_type,
                number,
                pest,
                delta,
            } => commands::pests::record(&ctx, &device_type, number, &pest, delta),
            PestsAction::Set {
                device_type,
                number,
                pest,
                value,
            } => commands::pests::set(&ctx, &device_type, number, &pest, &value),
            PestsAction::Commit {
                device_type,
                number,
            } => commands::pests::commit(&ctx, &device_type, number),
            PestsAction::Add { name } => commands::pests::add(&ctx, &name),
        },
        Commands::Services { action } => match action {
            ServicesAction::Add {
                service_type,
                target,
                location,
                product,
                amount,
            } => commands::services::add(
                &ctx,
                commands::services::NewService {
                    service_type,
                    target,
                    location,
                    product,
                    amount,
                },
            ),
            ServicesAction::Remove { id } => commands::services::remove(&ctx, &id),
            ServicesAction::AddType { name } => commands::services::add_type(&ctx, &name),
            ServicesAction::Show { output } => commands::services::show(&ctx, output),
        },
        Commands::Report {
            order_id,
            input,
            output,
            out,
        } => commands::report::run(&ctx, order_id.as_deref(), input.as_deref(), output, out),
        Commands::Backup { file } => commands::backup::create(&ctx, &file),
        Commands::Restore { file } => commands::backup::load(&ctx, &file),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
