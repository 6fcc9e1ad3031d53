use clap::{Parser, Subcommand};

pub mod database;

#[derive(Parser, Debug)]
#[command(
    name = "index-provisioner",
    about = "Provision the MongoDB indexes required by the action service",
    long_about = "Creates the unique, lookup and TTL indexes on the active_actions, completed_operations and \
    cache_version collections.\n\n\
    Index creation is idempotent: indexes that already exist with the same definition are left untouched.",
    after_help = "Examples:\n  \
    index-provisioner setup --mongodb-database-name bots\n  \
    index-provisioner setup --mongodb-database-name bots --dry-run\n  \
    index-provisioner verify --mongodb-connection-url mongodb://db:27017 --mongodb-database-name bots"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the indexes on the target database
    #[command(long_about = "Create every index of the manifest on the target database.\n\n\
        Fails if pre-existing documents violate a uniqueness constraint or if an existing index \
        conflicts with the requested options.")]
    Setup {
        #[command(flatten)]
        setup_command: Box<SetupCmd>,
    },
    /// Check that the indexes exist with the expected options
    Verify {
        #[command(flatten)]
        verify_command: Box<VerifyCmd>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct SetupCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,

    /// Log the indexes that would be created without connecting to the database
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct VerifyCmd {
    #[clap(flatten)]
    pub mongodb_args: database::mongodb::MongoDBCliArgs,
}
