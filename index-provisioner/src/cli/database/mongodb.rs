use clap::Args;

/// Parameters used to config MongoDB.
#[derive(Debug, Clone, Args)]
pub struct MongoDBCliArgs {
    /// The connection string to the MongoDB server.
    #[arg(env = "MONGODB_CONNECTION_URL", long, default_value = "mongodb://localhost:27017")]
    pub mongodb_connection_url: String,

    /// The name of the database holding the collections.
    #[arg(env = "MONGODB_DATABASE_NAME", long)]
    pub mongodb_database_name: Option<String>,

    /// Connect and server selection timeout, in seconds.
    #[arg(env = "MONGODB_CONNECT_TIMEOUT_SECS", long, default_value_t = 10)]
    pub mongodb_connect_timeout_secs: u64,
}
