use crate::cli::database::mongodb::MongoDBCliArgs;
use crate::ProvisionerError;
use std::time::Duration;

const SUPPORTED_SCHEMES: &[&str] = &["mongodb", "mongodb+srv"];

/// DatabaseArgs - Validated arguments used to connect to MongoDB
#[derive(Debug, Clone)]
pub struct DatabaseArgs {
    pub connection_uri: String,
    pub database_name: String,
    pub connect_timeout: Duration,
}

impl TryFrom<MongoDBCliArgs> for DatabaseArgs {
    type Error = ProvisionerError;

    fn try_from(args: MongoDBCliArgs) -> Result<Self, Self::Error> {
        // Multi-host seed lists are not valid URLs, so only the scheme is checked here and the
        // driver parses the rest when connecting.
        let connection_uri = args.mongodb_connection_url.trim().to_string();
        let scheme = match connection_uri.split_once("://") {
            Some((scheme, rest)) if !rest.is_empty() => scheme,
            _ => {
                return Err(ProvisionerError::DatabaseInvalidURIError(format!(
                    "'{}' is not a connection string",
                    connection_uri
                )))
            }
        };
        if !SUPPORTED_SCHEMES.contains(&scheme) {
            return Err(ProvisionerError::DatabaseInvalidURIError(format!(
                "unsupported scheme '{}', expected one of {:?}",
                scheme, SUPPORTED_SCHEMES
            )));
        }

        let database_name = args
            .mongodb_database_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| ProvisionerError::SetupCommandError("MongoDB database name is required".to_string()))?;

        if args.mongodb_connect_timeout_secs == 0 {
            return Err(ProvisionerError::SetupCommandError("MongoDB connect timeout must be positive".to_string()));
        }

        Ok(Self {
            connection_uri,
            database_name,
            connect_timeout: Duration::from_secs(args.mongodb_connect_timeout_secs),
        })
    }
}
