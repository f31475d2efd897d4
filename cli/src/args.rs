use catnav_catalog::catalogservice::WILDCARD;
use catnav_catalog::Credential;
use catnav_drive::{CaseSensitivity, CollectionsConfig, ResolverConfig, Separator};
use clap::{Args, Parser, Subcommand};
use tracing::Level;

/// The secret is only ever read from the environment, never from arguments.
pub const PASSWORD_ENV: &str = "CATNAV_PASSWORD";

const DEFAULT_COLLECTIONS_CONTAINER: &str = "Collections";

/// Browses remote catalogs through virtual paths.
///
/// A virtual path carries the percent-encoded URL of the catalog service
/// in brackets, followed by the path of a node inside of it, like
/// `Root[http%3A%2F%2Ftfs%3A8080%2Ftfs]\proj\widgets`.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// A global log level to use when printing logs.
    /// It's also possible to set `RUST_LOG` according to
    /// `tracing_subscriber::filter::EnvFilter`, which will always have
    /// priority.
    #[arg(long, default_value_t = Level::INFO)]
    pub log_level: Level,

    #[command(flatten)]
    pub resolver: ResolverArgs,

    /// The username to connect with. The secret is taken from
    /// `CATNAV_PASSWORD`.
    #[arg(long, env = "CATNAV_USERNAME")]
    pub username: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prints the root of a drive for the catalog at the given URL.
    Root {
        #[clap(value_name = "URI")]
        uri: String,
    },
    /// Prints the children of the node at the given path, as JSON.
    Ls(Target),
    /// Prints the node at the given path, as JSON.
    Get(Target),
}

#[derive(Args)]
pub struct Target {
    #[clap(value_name = "PATH")]
    pub path: String,

    /// Treat PATH as relative to a drive mounted for the catalog at this URL.
    /// The credential then becomes the drive's credential.
    #[arg(long, env = "CATNAV_DRIVE_URI")]
    pub drive_uri: Option<String>,
}

#[derive(Args)]
pub struct ResolverArgs {
    /// Separator between path segments, `backslash` or `slash`.
    #[arg(long, env = "CATNAV_SEPARATOR", default_value = "backslash")]
    pub separator: Separator,

    /// How path segments are compared, `sensitive` or `insensitive`.
    #[arg(long, env = "CATNAV_CASE_SENSITIVITY", default_value = "sensitive")]
    pub case_sensitivity: CaseSensitivity,

    /// The pattern the catalog's entries are listed with.
    #[arg(long, env = "CATNAV_ENTRY_PATTERN", default_value = WILDCARD)]
    pub entry_pattern: String,

    /// Adds a container with the collections of this kind below the root.
    #[arg(long, env = "CATNAV_COLLECTIONS_KIND")]
    pub collections_kind: Option<String>,

    /// Name of that container, `Collections` if unset.
    #[arg(long, env = "CATNAV_COLLECTIONS_CONTAINER", requires = "collections_kind")]
    pub collections_container: Option<String>,
}

impl From<ResolverArgs> for ResolverConfig {
    fn from(args: ResolverArgs) -> Self {
        ResolverConfig {
            separator: args.separator,
            case_sensitivity: args.case_sensitivity,
            entry_pattern: args.entry_pattern,
            collections: args.collections_kind.map(|kind| CollectionsConfig {
                container_name: args
                    .collections_container
                    .unwrap_or_else(|| DEFAULT_COLLECTIONS_CONTAINER.to_string()),
                kind,
            }),
        }
    }
}

impl Cli {
    /// Builds the credential from the username and the secret in the
    /// environment, if a username is set.
    pub fn credential(&self, secret: Option<String>) -> Option<Credential> {
        self.username
            .as_ref()
            .map(|username| Credential::new(username.clone(), secret.unwrap_or_default()))
    }
}
