use clap::Parser;
use lib_infradidresolver::NetworkConfiguration;

//
// system arguments and environment for the service
//

pub(crate) const DEFAULT_HOST: &str = "127.0.0.1";
pub(crate) const DEFAULT_PORT: u16 = 0;

#[derive(Parser, Debug)]
#[command(
    name = "infradidresolver",
    version = "0.1.0",
    about = "did:infra Resolver"
)]
pub struct Args {
    #[arg(short = 'p', long = "port", env = "RESOLVER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,
    #[arg(short = 's', long = "host", env = "RESOLVER_HOST", default_value = DEFAULT_HOST)]
    pub host: String,
    /// `networkId,registryContract,rpcEndpoint`, repeat the flag or separate entries with `;`
    #[arg(
        short = 'n',
        long = "network",
        env = "INFRA_NETWORKS",
        value_delimiter = ';'
    )]
    pub networks: Vec<NetworkConfiguration>,
    #[arg(long = "no-revocation-check", env = "NO_REVOCATION_CHECK")]
    pub no_revocation_check: bool,
}

pub fn parse_args() -> Args {
    let args = Args::parse();
    log::info!("Args: {:?}", args);
    args
}
