//! Connects to every chain and drives the report from start to finish.

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use fellows_chain::{
    AccountSource, ChainConnection, CollectivesChainClient, PeopleChainClient, RelayChainClient,
    build_report, get_balance, get_display_name, get_members,
};
use fellows_core::{AppConfig, ChainRole, describe_account_info, format_balance};

use crate::output::Output;

/// One connection per chain, owned for the duration of the run.
struct Connections {
    relay: RelayChainClient,
    people: PeopleChainClient,
    collectives: CollectivesChainClient,
    testnet: Option<RelayChainClient>,
}

impl Connections {
    async fn open(config: &AppConfig, include_testnet: bool, out: Output) -> Result<Self> {
        let relay = RelayChainClient::new(open_chain(config, ChainRole::Relay, out).await?);
        let people = PeopleChainClient::new(open_chain(config, ChainRole::People, out).await?);
        let collectives =
            CollectivesChainClient::new(open_chain(config, ChainRole::Collectives, out).await?);
        let testnet = if include_testnet {
            Some(RelayChainClient::new(
                open_chain(config, ChainRole::TestNet, out).await?,
            ))
        } else {
            None
        };

        Ok(Self {
            relay,
            people,
            collectives,
            testnet,
        })
    }

    fn close(self) {
        self.relay.into_connection().close();
        self.people.into_connection().close();
        self.collectives.into_connection().close();
        if let Some(testnet) = self.testnet {
            testnet.into_connection().close();
        }
    }
}

/// Connect to one chain and print its diagnostics.
async fn open_chain(config: &AppConfig, role: ChainRole, out: Output) -> Result<ChainConnection> {
    let endpoint = config.endpoints.for_role(role);
    out.line(format!("Creating client for: {}", endpoint));

    let connection = ChainConnection::connect(role, endpoint)
        .await
        .wrap_err_with(|| format!("Could not connect to the {}", role))?
        .with_query_timeout(config.query_timeout());

    print_chain_info(&connection, out).await;
    Ok(connection)
}

/// Diagnostics never abort the run.
async fn print_chain_info(connection: &ChainConnection, out: Output) {
    match connection.chain_name().await {
        Ok(name) => out.line(format!("Chain: {}", name)),
        Err(e) => tracing::warn!("Could not read chain name of {}: {}", connection.role(), e),
    }

    match connection.finalized_height().await {
        Ok(height) => out.line(format!("Finalized Block # {}", height)),
        Err(e) => tracing::warn!(
            "Could not read finalized block of {}: {}",
            connection.role(),
            e
        ),
    }

    tracing::debug!(
        "{} runtime spec_version {}, genesis 0x{}",
        connection.role(),
        connection.spec_version(),
        hex::encode(connection.genesis_hash())
    );
}

/// Run the whole report.
pub async fn run(config: &AppConfig, include_testnet: bool, out: Output) -> Result<()> {
    let connections = Connections::open(config, include_testnet, out).await?;

    let address = config.address.as_str();
    let balance = get_balance(&connections.relay, address)
        .await
        .wrap_err_with(|| format!("Could not read the balance of {}", address))?;
    out.line(format!("Address: {}", address));
    out.line(format!("Balance: {}", format_balance(balance, &config.token)));

    let display_name = get_display_name(&connections.people, address).await;
    out.line(format!(
        "Balance({}): {}",
        display_name,
        format_balance(balance, &config.token)
    ));

    let members = get_members(&connections.collectives)
        .await
        .wrap_err("Could not enumerate fellowship members")?;
    tracing::info!("Found {} fellowship members", members.len());

    out.line("Generating table...");
    let rows = build_report(
        &connections.relay,
        &connections.people,
        &members,
        config.batch_size,
    )
    .await
    .wrap_err("Could not build the member report")?;
    out.report(&rows, &config.token)?;

    if let Some(testnet) = &connections.testnet {
        print_testnet_account(testnet, config, out).await?;
    }

    connections.close();
    Ok(())
}

/// Print the full account record of the target address on the test network.
async fn print_testnet_account(
    testnet: &RelayChainClient,
    config: &AppConfig,
    out: Output,
) -> Result<()> {
    let info = testnet
        .fetch_account(&config.address)
        .await
        .wrap_err("Could not read the test network account")?;

    out.line(format!("Test network account {}:", config.address));
    match info {
        Some(info) => {
            for line in describe_account_info(&info, &config.testnet_token) {
                out.line(format!("  {}", line));
            }
        }
        None => out.line("  no account record"),
    }
    Ok(())
}
