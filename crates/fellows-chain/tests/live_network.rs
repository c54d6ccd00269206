//! Queries against the public Polkadot endpoints.
//!
//! Run with: cargo test -p fellows-chain --test live_network -- --ignored --nocapture

use fellows_chain::{
    ChainConnection, CollectivesChainClient, PeopleChainClient, RelayChainClient, get_balance,
    get_display_name, get_members,
};
use fellows_core::config::{
    DEFAULT_ADDRESS, DEFAULT_COLLECTIVES_ENDPOINT, DEFAULT_PEOPLE_ENDPOINT, DEFAULT_RELAY_ENDPOINT,
};
use fellows_core::ChainRole;
use std::time::Duration;

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("fellows_chain=debug,info")
        .try_init();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn relay_chain_diagnostics_and_balance() {
    init_logging();

    let connection = ChainConnection::connect(ChainRole::Relay, DEFAULT_RELAY_ENDPOINT)
        .await
        .expect("Failed to connect to relay chain")
        .with_query_timeout(Some(Duration::from_secs(30)));

    let chain_name = connection.chain_name().await.expect("Failed to read chain name");
    let height = connection
        .finalized_height()
        .await
        .expect("Failed to read finalized block");
    println!("Chain: {} #{}", chain_name, height);
    assert_eq!(chain_name, "Polkadot");
    assert!(height > 0);

    let relay = RelayChainClient::new(connection);
    let balance = get_balance(&relay, DEFAULT_ADDRESS)
        .await
        .expect("Failed to read balance");
    println!("Balance of {}: {}", DEFAULT_ADDRESS, balance);

    relay.into_connection().close();
}

#[tokio::test]
#[ignore = "requires network access"]
async fn fellowship_members_have_names() {
    init_logging();

    let collectives = CollectivesChainClient::new(
        ChainConnection::connect(ChainRole::Collectives, DEFAULT_COLLECTIVES_ENDPOINT)
            .await
            .expect("Failed to connect to collectives chain"),
    );
    let people = PeopleChainClient::new(
        ChainConnection::connect(ChainRole::People, DEFAULT_PEOPLE_ENDPOINT)
            .await
            .expect("Failed to connect to people chain"),
    );

    let members = get_members(&collectives)
        .await
        .expect("Failed to enumerate fellowship");
    println!("Found {} fellowship members", members.len());
    assert!(!members.is_empty());
    assert!(members.windows(2).all(|pair| pair[0].rank >= pair[1].rank));

    let name = get_display_name(&people, &members[0].address).await;
    println!("Most senior member: {} ({})", members[0].address, name);
    assert!(!name.is_empty());
}
