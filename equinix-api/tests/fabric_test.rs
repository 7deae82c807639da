//! Fabric integration tests (read-only)
//!
//! 运行: `EQUINIX_API_CLIENTID=... EQUINIX_API_CLIENTSECRET=... cargo test -p equinix-api --test fabric_test -- --ignored`

mod common;

use common::client_from_env;

#[tokio::test]
#[ignore = "requires Fabric credentials"]
async fn missing_connection_is_client_error() {
    skip_if_no_credentials!("EQUINIX_API_CLIENTID", "EQUINIX_API_CLIENTSECRET");
    let client = require_some!(client_from_env());

    let result = client
        .connections()
        .get_connection("00000000-0000-0000-0000-000000000000")
        .await;
    let Err(err) = result else {
        panic!("expected an error for a random id");
    };
    assert!(err.is_client_error(), "unexpected error: {err}");
}

#[tokio::test]
#[ignore = "requires Fabric credentials and FABRIC_TEST_CONNECTION_ID"]
async fn reads_existing_connection_state() {
    skip_if_no_credentials!(
        "EQUINIX_API_CLIENTID",
        "EQUINIX_API_CLIENTSECRET",
        "FABRIC_TEST_CONNECTION_ID"
    );
    let client = require_some!(client_from_env());
    let Ok(id) = std::env::var("FABRIC_TEST_CONNECTION_ID") else {
        return;
    };

    let connection = require_ok!(client.connections().get_connection(&id).await);
    assert_eq!(connection.uuid, id);
    assert!(connection.state.is_some(), "connection without state");
}
