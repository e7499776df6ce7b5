//! Full CRUD lifecycle test against the live mock server.
//!
//! # Design
//! Starts the in-memory mock server on a random port, then exercises every
//! client operation over real HTTP. Validates that request building and
//! response parsing agree with the server's schema end-to-end.

use cloudhealth_core::{
    ApiError, AwsAccount, AwsAccountAuthentication, AwsAccountFeed, AwsAccountTag,
    ClientConfig, CloudHealthClient,
};

fn client() -> CloudHealthClient {
    let addr = mock_server::spawn(mock_server::app()).unwrap();
    let config = ClientConfig::new("apiKey").with_base_url(format!("http://{addr}"));
    CloudHealthClient::from_config(&config).unwrap()
}

#[test]
fn crud_lifecycle() {
    let client = client();

    // Step 1: list, should be empty.
    let accounts = client.list_aws_accounts(10).unwrap();
    assert!(accounts.is_empty(), "expected empty list");

    // Step 2: create an account with metadata.
    let input = AwsAccount {
        name: "production".to_string(),
        authentication: Some(AwsAccountAuthentication {
            protocol: "assume_role".to_string(),
            assume_role_arn: Some("arn:aws:iam::123456789012:role/cloudhealth".to_string()),
            assume_role_external_id: Some("ext-123".to_string()),
            ..Default::default()
        }),
        tags: vec![AwsAccountTag {
            key: "env".to_string(),
            value: "prod".to_string(),
        }],
        ..Default::default()
    };
    let created = client.create_aws_account(&input).unwrap();
    assert_ne!(created.id, 0);
    assert_eq!(created.name, "production");
    assert_eq!(created.authentication, input.authentication);
    assert_eq!(created.tags, input.tags);
    let id = created.id;

    // Step 3: get the created account.
    let fetched = client.get_aws_account(id).unwrap();
    assert_eq!(fetched, created);

    // Step 4: duplicate name is refused.
    let err = client
        .create_aws_account(&AwsAccount::named("production"))
        .unwrap_err();
    assert!(err.is_conflict());

    // Step 5: update only the cloudtrail feed.
    let patch = AwsAccount {
        id,
        name: "production".to_string(),
        cloudtrail: Some(AwsAccountFeed {
            enabled: true,
            bucket: Some("trail-logs".to_string()),
            prefix: None,
        }),
        ..Default::default()
    };
    let updated = client.update_aws_account(&patch).unwrap();
    assert_eq!(updated.id, id);
    assert_eq!(updated.cloudtrail, patch.cloudtrail);
    assert_eq!(updated.authentication, created.authentication); // untouched

    // Step 6: rename into a collision with a second account.
    let other = client.create_aws_account(&AwsAccount::named("staging")).unwrap();
    let clash = AwsAccount {
        name: "production".to_string(),
        ..other.clone()
    };
    let err = client.update_aws_account(&clash).unwrap_err();
    assert!(matches!(err, ApiError::Conflict { .. }));

    // Step 7: list, both accounts in id order.
    let ids: Vec<u64> = client
        .list_aws_accounts(10)
        .unwrap()
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![id, other.id]);

    // Step 8: delete.
    client.delete_aws_account(id).unwrap();

    // Step 9: get after delete, should be NotFound.
    let err = client.get_aws_account(id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 10: delete again, should be NotFound.
    let err = client.delete_aws_account(id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 11: list, only the second account remains.
    let accounts = client.list_aws_accounts(10).unwrap();
    assert_eq!(accounts, vec![other]);
}

#[test]
fn pagination_returns_single_pages() {
    let client = client();
    for i in 0..15 {
        client
            .create_aws_account(&AwsAccount::named(format!("test-{i:02}")))
            .unwrap();
    }

    let first = client.list_aws_accounts(10).unwrap();
    assert_eq!(first.len(), 10);
    assert_eq!(first[0].name, "test-00");

    let second = client.list_aws_accounts_page(2, 10).unwrap();
    let names: Vec<&str> = second.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["test-10", "test-11", "test-12", "test-13", "test-14"]);
}

#[test]
fn missing_api_key_is_rejected_by_server() {
    let addr = mock_server::spawn(mock_server::app()).unwrap();
    let client = CloudHealthClient::new("", &format!("http://{addr}")).unwrap();

    let err = client.list_aws_accounts(10).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
}
