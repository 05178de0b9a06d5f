//! Integration tests for recipients and tag placement.

use std::time::{SystemTime, UNIX_EPOCH};

use esign::{
    AddRecipientRequest, AddTagRequest, AddTagsByPlaceholderRequest, Alignment, Client,
    ClientConfig, Credentials, RecipientRole, TagPlacement, TagType,
};
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENVELOPE_ID: &str = "00000000-0000-0000-0000-0000000000e1";
const RECIPIENT_ID: &str = "00000000-0000-0000-0000-0000000000a1";
const DOCUMENT_ID: &str = "00000000-0000-0000-0000-0000000000d1";
const TAG_ID: &str = "00000000-0000-0000-0000-0000000000c1";

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let exp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs() + 3600;
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"token": "tok", "exp": exp})),
        )
        .mount(&server)
        .await;

    let client = Client::with_config(
        Credentials::new("ak", "sk"),
        ClientConfig {
            base_url: Some(server.uri()),
            ..Default::default()
        },
    )
    .unwrap();
    (server, client)
}

fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).unwrap()
}

fn document_ref() -> String {
    format!("/envelopes/{}/documents/{}", ENVELOPE_ID, DOCUMENT_ID)
}

async fn last_tag_body(server: &MockServer) -> serde_json::Value {
    let requests = server.received_requests().await.unwrap();
    let request = requests
        .iter()
        .rev()
        .find(|r| r.url.path().ends_with("/tags"))
        .expect("tag request");
    serde_json::from_slice(&request.body).unwrap()
}

#[tokio::test]
async fn test_add_recipient_without_mobile() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("/envelopes/{}/recipients", ENVELOPE_ID)))
        .and(body_json(serde_json::json!({
            "role": "signer",
            "name": "Ada Lovelace",
            "email": "ada@example.com"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": RECIPIENT_ID,
            "role": "signer",
            "name": "Ada Lovelace",
            "email": "ada@example.com"
        })))
        .mount(&server)
        .await;

    let recipient = client
        .recipients()
        .add(
            &id(ENVELOPE_ID),
            AddRecipientRequest {
                role: RecipientRole::Signer,
                name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                mobile: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(recipient.id, id(RECIPIENT_ID));
    assert!(recipient.mobile.is_none());
}

#[tokio::test]
async fn test_get_and_list_recipients() {
    let (server, client) = setup().await;
    let recipient = serde_json::json!({
        "id": RECIPIENT_ID,
        "role": "approver",
        "name": "Grace",
        "email": "grace@example.com",
        "mobile": "+33600000000"
    });

    Mock::given(method("GET"))
        .and(path(format!("/envelopes/{}/recipients", ENVELOPE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([recipient.clone()])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/envelopes/{}/recipients/{}", ENVELOPE_ID, RECIPIENT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(recipient))
        .mount(&server)
        .await;

    let all = client.recipients().list(&id(ENVELOPE_ID)).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].role, RecipientRole::Approver);

    let one = client
        .recipients()
        .get(&id(ENVELOPE_ID), &id(RECIPIENT_ID))
        .await
        .unwrap();
    assert_eq!(one.mobile.as_deref(), Some("+33600000000"));
}

#[tokio::test]
async fn test_placeholder_tag_request_shape() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("/envelopes/{}/tags", ENVELOPE_ID)))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": TAG_ID,
            "type": "signature"
        })))
        .mount(&server)
        .await;

    let tag = client
        .tags()
        .add(
            &id(ENVELOPE_ID),
            AddTagRequest {
                recipient_id: id(RECIPIENT_ID),
                tag_type: None,
                placement: TagPlacement::Placeholder {
                    text: "{sign_here}".to_string(),
                    alignment: Some(Alignment::BottomLeft),
                    document_id: Some(id(DOCUMENT_ID)),
                },
            },
        )
        .await
        .unwrap();
    assert_eq!(tag.tag_type, TagType::Signature);

    let body = last_tag_body(&server).await;
    assert_eq!(
        body,
        serde_json::json!({
            "recipient_id": RECIPIENT_ID,
            "type": "signature",
            "placeholder": "{sign_here}",
            "positioning": "bottom_left",
            "document": document_ref()
        })
    );
    assert!(body.get("page").is_none());
}

#[tokio::test]
async fn test_coordinate_tag_request_shape() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path(format!("/envelopes/{}/tags", ENVELOPE_ID)))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": TAG_ID,
            "type": "text"
        })))
        .mount(&server)
        .await;

    client
        .tags()
        .add(
            &id(ENVELOPE_ID),
            AddTagRequest {
                recipient_id: id(RECIPIENT_ID),
                tag_type: Some(TagType::Text),
                placement: TagPlacement::Coordinate {
                    document_id: id(DOCUMENT_ID),
                    page: 1,
                    x: 100.0,
                    y: 200.0,
                },
            },
        )
        .await
        .unwrap();

    let body = last_tag_body(&server).await;
    assert_eq!(
        body,
        serde_json::json!({
            "recipient_id": RECIPIENT_ID,
            "type": "text",
            "document": document_ref(),
            "page": 1,
            "x_position": 100.0,
            "y_position": 200.0
        })
    );
    assert!(body.get("placeholder").is_none());
}

#[tokio::test]
async fn test_add_by_placeholder_uses_batch_endpoint() {
    let (server, client) = setup().await;
    let second_document = "00000000-0000-0000-0000-0000000000d2";

    Mock::given(method("POST"))
        .and(path(format!("/envelopes/{}/tags/by-placeholder", ENVELOPE_ID)))
        .and(body_json(serde_json::json!({
            "recipient_id": RECIPIENT_ID,
            "type": "signature",
            "placeholder": "{sign_here}",
            "positioning": "middle_center",
            "documents": [
                document_ref(),
                format!("/envelopes/{}/documents/{}", ENVELOPE_ID, second_document)
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
            {"id": TAG_ID, "type": "signature"},
            {"id": "00000000-0000-0000-0000-0000000000c2", "type": "signature"}
        ])))
        .mount(&server)
        .await;

    let tags = client
        .tags()
        .add_by_placeholder(
            &id(ENVELOPE_ID),
            AddTagsByPlaceholderRequest {
                recipient_id: id(RECIPIENT_ID),
                tag_type: None,
                placeholder: "{sign_here}".to_string(),
                alignment: Some(Alignment::MiddleCenter),
                document_ids: vec![id(DOCUMENT_ID), id(second_document)],
            },
        )
        .await
        .unwrap();
    assert_eq!(tags.len(), 2);
}

#[tokio::test]
async fn test_list_tags() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path(format!("/envelopes/{}/tags", ENVELOPE_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": TAG_ID, "type": "checkbox", "page": 2}
        ])))
        .mount(&server)
        .await;

    let tags = client.tags().list(&id(ENVELOPE_ID)).await.unwrap();
    assert_eq!(tags[0].tag_type, TagType::Checkbox);
    assert_eq!(tags[0].extra.get("page"), Some(&serde_json::json!(2)));
}
