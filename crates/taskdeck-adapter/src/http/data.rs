/*
[INPUT]:  `Todo` write payloads, ids, page tokens and the held session token
[OUTPUT]: Stored `Todo` records
[POS]:    HTTP layer - structured-data endpoints (require bearer token)
[UPDATE]: When the data API endpoints change
*/

use async_trait::async_trait;
use reqwest::Method;

use crate::http::{BackendClient, Result};
use crate::tasks::{DataApi, TodoRecord, TodoWrite};
use crate::types::Page;

const TODO_MODEL: &str = "/v1/models/Todo";

#[async_trait]
impl DataApi for BackendClient {
    /// POST /v1/models/Todo
    async fn create_todo(&self, body: &TodoWrite) -> Result<TodoRecord> {
        let builder = self.data_request(Method::POST, TODO_MODEL)?.json(body);
        self.send_json(builder).await
    }

    /// GET /v1/models/Todo?nextToken={token}
    async fn list_todos_page(&self, next_token: Option<&str>) -> Result<Page<TodoRecord>> {
        let mut builder = self.data_request(Method::GET, TODO_MODEL)?;
        if let Some(token) = next_token {
            builder = builder.query(&[("nextToken", token)]);
        }
        self.send_json(builder).await
    }

    /// PATCH /v1/models/Todo/{id}
    async fn update_todo(&self, id: &str, body: &TodoWrite) -> Result<TodoRecord> {
        let endpoint = format!("{TODO_MODEL}/{id}");
        let builder = self.data_request(Method::PATCH, &endpoint)?.json(body);
        self.send_json(builder).await
    }

    /// DELETE /v1/models/Todo/{id}
    async fn delete_todo(&self, id: &str) -> Result<()> {
        let endpoint = format!("{TODO_MODEL}/{id}");
        let builder = self.data_request(Method::DELETE, &endpoint)?;
        self.send_empty(builder).await
    }
}

#[cfg(test)]
mod tests {
    use crate::http::{BackendClient, ClientConfig, Endpoints};
    use crate::tasks::{DataApi, TodoWrite};
    use crate::types::TaskStatus;
    use wiremock::matchers::{body_json, method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn signed_in_client(server: &MockServer) -> BackendClient {
        let client = BackendClient::with_config_and_endpoints(
            ClientConfig::default(),
            Endpoints::single(&server.uri()).expect("endpoints"),
        )
        .expect("client init");
        client.session().set_token("access-1".to_string(), 3600);
        client
    }

    fn record(id: &str, title: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": title,
            "content": null,
            "isDone": false,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
        })
    }

    #[tokio::test]
    async fn test_list_todos_page_passes_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models/Todo"))
            .and(query_param_is_missing("nextToken"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [record("t-1", "one")],
                "nextToken": "page-2",
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/models/Todo"))
            .and(query_param("nextToken", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [record("t-2", "two")],
                "nextToken": null,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = signed_in_client(&server);
        let first = client.list_todos_page(None).await.unwrap();
        assert_eq!(first.next_token.as_deref(), Some("page-2"));
        let second = client.list_todos_page(Some("page-2")).await.unwrap();
        assert_eq!(second.items[0].id, "t-2");
        assert!(second.next_token.is_none());
    }

    #[tokio::test]
    async fn test_update_todo_sends_partial_body() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/v1/models/Todo/t-1"))
            .and(body_json(serde_json::json!({"status": "DONE", "isDone": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(record("t-1", "one")))
            .expect(1)
            .mount(&server)
            .await;

        let body = TodoWrite {
            status: Some(TaskStatus::Done),
            is_done: Some(true),
            ..TodoWrite::default()
        };
        let updated = signed_in_client(&server).update_todo("t-1", &body).await.unwrap();
        assert_eq!(updated.id, "t-1");
    }

    #[tokio::test]
    async fn test_create_and_delete_todo() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/models/Todo"))
            .and(body_json(serde_json::json!({"title": "one", "status": "OPEN", "isDone": false})))
            .respond_with(ResponseTemplate::new(201).set_body_json(record("t-1", "one")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/v1/models/Todo/t-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(record("t-1", "one")))
            .expect(1)
            .mount(&server)
            .await;

        let client = signed_in_client(&server);
        let body = TodoWrite {
            title: Some("one".to_string()),
            status: Some(TaskStatus::Open),
            is_done: Some(false),
            ..TodoWrite::default()
        };
        let created = client.create_todo(&body).await.unwrap();
        assert_eq!(created.title.as_deref(), Some("one"));
        client.delete_todo("t-1").await.unwrap();
    }
}
