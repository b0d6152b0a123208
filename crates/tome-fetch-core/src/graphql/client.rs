//! GraphQL client
//!
//! Thin request/response wrapper over reqwest. No retries and no caching;
//! the request timeout comes from [`ClientConfig`].

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::operations::{
    self, CategoriesData, CategoryPatch, GlobalMetadatasData, InputVariables, MetaInput,
    ServerSettingsData, SetGlobalMetaInput, SetSettingsInput, UpdateCategoriesInput,
};
use crate::backend::SettingsBackend;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::metadata::{parse_metadata, MetadataSettingUpdate};
use crate::types::{Category, IncludeOrExclude, MetadataDownloadSettings, ServerSettings};
use crate::writer::ServerSettingUpdate;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Request<'a, V> {
    query: &'a str,
    operation_name: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct Response<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<ResponseError>,
}

#[derive(Debug, Deserialize)]
struct ResponseError {
    message: String,
}

/// Client for the server's `/api/graphql` endpoint
#[derive(Clone, Debug)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
    credentials: Option<(String, Option<String>)>,
}

impl GraphQlClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: config.graphql_url(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute one operation and decode its `data` member
    pub async fn execute<V, T>(&self, operation_name: &str, query: &str, variables: V) -> Result<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        log::debug!("GraphQL {} -> {}", operation_name, self.endpoint);

        let mut request = self.http.post(&self.endpoint).json(&Request {
            query,
            operation_name,
            variables,
        });
        if let Some((user, pass)) = &self.credentials {
            request = request.basic_auth(user, pass.as_ref());
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                body,
            });
        }

        let response: Response<T> = serde_json::from_str(&body)?;
        if !response.errors.is_empty() {
            return Err(Error::GraphQl(
                response.errors.into_iter().map(|e| e.message).collect(),
            ));
        }

        response
            .data
            .ok_or_else(|| Error::GraphQl(vec![format!("{} returned no data", operation_name)]))
    }
}

#[async_trait]
impl SettingsBackend for GraphQlClient {
    async fn server_settings(&self) -> Result<ServerSettings> {
        let data: ServerSettingsData = self
            .execute(
                "GetServerSettings",
                &operations::get_server_settings(),
                serde_json::json!({}),
            )
            .await?;
        Ok(data.settings)
    }

    async fn metadata_settings(&self) -> Result<MetadataDownloadSettings> {
        let data: GlobalMetadatasData = self
            .execute(
                "GetGlobalMetadatas",
                operations::GET_GLOBAL_METADATAS,
                serde_json::json!({}),
            )
            .await?;
        Ok(parse_metadata(
            data.metas.nodes.into_iter().map(|m| (m.key, m.value)),
        ))
    }

    async fn categories(&self) -> Result<Vec<Category>> {
        let data: CategoriesData = self
            .execute(
                "GetCategoriesSettings",
                operations::GET_CATEGORIES_SETTINGS,
                serde_json::json!({}),
            )
            .await?;
        Ok(data.categories.nodes)
    }

    async fn update_server_setting(&self, update: &ServerSettingUpdate) -> Result<()> {
        let _: serde_json::Value = self
            .execute(
                "UpdateServerSettings",
                &operations::update_server_settings(),
                InputVariables {
                    input: SetSettingsInput {
                        settings: update.to_patch(),
                    },
                },
            )
            .await?;
        Ok(())
    }

    async fn update_metadata_setting(&self, update: &MetadataSettingUpdate) -> Result<()> {
        let key = update.key();
        let value = update.value();
        let _: serde_json::Value = self
            .execute(
                "SetGlobalMetadata",
                operations::SET_GLOBAL_METADATA,
                InputVariables {
                    input: SetGlobalMetaInput {
                        meta: MetaInput {
                            key: &key,
                            value: &value,
                        },
                    },
                },
            )
            .await?;
        Ok(())
    }

    async fn update_category_inclusion(
        &self,
        ids: &[i32],
        include: IncludeOrExclude,
    ) -> Result<()> {
        let _: serde_json::Value = self
            .execute(
                "UpdateCategories",
                operations::UPDATE_CATEGORIES,
                InputVariables {
                    input: UpdateCategoriesInput {
                        ids,
                        patch: CategoryPatch {
                            include_in_download: include,
                        },
                    },
                },
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UncertainAction;
    use mockito::Matcher;
    use serde_json::json;

    fn client_for(server: &mockito::ServerGuard) -> GraphQlClient {
        let config = ClientConfig {
            server_url: server.url(),
            ..Default::default()
        };
        GraphQlClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn server_settings_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/graphql")
            .match_body(Matcher::PartialJson(json!({ "operationName": "GetServerSettings" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"data":{"settings":{"downloadAsCbz":true,"downloadsPath":"/srv/manga",
                "autoDownloadNewChaptersLimit":4,"mangaFolderFormat":"",
                "useAnilist":true,"anilistDefaultUncertainAction":"use"}}}"#,
            )
            .create_async()
            .await;

        let settings = client_for(&server).server_settings().await.unwrap();
        assert!(settings.download_as_cbz);
        assert_eq!(settings.downloads_path, "/srv/manga");
        assert_eq!(settings.auto_download_new_chapters_limit, 4);
        assert_eq!(
            settings.anilist_default_uncertain_action,
            Some(UncertainAction::Use)
        );
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn graphql_errors_are_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/graphql")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":null,"errors":[{"message":"downloadsPath is not writable"}]}"#)
            .create_async()
            .await;

        let result = client_for(&server)
            .update_server_setting(&ServerSettingUpdate::DownloadsPath("/ro".into()))
            .await;
        match result {
            Err(Error::GraphQl(messages)) => {
                assert_eq!(messages, vec!["downloadsPath is not writable".to_string()])
            }
            other => panic!("expected GraphQL error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_failure_is_reported() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/graphql")
            .with_status(503)
            .with_body("starting up")
            .create_async()
            .await;

        let result = client_for(&server).categories().await;
        assert!(matches!(
            result,
            Err(Error::Http { status: 503, ref body }) if body == "starting up"
        ));
    }

    #[tokio::test]
    async fn update_sends_single_field_patch() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/graphql")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "UpdateServerSettings",
                "variables": { "input": { "settings": { "useAnilist": false } } }
            })))
            .with_status(200)
            .with_body(r#"{"data":{"setSettings":{"settings":{"useAnilist":false}}}}"#)
            .create_async()
            .await;

        client_for(&server)
            .update_server_setting(&ServerSettingUpdate::UseAnilist(false))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn metadata_settings_parsed_from_global_meta() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/graphql")
            .match_body(Matcher::PartialJson(json!({ "operationName": "GetGlobalMetadatas" })))
            .with_status(200)
            .with_body(
                r#"{"data":{"metas":{"nodes":[
                {"key":"webUI_downloadAheadLimit","value":"5"},
                {"key":"webUI_deleteChaptersWithBookmark","value":"true"},
                {"key":"webUI_themeMode","value":"dark"}]}}}"#,
            )
            .create_async()
            .await;

        let settings = client_for(&server).metadata_settings().await.unwrap();
        assert_eq!(settings.download_ahead_limit, 5);
        assert!(settings.delete_chapters_with_bookmark);
        assert!(!settings.delete_chapters_manually_marked_read);
    }

    #[tokio::test]
    async fn metadata_update_writes_prefixed_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/graphql")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "SetGlobalMetadata",
                "variables": { "input": { "meta": {
                    "key": "webUI_deleteChaptersWhileReading",
                    "value": "2"
                } } }
            })))
            .with_status(200)
            .with_body(r#"{"data":{"setGlobalMeta":{"meta":{"key":"webUI_deleteChaptersWhileReading","value":"2"}}}}"#)
            .create_async()
            .await;

        client_for(&server)
            .update_metadata_setting(&MetadataSettingUpdate::DeleteChaptersWhileReading(2))
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn category_inclusion_update() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/graphql")
            .match_body(Matcher::PartialJson(json!({
                "operationName": "UpdateCategories",
                "variables": { "input": {
                    "ids": [1, 4],
                    "patch": { "includeInDownload": "EXCLUDE" }
                } }
            })))
            .with_status(200)
            .with_body(r#"{"data":{"updateCategories":{"categories":[]}}}"#)
            .create_async()
            .await;

        client_for(&server)
            .update_category_inclusion(&[1, 4], IncludeOrExclude::Exclude)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn basic_auth_is_sent() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/graphql")
            .match_header("authorization", "Basic dXNlcjpwYXNz")
            .with_status(200)
            .with_body(r#"{"data":{"categories":{"nodes":[]}}}"#)
            .create_async()
            .await;

        let config = ClientConfig {
            server_url: server.url(),
            username: Some("user".into()),
            password: Some("pass".into()),
            ..Default::default()
        };
        let categories = GraphQlClient::new(&config)
            .unwrap()
            .categories()
            .await
            .unwrap();
        assert!(categories.is_empty());
        mock.assert_async().await;
    }
}
