//! データ API との連携機能を提供する。
//!
//! 通知ジョブが必要とする読み書き操作を [`RecordStore`] トレイトに切り出し、
//! 本番実装として REST データ API を叩く [`DataApiClient`] を提供する。
//! クライアントは呼び出し側から注入する（プロセス共有のシングルトンは持たない）。

use chrono::NaiveDate;
use reqwest::StatusCode;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::config::StoreConfig;
use crate::model::{MealSlot, Menu, Notification, NotificationDraft, PlannedMeal, ShoppingList};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("data API request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("data API returned status {status} for {endpoint}")]
    Status { status: StatusCode, endpoint: String },
    #[error("failed to decode data API response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// 通知ジョブが必要とするストア操作。
///
/// 読み取りはその日の候補レコードの取得、書き込みは通知レコードの作成のみ。
/// エラーはリトライせず、呼び出し側へそのまま返す。空の結果はエラーではない。
pub trait RecordStore {
    /// 指定日に期日を迎える未完了の買い物リストを取得する。
    /// 期日は日付文字列の前方一致で照合される（時刻付きの期日を含めるため）。
    async fn shopping_lists_due(&self, date: NaiveDate) -> Result<Vec<ShoppingList>>;

    /// 指定日の献立レコードを取得する。
    async fn menus_on(&self, date: NaiveDate) -> Result<Vec<Menu>>;

    /// 指定した献立群に属する、指定枠の献立の品を取得する。
    async fn planned_meals(&self, menu_ids: &[String], slot: MealSlot)
    -> Result<Vec<PlannedMeal>>;

    /// 通知レコードを作成し、ID とタイムスタンプ込みのレコードを返す。
    async fn create_notification(&self, draft: &NotificationDraft) -> Result<Notification>;
}

/// REST データ API のクライアント。
pub struct DataApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DataApiClient {
    /// 設定からクライアントを作成する。
    pub fn new(config: &StoreConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &impl Serialize) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status,
                endpoint: path.to_string(),
            });
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Decode {
            endpoint: path.to_string(),
            source,
        })
    }
}

impl RecordStore for DataApiClient {
    async fn shopping_lists_due(&self, date: NaiveDate) -> Result<Vec<ShoppingList>> {
        // dueDatePrefix は期日文字列の前方一致。時刻付きの期日もその日として拾う
        let query = [
            ("dueDatePrefix", date.format("%Y-%m-%d").to_string()),
            ("isCompleted", "false".to_string()),
        ];
        self.get_json("shopping-lists", &query).await
    }

    async fn menus_on(&self, date: NaiveDate) -> Result<Vec<Menu>> {
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        self.get_json("menus", &query).await
    }

    async fn planned_meals(
        &self,
        menu_ids: &[String],
        slot: MealSlot,
    ) -> Result<Vec<PlannedMeal>> {
        let mut query: Vec<(&str, String)> = menu_ids
            .iter()
            .map(|id| ("parentMenuId", id.clone()))
            .collect();
        query.push(("mealSlot", slot.as_str().to_string()));
        self.get_json("planned-meals", &query).await
    }

    async fn create_notification(&self, draft: &NotificationDraft) -> Result<Notification> {
        self.post_json("notifications", draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn client_strips_trailing_slash() {
        let config = StoreConfig {
            base_url: "https://data.example.com/api/".to_string(),
            api_key: "key".to_string(),
            timeout: Duration::from_secs(5),
        };
        let client = DataApiClient::new(&config).unwrap();
        assert_eq!(client.base_url, "https://data.example.com/api");
    }
}
