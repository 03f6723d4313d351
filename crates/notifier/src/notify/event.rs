//! ジョブの起動イベントと実行結果の型。

use serde::{Deserialize, Serialize};

use crate::model::MealSlot;

/// スケジューラから渡される起動イベント。
///
/// `notificationType` で分岐する。未知のフィールドは無視する。
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "notificationType")]
pub enum JobEvent {
    #[serde(rename = "shopping-list")]
    ShoppingList,
    #[serde(rename = "menu", rename_all = "camelCase")]
    Menu {
        meal_type: MealSlot,
        /// JST のトリガー時刻 ("07:00" など)。ログにしか使わない
        #[serde(default)]
        trigger_time: Option<String>,
    },
}

/// ジョブの実行結果。スケジューラ向けに JSON で出力される。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResponse {
    pub status_code: u16,
    /// 結果サマリまたはエラー内容の JSON 文字列
    pub body: String,
}

impl JobResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status_code: 200,
            body,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            status_code: 500,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_shopping_event() {
        let event: JobEvent = serde_json::from_str(r#"{"notificationType":"shopping-list"}"#)
            .expect("Failed to parse shopping event");
        assert!(matches!(event, JobEvent::ShoppingList));
    }

    #[test]
    fn shopping_event_ignores_extra_fields() {
        let json = r#"{"notificationType":"shopping-list","source":"cron"}"#;
        let event: JobEvent = serde_json::from_str(json).unwrap();
        assert!(matches!(event, JobEvent::ShoppingList));
    }

    #[test]
    fn parses_menu_event() {
        let json = r#"{"notificationType":"menu","triggerTime":"07:00","mealType":"breakfast"}"#;
        let event: JobEvent = serde_json::from_str(json).unwrap();
        match event {
            JobEvent::Menu {
                meal_type,
                trigger_time,
            } => {
                assert_eq!(meal_type, MealSlot::Breakfast);
                assert_eq!(trigger_time.as_deref(), Some("07:00"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn menu_event_requires_meal_type() {
        let json = r#"{"notificationType":"menu"}"#;
        assert!(serde_json::from_str::<JobEvent>(json).is_err());
    }

    #[test]
    fn error_response_carries_message() {
        let response = JobResponse::error("store unavailable");
        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("store unavailable"));
    }

    #[test]
    fn response_serializes_camel_case() {
        let response = JobResponse::ok("{}".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
    }
}
