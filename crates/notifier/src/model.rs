//! 外部データストアとやり取りするレコード型。
//!
//! フィールド名はデータ API の camelCase JSON に合わせてマッピングする。
//! 献立・買い物リストは読み取り専用で、通知レコードのみをこのジョブが作成する。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 食事の枠（朝食・昼食・夕食）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealSlot {
    /// 通知メッセージに使う日本語ラベルを返す。
    pub fn label(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "朝食",
            MealSlot::Lunch => "昼食",
            MealSlot::Dinner => "夕食",
        }
    }

    /// データ API のクエリパラメータに使う値を返す。
    pub fn as_str(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        }
    }
}

/// 1 ユーザー・1 日分の献立の親レコード。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub id: String,
    /// 献立の日付 (YYYY-MM-DD 形式)
    pub date: String,
    pub owner_id: String,
}

/// 献立に登録された 1 品。
///
/// `owner_id` が未設定の場合、実効的な所有者は親の献立レコードから継承する。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMeal {
    pub id: String,
    pub parent_menu_id: String,
    pub meal_slot: MealSlot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipe_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
}

impl PlannedMeal {
    /// メッセージ表示用のラベルを返す。名前がない場合は「献立」にフォールバックする。
    pub fn display_label(&self) -> &str {
        self.recipe_label.as_deref().unwrap_or("献立")
    }
}

/// 買い物リストのレコード。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    pub id: String,
    pub title: String,
    /// 期日。日付のみ、または時刻付き (例: `2024-01-15T09:00:00Z`)
    pub due_date: String,
    pub is_completed: bool,
    pub owner_id: String,
}

/// 通知の分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationCategory {
    #[serde(rename = "menu")]
    Menu,
    #[serde(rename = "shopping-list")]
    ShoppingList,
}

impl NotificationCategory {
    /// 通知タップ時の遷移先ルートを返す。
    pub fn navigate_target(self) -> &'static str {
        match self {
            NotificationCategory::Menu => "/menu",
            NotificationCategory::ShoppingList => "/shopping",
        }
    }
}

/// 作成リクエストに載せる通知レコードの内容。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDraft {
    pub message: String,
    pub category: NotificationCategory,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_record_id: Option<String>,
    pub navigate_target: String,
    pub expires_at: DateTime<Utc>,
    pub owner_id: String,
}

/// ストアが作成して返す通知レコード。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub category: NotificationCategory,
    pub is_read: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_record_id: Option<String>,
    pub navigate_target: String,
    pub expires_at: DateTime<Utc>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 所有者 ID を持つレコード。グルーピングのキーに使う。
pub trait HasOwner {
    fn owner_id(&self) -> &str;
}

impl HasOwner for ShoppingList {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

impl HasOwner for Menu {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_slot_labels() {
        assert_eq!(MealSlot::Breakfast.label(), "朝食");
        assert_eq!(MealSlot::Lunch.label(), "昼食");
        assert_eq!(MealSlot::Dinner.label(), "夕食");
    }

    #[test]
    fn meal_slot_deserializes_from_lowercase() {
        let slot: MealSlot = serde_json::from_str(r#""breakfast""#).unwrap();
        assert_eq!(slot, MealSlot::Breakfast);
    }

    #[test]
    fn planned_meal_label_falls_back() {
        let meal = PlannedMeal {
            id: "meal-1".to_string(),
            parent_menu_id: "menu-1".to_string(),
            meal_slot: MealSlot::Dinner,
            recipe_label: None,
            note: None,
            owner_id: None,
        };
        assert_eq!(meal.display_label(), "献立");
    }

    #[test]
    fn shopping_list_parses_camel_case() {
        let json = r#"{
            "id": "list-1",
            "title": "週末の買い出し",
            "dueDate": "2024-01-15T09:00:00Z",
            "isCompleted": false,
            "ownerId": "user-123"
        }"#;
        let list: ShoppingList = serde_json::from_str(json).unwrap();
        assert_eq!(list.title, "週末の買い出し");
        assert!(!list.is_completed);
        assert_eq!(list.owner_id, "user-123");
    }

    #[test]
    fn notification_draft_serializes_camel_case() {
        let draft = NotificationDraft {
            message: "test".to_string(),
            category: NotificationCategory::ShoppingList,
            is_read: false,
            related_record_id: Some("list-1".to_string()),
            navigate_target: "/shopping".to_string(),
            expires_at: "2024-01-22T07:00:00Z".parse().unwrap(),
            owner_id: "user-123".to_string(),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["category"], "shopping-list");
        assert_eq!(json["isRead"], false);
        assert_eq!(json["relatedRecordId"], "list-1");
        assert_eq!(json["navigateTarget"], "/shopping");
    }

    #[test]
    fn draft_omits_missing_related_record() {
        let draft = NotificationDraft {
            message: "test".to_string(),
            category: NotificationCategory::Menu,
            is_read: false,
            related_record_id: None,
            navigate_target: "/menu".to_string(),
            expires_at: "2024-01-15T13:00:00Z".parse().unwrap(),
            owner_id: "user-123".to_string(),
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("relatedRecordId").is_none());
    }
}
