//! 通知メッセージの文面を組み立てる。
//!
//! 文面はアプリの既存仕様そのまま。買い物リストは全件を列挙するが、
//! 献立は先頭 2 品 + 「他N品」に切り詰める非対称な仕様になっている。
//! 欠けている値はフォールバックで埋めるため、失敗することはない。

use crate::model::{MealSlot, PlannedMeal, ShoppingList};

/// 買い物リストのリマインダー文面を生成する。
///
/// 空のグループに対しては呼ばれない（リストが 1 件もない日は通知自体を送らない）。
pub fn shopping_message(lists: &[ShoppingList]) -> String {
    match lists {
        [single] => format!("今日は「{}」の買い物予定があります！", single.title),
        _ => {
            let titles: Vec<&str> = lists.iter().map(|l| l.title.as_str()).collect();
            format!(
                "今日は {} 件の買い物予定があります：{}",
                lists.len(),
                titles.join("、")
            )
        }
    }
}

/// 献立リマインダーの文面を生成する。
///
/// 品が 1 つもない場合は献立の設定を促す文面になる。
pub fn menu_message(slot: MealSlot, meals: &[PlannedMeal]) -> String {
    match meals {
        [] => format!(
            "{}の献立が設定されていません。献立を設定しませんか？",
            slot.label()
        ),
        [single] => {
            let suffix = match &single.note {
                Some(note) => format!(" ({note})"),
                None => String::new(),
            };
            format!(
                "{}の時間です！今日は「{}」{}の予定です。",
                slot.label(),
                single.display_label(),
                suffix
            )
        }
        _ => {
            let labels: Vec<&str> = meals.iter().take(2).map(|m| m.display_label()).collect();
            // ちょうど 2 品のときは「他0品」を付けない
            let suffix = if meals.len() > 2 {
                format!("他{}品", meals.len() - 2)
            } else {
                String::new()
            };
            format!(
                "{}の時間です！今日は「{}」{}の予定です。",
                slot.label(),
                labels.join("、"),
                suffix
            )
        }
    }
}
