//! 通知バッチジョブ本体。
//!
//! どちらのジョブも「今日の候補レコードを取得 → 所有者ごとにまとめる →
//! 文面を組み立てる → 所有者ごとに通知を 1 件作成する」という 1 パスの処理。
//! 書き込みは所有者ごとに独立させ、1 件の失敗が他の所有者の通知を
//! 失わせないようにする。失敗は件数としてサマリに載せる。
//!
//! 実行が途中で強制終了されて再実行された場合、同じ日の通知が重複し得る
//! （書き込みに重複排除キーはない）。これは既知の挙動で、排除はストア側の
//! 一意制約の導入待ち。

use std::collections::{HashMap, HashSet};

use anyhow::{Context as _, Result};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::model::{
    HasOwner, MealSlot, NotificationCategory, NotificationDraft, PlannedMeal, ShoppingList,
};
use crate::store::RecordStore;

use super::date::today_jst;
use super::event::{JobEvent, JobResponse};
use super::format::{menu_message, shopping_message};
use super::group::group_by_owner;

/// 買い物リマインダーの有効期限。週の後半に対応されることもあるため長め
const SHOPPING_TTL_DAYS: i64 = 7;
/// 献立リマインダーの有効期限。当日の食事時間帯を過ぎたら意味がない
const MENU_TTL_HOURS: i64 = 6;

/// 1 回のジョブ実行のサマリ。レスポンス本文として JSON 化される。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub job: NotificationCategory,
    pub date: String,
    /// 通知対象となった所有者の数
    pub owners: usize,
    pub created: usize,
    pub failed: usize,
}

impl JobSummary {
    fn empty(job: NotificationCategory, date: NaiveDate) -> Self {
        Self {
            job,
            date: date.to_string(),
            owners: 0,
            created: 0,
            failed: 0,
        }
    }

    fn into_response(self) -> JobResponse {
        if self.owners > 0 && self.created == 0 {
            return JobResponse {
                status_code: 500,
                body: serde_json::json!({
                    "error": "all notification writes failed",
                    "failed": self.failed,
                })
                .to_string(),
            };
        }
        match serde_json::to_string(&self) {
            Ok(body) => JobResponse::ok(body),
            Err(e) => JobResponse::error(&format!("failed to serialize job summary: {e}")),
        }
    }
}

/// イベントに対応するジョブを実行し、結果をレスポンスに変換する。
///
/// 失敗はすべてここで 500 レスポンスに畳み込まれ、呼び出し側へ伝播しない。
pub async fn execute<S: RecordStore>(event: &JobEvent, store: &S) -> JobResponse {
    let result = match event {
        JobEvent::ShoppingList => run_shopping_job(store).await,
        JobEvent::Menu {
            meal_type,
            trigger_time,
        } => {
            if let Some(time) = trigger_time {
                info!(trigger_time = %time, slot = meal_type.as_str(), "Menu job triggered");
            }
            run_menu_job(store, *meal_type).await
        }
    };

    match result {
        Ok(summary) => {
            info!(
                created = summary.created,
                failed = summary.failed,
                "Notification job finished"
            );
            summary.into_response()
        }
        Err(e) => {
            error!(error = %format!("{e:#}"), "Notification job failed");
            JobResponse::error(&format!("{e:#}"))
        }
    }
}

/// 今日が期日の未完了買い物リストについて、所有者ごとにリマインダーを作成する。
///
/// 該当リストが 1 件もない所有者には何も送らない（献立ジョブとは非対称）。
async fn run_shopping_job<S: RecordStore>(store: &S) -> Result<JobSummary> {
    let date = today_jst();
    let lists = store
        .shopping_lists_due(date)
        .await
        .context("Failed to fetch due shopping lists")?;
    info!(date = %date, count = lists.len(), "Fetched due shopping lists");

    let groups = group_by_owner(lists);
    let now = Utc::now();
    let owners = groups.len();

    let drafts: Vec<NotificationDraft> = groups
        .into_iter()
        .map(|(owner_id, lists)| shopping_draft(now, &owner_id, &lists))
        .collect();

    let (created, failed) = write_notifications(store, drafts).await;
    Ok(JobSummary {
        job: NotificationCategory::ShoppingList,
        date: date.to_string(),
        owners,
        created,
        failed,
    })
}

/// 今日の献立について、指定枠のリマインダーを所有者ごとに作成する。
///
/// 今日の献立レコードを持つ所有者は、枠に品がなくても対象になる
/// （設定を促す文面になる）。献立レコード自体がない所有者には何も送らない。
async fn run_menu_job<S: RecordStore>(store: &S, slot: MealSlot) -> Result<JobSummary> {
    let date = today_jst();
    let menus = store
        .menus_on(date)
        .await
        .context("Failed to fetch today's menus")?;
    info!(date = %date, count = menus.len(), slot = slot.as_str(), "Fetched today's menus");

    if menus.is_empty() {
        return Ok(JobSummary::empty(NotificationCategory::Menu, date));
    }

    let menu_ids: Vec<String> = menus.iter().map(|m| m.id.clone()).collect();
    let meals = store
        .planned_meals(&menu_ids, slot)
        .await
        .context("Failed to fetch planned meals")?;

    // 品の所有者が未設定なら親の献立レコードから継承する
    let owner_by_menu: HashMap<&str, &str> = menus
        .iter()
        .map(|m| (m.id.as_str(), m.owner_id.as_str()))
        .collect();
    let mut owned = Vec::with_capacity(meals.len());
    for meal in meals {
        let owner = meal.owner_id.clone().or_else(|| {
            owner_by_menu
                .get(meal.parent_menu_id.as_str())
                .map(|o| (*o).to_string())
        });
        match owner {
            Some(owner_id) => owned.push(OwnedMeal { owner_id, meal }),
            None => {
                warn!(meal_id = %meal.id, menu_id = %meal.parent_menu_id, "Skipping meal without a resolvable owner");
            }
        }
    }

    let mut groups = group_by_owner(owned);

    // 献立はあるがこの枠に品がない所有者にも、設定を促す通知を送る
    let mut seen: HashSet<String> = groups.iter().map(|(owner, _)| owner.clone()).collect();
    for menu in &menus {
        if seen.insert(menu.owner_id.clone()) {
            groups.push((menu.owner_id.clone(), Vec::new()));
        }
    }

    let now = Utc::now();
    let owners = groups.len();
    let drafts: Vec<NotificationDraft> = groups
        .into_iter()
        .map(|(owner_id, group)| {
            let meals: Vec<PlannedMeal> = group.into_iter().map(|m| m.meal).collect();
            menu_draft(now, slot, &owner_id, &meals)
        })
        .collect();

    let (created, failed) = write_notifications(store, drafts).await;
    Ok(JobSummary {
        job: NotificationCategory::Menu,
        date: date.to_string(),
        owners,
        created,
        failed,
    })
}

/// 所有者を解決済みの献立の品。
struct OwnedMeal {
    owner_id: String,
    meal: PlannedMeal,
}

impl HasOwner for OwnedMeal {
    fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

fn shopping_draft(
    now: DateTime<Utc>,
    owner_id: &str,
    lists: &[ShoppingList],
) -> NotificationDraft {
    NotificationDraft {
        message: shopping_message(lists),
        category: NotificationCategory::ShoppingList,
        is_read: false,
        related_record_id: lists.first().map(|l| l.id.clone()),
        navigate_target: NotificationCategory::ShoppingList
            .navigate_target()
            .to_string(),
        expires_at: now + Duration::days(SHOPPING_TTL_DAYS),
        owner_id: owner_id.to_string(),
    }
}

fn menu_draft(
    now: DateTime<Utc>,
    slot: MealSlot,
    owner_id: &str,
    meals: &[PlannedMeal],
) -> NotificationDraft {
    NotificationDraft {
        message: menu_message(slot, meals),
        category: NotificationCategory::Menu,
        is_read: false,
        related_record_id: meals.first().map(|m| m.id.clone()),
        navigate_target: NotificationCategory::Menu.navigate_target().to_string(),
        expires_at: now + Duration::hours(MENU_TTL_HOURS),
        owner_id: owner_id.to_string(),
    }
}

/// 通知を所有者ごとに順番に書き込む。失敗してもループは続行し、件数で報告する。
async fn write_notifications<S: RecordStore>(
    store: &S,
    drafts: Vec<NotificationDraft>,
) -> (usize, usize) {
    let mut created = 0;
    let mut failed = 0;

    for draft in drafts {
        match store.create_notification(&draft).await {
            Ok(notification) => {
                info!(owner = %draft.owner_id, id = %notification.id, "Notification created");
                created += 1;
            }
            Err(e) => {
                error!(owner = %draft.owner_id, error = %e, "Failed to create notification");
                failed += 1;
            }
        }
    }

    (created, failed)
}
