//! 献立・買い物リストのリマインダー通知を生成するバッチ処理。
//!
//! 外部スケジューラから渡されたイベントに応じて、当日 (JST) の
//! 候補レコードを読み取り、所有者ごとに 1 件ずつ通知を書き込む。

mod date;
mod event;
mod format;
mod group;
mod job;

pub use date::today_jst;
pub use event::{JobEvent, JobResponse};
pub use job::{JobSummary, execute};
