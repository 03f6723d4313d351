//! 候補レコードを所有者ごとにまとめる。

use std::collections::HashMap;

use crate::model::HasOwner;

/// レコードを所有者 ID ごとのグループに分割する。
///
/// グループは所有者の初出順に並び、グループ内のレコードは入力の相対順序を保つ。
/// ただしストア側の読み取り順には保証がないため、呼び出し側はこの並びに
/// 意味を持たせてはならない。
pub fn group_by_owner<R: HasOwner>(records: Vec<R>) -> Vec<(String, Vec<R>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<R>)> = Vec::new();

    for record in records {
        match index.get(record.owner_id()).copied() {
            Some(i) => groups[i].1.push(record),
            None => {
                let owner = record.owner_id().to_string();
                index.insert(owner.clone(), groups.len());
                groups.push((owner, vec![record]));
            }
        }
    }

    groups
}
