//! 割当済みプロセス群の情報を管理するためのインデックス.
use std::collections::BTreeMap;

use crate::allocator::Address;
use crate::process::ProcessId;

/// プロセスIDから、そのプロセスが占有しているパーティションの開始位置へのマッピング.
///
/// パーティションそのものへの参照ではなく、ルックアップ用のキー（開始位置）を
/// 保持している点に注意. テーブル側の挿入・削除・整列によってパーティションの
/// 位置が移動しても、エントリが無効化されることはない.
///
/// 「各プロセスは高々一つのパーティションしか占有できない」という不変条件は、
/// このインデックスによって強制される.
#[derive(Debug, Clone, Default)]
pub struct AllocationIndex {
    map: BTreeMap<ProcessId, Address>,
}
impl AllocationIndex {
    /// 新しい`AllocationIndex`インスタンスを生成する.
    pub(crate) fn new() -> Self {
        AllocationIndex {
            map: BTreeMap::new(),
        }
    }

    /// 指定されたプロセスの割当先の開始位置を検索する.
    pub(crate) fn get(&self, process: &ProcessId) -> Option<Address> {
        self.map.get(process).cloned()
    }

    /// 指定されたプロセスが登録済みかどうかを判定する.
    pub(crate) fn contains(&self, process: &ProcessId) -> bool {
        self.map.contains_key(process)
    }

    /// 新規割当を登録する.
    pub(crate) fn insert(&mut self, process: ProcessId, base: Address) {
        self.map.insert(process, base);
    }

    /// 割当の登録を削除する.
    pub(crate) fn remove(&mut self, process: &ProcessId) {
        self.map.remove(process);
    }

    /// 登録されているプロセスのID一覧を返す.
    ///
    /// 結果は昇順にソートされている.
    pub(crate) fn list(&self) -> Vec<ProcessId> {
        self.map.keys().cloned().collect()
    }
}
