//! 連続メモリ領域用のアロケータ.
//!
//! アロケータは、固定長の連続したアドレス空間を（仮想的に）受け取り、
//! 個々のプロセスに対して、その中から必要なサイズのパーティションを割り当てる責務を負っている.
//!
//! アロケータが担当するのは領域の計算処理のみであり、
//! 実際のデータの読み書き等を、この中で行うことは無い.
//!
//! # 割当戦略
//!
//! このアロケータは"BestFit"・"WorstFit"・"NextFit"の三つの戦略を採用している.
//!
//! いずれの戦略も、パーティションテーブルを探索して要求サイズを満たす
//! 空きパーティションを一つ選択し、その先頭から要求サイズ分だけの割当を行う.
//! もしまだ余剰分がある場合には、残りは空きパーティションとしてテーブルに戻される.
//! 複数のホールにまたがる部分割当が行われることは無い.
//!
//! 選択の基準は戦略毎に異なる:
//!
//! - **BestFit**: 要求サイズを満たすものの中で長さが最小の空きパーティション
//! - **WorstFit**: 要求サイズを満たすものの中で長さが最大の空きパーティション
//! - **NextFit**: 前回の割当位置を指すカーソルから巡回的に探索し、最初に見つかったもの
pub use self::address::Address;
pub use self::builder::AllocatorBuilder;
pub use self::partition::Partition;
pub use self::table::PartitionTable;

mod address;
mod builder;
mod index;
mod partition;
mod table;

use std::cmp;

use self::index::AllocationIndex;
use crate::metrics::AllocatorMetrics;
use crate::process::ProcessId;
use crate::{ErrorKind, Result};

/// 空きパーティションの配置戦略.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// 要求サイズを満たす空きパーティションの中で、長さが最小のものを選択する.
    ///
    /// 同じ長さの候補が複数ある場合には、テーブル内で先に現れるものが選択される.
    BestFit,

    /// 要求サイズを満たす空きパーティションの中で、長さが最大のものを選択する.
    ///
    /// 同じ長さの候補が複数ある場合には、テーブル内で先に現れるものが選択される.
    WorstFit,

    /// カーソル位置から巡回的に探索し、最初に見つかった十分な長さの空きパーティションを選択する.
    ///
    /// カーソルはアロケータインスタンスの状態として呼び出しを跨いで維持される.
    /// 巡回は「テーブル内の位置」を基準に行われ、「アドレス順」ではない点に注意
    /// （テーブルの内部順序は挿入順であり、アドレス順とは限らないため）.
    NextFit,
}

/// 連続メモリ領域のパーティションアロケータ.
///
/// 区間`[0, capacity)`のアドレス空間を、互いに重なり合わないパーティション群の列として管理する.
/// 生成直後は、空間全体が一つの空きパーティションとなっている.
///
/// 全ての公開操作はアトミックであり、失敗した操作（重複割当・空き不足・未知のプロセスの解放）は
/// テーブルの状態を一切変更しない.
///
/// この実装自体は、完全にメモリ上のデータ構造であり、状態は永続化されない.
#[derive(Debug)]
pub struct MemoryAllocator {
    capacity: u64,
    table: PartitionTable,
    index: AllocationIndex,
    next_fit_cursor: usize,
    metrics: AllocatorMetrics,
}
impl MemoryAllocator {
    /// デフォルト設定でアロケータを生成する.
    ///
    /// `AllocatorBuilder::new().create(capacity)`と等価.
    ///
    /// # Errors
    ///
    /// `capacity`が0の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    pub fn create(capacity: u64) -> Result<MemoryAllocator> {
        track!(AllocatorBuilder::new().create(capacity))
    }

    pub(crate) fn with_metrics(capacity: u64, metrics: AllocatorMetrics) -> Self {
        MemoryAllocator {
            capacity,
            table: PartitionTable::new(capacity),
            index: AllocationIndex::new(),
            next_fit_cursor: 0,
            metrics,
        }
    }

    /// アドレス空間全体の容量を返す.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// アロケータ用のメトリクスを返す.
    pub fn metrics(&self) -> &AllocatorMetrics {
        &self.metrics
    }

    /// 現在パーティションを占有しているプロセスのID一覧を返す.
    ///
    /// 結果は昇順にソートされている.
    pub fn processes(&self) -> Vec<ProcessId> {
        self.index.list()
    }

    /// `strategy`に従って、`process`に`size`分のパーティションの割当を行う.
    ///
    /// 成功時には割り当てられたサイズ(= `size`)が返される.
    ///
    /// # Errors
    ///
    /// - `size`が0の場合: `ErrorKind::InvalidInput`
    /// - `process`が既にパーティションを占有している場合: `ErrorKind::DuplicateAllocation`
    /// - 要求サイズを満たす空きパーティションが無い場合: `ErrorKind::NoSuitablePartition`
    ///
    /// いずれの場合にもテーブルは変更されない.
    pub fn allocate(&mut self, strategy: Strategy, process: ProcessId, size: u64) -> Result<u64> {
        track_assert!(
            size > 0,
            ErrorKind::InvalidInput,
            "Zero-sized allocation: process={}",
            process
        );
        if self.index.contains(&process) {
            self.metrics.duplicate_failures.increment();
            track_panic!(
                ErrorKind::DuplicateAllocation,
                "process={}, size={}",
                process,
                size
            );
        }
        let position = match strategy {
            Strategy::BestFit => self.find_best_fit(size),
            Strategy::WorstFit => self.find_worst_fit(size),
            Strategy::NextFit => self.find_next_fit(size),
        };
        if let Some(position) = position {
            let base = self.table.allocate_at(position, process.clone(), size);
            self.index.insert(process, base);
            if let Strategy::NextFit = strategy {
                // 次回の探索は今回の割当位置（の直後に残ったホール）から始まる
                self.next_fit_cursor = position;
            }
            self.metrics.count_allocation(size);
            Ok(size)
        } else {
            self.metrics.nospace_failures.increment();
            track_panic!(
                ErrorKind::NoSuitablePartition,
                "process={}, size={}",
                process,
                size
            );
        }
    }

    /// `process`が占有しているパーティションの解放を行う.
    ///
    /// 解放されたパーティションは空き状態に戻り、隣接する空きパーティション群と
    /// 一つにマージされる. 成功時には解放されたサイズが返される.
    ///
    /// # Errors
    ///
    /// `process`がパーティションを占有していない場合には、
    /// 種類が`ErrorKind::UnknownProcess`のエラーが返され、テーブルは変更されない.
    pub fn release(&mut self, process: &ProcessId) -> Result<u64> {
        let base = if let Some(base) = self.index.get(process) {
            base
        } else {
            self.metrics.unknown_process_failures.increment();
            track_panic!(ErrorKind::UnknownProcess, "process={}", process);
        };
        let position = track_assert_some!(
            self.table.position_by_base(base),
            ErrorKind::InconsistentState,
            "process={}, base={:?}",
            process,
            base
        );
        self.index.remove(process);
        let size = self.table.release_at(position);
        self.table.coalesce();
        // マージでテーブルが縮んだ場合に備えて、カーソルを範囲内に戻す
        self.next_fit_cursor = cmp::min(self.next_fit_cursor, self.table.len() - 1);
        self.metrics.count_release(size);
        Ok(size)
    }

    /// パーティション群を開始位置の昇順に整列したスナップショットを返す.
    ///
    /// 読み取り専用の操作であり、テーブルの内部順序（従ってNextFitの探索順）には影響しない.
    pub fn snapshot(&self) -> Vec<Partition> {
        let mut partitions = self.table.iter().cloned().collect::<Vec<_>>();
        partitions.sort_by_key(Partition::base);
        partitions
    }

    /// 空き領域の集計統計を返す.
    pub fn stats(&self) -> AllocatorStats {
        let mut hole_count = 0;
        let mut total_free = 0;
        for partition in self.table.iter().filter(|p| p.is_free()) {
            hole_count += 1;
            total_free += partition.len();
        }
        let average_hole_size = if hole_count > 0 {
            total_free as f64 / hole_count as f64
        } else {
            0.0
        };
        AllocatorStats {
            hole_count,
            total_free,
            average_hole_size,
            percent_free: total_free as f64 / self.capacity as f64 * 100.0,
        }
    }

    fn find_best_fit(&self, size: u64) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, partition) in self.table.iter().enumerate() {
            if !partition.is_free() || partition.len() < size {
                continue;
            }
            // 比較は厳密な大小のみ: 同じ長さならテーブル内で先に現れる方が勝つ
            if best.map_or(true, |b| partition.len() < self.table.get(b).len()) {
                best = Some(i);
            }
        }
        best
    }

    fn find_worst_fit(&self, size: u64) -> Option<usize> {
        let mut worst: Option<usize> = None;
        for (i, partition) in self.table.iter().enumerate() {
            if !partition.is_free() || partition.len() < size {
                continue;
            }
            if worst.map_or(true, |w| partition.len() > self.table.get(w).len()) {
                worst = Some(i);
            }
        }
        worst
    }

    // カーソル位置から「テーブル内の位置」基準で巡回探索を行い、最大で一周だけ走査する.
    // 失敗時にはカーソルは変更されない.
    fn find_next_fit(&self, size: u64) -> Option<usize> {
        let len = self.table.len();
        let start = self.next_fit_cursor;
        debug_assert!(start < len);
        let mut position = start;
        loop {
            let partition = self.table.get(position);
            if partition.is_free() && partition.len() >= size {
                return Some(position);
            }
            position = (position + 1) % len;
            if position == start {
                return None;
            }
        }
    }
}

/// 空き領域の集計統計.
///
/// `MemoryAllocator::stats`によって、パーティションテーブルから導出される読み取り専用の値.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocatorStats {
    /// ホール（空きパーティション）の数.
    pub hole_count: usize,

    /// 空き領域の合計サイズ.
    pub total_free: u64,

    /// ホールの平均サイズ.
    ///
    /// `hole_count`が0の場合には0となる.
    pub average_hole_size: f64,

    /// 全容量に占める空き領域の割合（パーセント）.
    pub percent_free: f64,
}
