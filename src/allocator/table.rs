//! パーティションテーブル.

use crate::allocator::partition::Partition;
use crate::allocator::Address;
use crate::process::ProcessId;

/// アドレス空間全体を過不足なく敷き詰める`Partition`群を保持するテーブル.
///
/// 公開操作の前後で、以下の不変条件が常に成立する:
///
/// - `base`の昇順に並べたとき、パーティション群は区間`[0, capacity)`を
///   隙間も重なりもなく敷き詰める
/// - 長さ0のパーティションは存在しない
/// - （`coalesce`後）隣接する二つのパーティションが共に空き、ということはない
///
/// 内部の並び順は挿入順であり、`base`順であるとは限らない.
/// 隣接関係に依存する操作（`coalesce`等）の前には`order`による整列が必要となる.
#[derive(Debug, Clone)]
pub struct PartitionTable {
    partitions: Vec<Partition>,
}
#[allow(clippy::len_without_is_empty)]
impl PartitionTable {
    /// 区間`[0, capacity)`全体を一つの空きパーティションとして保持するテーブルを生成する.
    pub(crate) fn new(capacity: u64) -> Self {
        debug_assert!(capacity > 0);
        PartitionTable {
            partitions: vec![Partition::hole(Address::from(0), capacity)],
        }
    }

    /// テーブル内のパーティション数を返す.
    ///
    /// 不変条件より、テーブルが空になることはない（常に`1`以上）.
    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    /// `index`位置のパーティションへの参照を返す.
    pub(crate) fn get(&self, index: usize) -> &Partition {
        &self.partitions[index]
    }

    /// テーブル内のパーティション群を、現在の並び順で走査するイテレータを返す.
    pub fn iter(&self) -> impl Iterator<Item = &Partition> {
        self.partitions.iter()
    }

    /// パーティション群を`base`の昇順に整列する.
    ///
    /// 安定ソートなので、この操作は冪等（二回適用しても結果は変わらない）.
    pub(crate) fn order(&mut self) {
        self.partitions.sort_by_key(Partition::base);
    }

    /// `index`位置の空きパーティションの先頭から`size`分を`owner`に割り当てる.
    ///
    /// 割当済みパーティションは元の位置`index`に挿入され、
    /// 残りの空き領域は開始位置を進めた上で直後の位置に残る.
    /// 残りの長さがちょうど0になる場合には、空きパーティションは破棄される
    /// （長さ0のパーティションは保持しない）.
    ///
    /// 割り当てられたパーティションの開始位置を返す.
    pub(crate) fn allocate_at(&mut self, index: usize, owner: ProcessId, size: u64) -> Address {
        let allocated = self.partitions[index].carve(owner, size);
        let base = allocated.base();
        if self.partitions[index].len() == 0 {
            self.partitions[index] = allocated;
        } else {
            self.partitions.insert(index, allocated);
        }
        base
    }

    /// `index`位置の割当済みパーティションを空き状態に戻し、そのサイズを返す.
    ///
    /// 隣接ホールとのマージは行わない. 呼び出し側が別途`coalesce`を呼び出す必要がある.
    pub(crate) fn release_at(&mut self, index: usize) -> u64 {
        self.partitions[index].release()
    }

    /// `base`を開始位置とするパーティションの、テーブル内の現在位置を返す.
    pub(crate) fn position_by_base(&self, base: Address) -> Option<usize> {
        self.partitions.iter().position(|p| p.base() == base)
    }

    /// 隣接する空きパーティション群をマージする.
    ///
    /// 整列後に左から右に走査し、各空きパーティションについて、
    /// 直後に続く「空き、かつ開始位置が走査中の終端と一致する」パーティションを
    /// すべて吸収して一つにまとめる. 空きでない・隣接していないパーティションに
    /// 出会った時点で、そのマージ連鎖は終了する.
    ///
    /// この操作によって「隣接する空きパーティションは存在しない」という
    /// 不変条件が回復される.
    pub(crate) fn coalesce(&mut self) {
        self.order();
        let mut i = 0;
        while i < self.partitions.len() {
            if self.partitions[i].is_free() {
                while i + 1 < self.partitions.len() {
                    let next = &self.partitions[i + 1];
                    if next.is_free() && next.base() == self.partitions[i].end() {
                        let absorbed = self.partitions.remove(i + 1);
                        self.partitions[i].grow(absorbed.len());
                    } else {
                        break;
                    }
                }
            }
            i += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::Address;
    use crate::process::ProcessId;

    fn pid(id: &str) -> ProcessId {
        ProcessId::new(id)
    }

    // 不変条件: base昇順でアドレス空間全体を過不足なく敷き詰めていること
    fn assert_tiling(table: &PartitionTable, capacity: u64) {
        let mut partitions = table.iter().cloned().collect::<Vec<_>>();
        partitions.sort_by_key(Partition::base);
        let mut expected = Address::from(0);
        for p in &partitions {
            assert_eq!(p.base(), expected);
            assert!(p.len() > 0);
            expected = p.end();
        }
        assert_eq!(expected, Address::from(capacity));
    }

    #[test]
    fn it_works() {
        let mut table = PartitionTable::new(100);
        assert_eq!(table.len(), 1);
        assert_tiling(&table, 100);

        let base = table.allocate_at(0, pid("P1"), 30);
        assert_eq!(base, Address::from(0));
        assert_eq!(table.len(), 2);
        assert_tiling(&table, 100);

        // 挿入位置の確認: 割当済みが元の位置、残りのホールが直後
        assert_eq!(table.get(0).owner(), Some(&pid("P1")));
        assert!(table.get(1).is_free());
        assert_eq!(table.get(1).base(), Address::from(30));
        assert_eq!(table.get(1).len(), 70);
    }

    #[test]
    fn exact_fit_drops_empty_hole() {
        let mut table = PartitionTable::new(50);
        let base = table.allocate_at(0, pid("P1"), 50);
        assert_eq!(base, Address::from(0));
        assert_eq!(table.len(), 1);
        assert!(!table.get(0).is_free());
        assert_tiling(&table, 50);
    }

    #[test]
    fn coalesce_merges_adjacent_holes() {
        let mut table = PartitionTable::new(100);
        table.allocate_at(0, pid("P1"), 30);
        table.allocate_at(1, pid("P2"), 40);

        // [P1(30), P2(40), hole(30)] の真ん中を解放
        let released = table.release_at(1);
        assert_eq!(released, 40);
        table.coalesce();

        assert_eq!(table.len(), 2);
        assert_tiling(&table, 100);
        assert_eq!(table.get(1).base(), Address::from(30));
        assert_eq!(table.get(1).len(), 70);
        assert!(table.get(1).is_free());
    }

    #[test]
    fn coalesce_stops_at_allocated_partition() {
        let mut table = PartitionTable::new(100);
        table.allocate_at(0, pid("P1"), 20);
        table.allocate_at(1, pid("P2"), 20);
        table.allocate_at(2, pid("P3"), 20);

        // P1とP3を解放してもP2を挟んでいるのでマージされない
        table.release_at(0);
        table.release_at(2);
        table.coalesce();

        assert_eq!(table.len(), 3);
        assert_tiling(&table, 100);
        assert!(table.get(0).is_free());
        assert_eq!(table.get(0).len(), 20);
        assert_eq!(table.get(1).owner(), Some(&pid("P2")));
        assert!(table.get(2).is_free());
        assert_eq!(table.get(2).base(), Address::from(40));
        assert_eq!(table.get(2).len(), 60);
    }

    #[test]
    fn order_is_idempotent() {
        let mut table = PartitionTable::new(100);
        table.allocate_at(0, pid("P1"), 10);
        table.allocate_at(1, pid("P2"), 20);
        table.release_at(0);
        table.coalesce();

        table.order();
        let once = table.iter().cloned().collect::<Vec<_>>();
        table.order();
        let twice = table.iter().cloned().collect::<Vec<_>>();
        assert_eq!(once, twice);
    }
}
