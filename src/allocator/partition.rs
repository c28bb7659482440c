//! Partition.

use crate::allocator::Address;
use crate::process::ProcessId;

/// アドレス空間内の連続した部分領域.
///
/// 「空き(ホール)」と「いずれか一つのプロセスに割当済み」のどちらかの状態を取り、
/// 割当済みの場合にのみ所有プロセスのIDを保持する.
///
/// `Partition`はパーティションテーブルが排他的に所有する値であり、
/// 外部に公開されるのは`snapshot()`によるコピーのみ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    base: Address,
    len: u64,
    owner: Option<ProcessId>,
}
#[allow(clippy::len_without_is_empty)]
impl Partition {
    /// 空きパーティションを生成する.
    pub(crate) fn hole(base: Address, len: u64) -> Self {
        debug_assert!(len > 0);
        Partition {
            base,
            len,
            owner: None,
        }
    }

    /// パーティションの開始位置を返す.
    pub fn base(&self) -> Address {
        self.base
    }

    /// パーティションの長さを返す.
    pub fn len(&self) -> u64 {
        self.len
    }

    /// パーティションの終端位置を返す.
    ///
    /// **注意**: パーティションは`[base, end)`の領域を占めるため、
    /// `end`の位置自体はこのパーティションには含まれない.
    pub fn end(&self) -> Address {
        self.base + self.len
    }

    /// 空きパーティション（ホール）かどうかを判定する.
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// このパーティションを占有しているプロセスのIDを返す.
    ///
    /// 空きパーティションの場合には`None`が返される.
    pub fn owner(&self) -> Option<&ProcessId> {
        self.owner.as_ref()
    }

    /// 先頭から`size`分だけを`owner`に割り当てて切り出す.
    ///
    /// 残りの領域は、開始位置を`size`分だけ進めた上でこのインスタンスに残る
    /// （ちょうど全体が割り当てられた場合には長さ0になる）.
    ///
    /// # Panics
    ///
    /// 割当済みのパーティションに対して呼び出された場合、
    /// および`size`が`self.len()`を超えている場合には、現在のスレッドがパニックする.
    pub(crate) fn carve(&mut self, owner: ProcessId, size: u64) -> Partition {
        assert!(self.is_free());
        assert!(size <= self.len);
        let allocated = Partition {
            base: self.base,
            len: size,
            owner: Some(owner),
        };
        self.base = self.base + size;
        self.len -= size;
        allocated
    }

    /// 後続の空き領域を吸収して、長さを`size`分だけ増やす.
    pub(crate) fn grow(&mut self, size: u64) {
        debug_assert!(self.is_free());
        self.len += size;
    }

    /// パーティションを空き状態に戻し、解放された長さを返す.
    pub(crate) fn release(&mut self) -> u64 {
        self.owner = None;
        self.len
    }
}
