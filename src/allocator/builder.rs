use prometrics::metrics::MetricBuilder;
use uuid::Uuid;

use crate::allocator::MemoryAllocator;
use crate::metrics::AllocatorMetrics;
use crate::{ErrorKind, Result};

/// `MemoryAllocator`のビルダ.
#[derive(Debug, Clone)]
pub struct AllocatorBuilder {
    instance_uuid: Option<Uuid>,
    metrics: MetricBuilder,
}
impl AllocatorBuilder {
    /// 新しい`AllocatorBuilder`インスタンスを生成する.
    pub fn new() -> Self {
        AllocatorBuilder {
            instance_uuid: None,
            metrics: MetricBuilder::new(),
        }
    }

    /// アロケータインスタンスを識別するためのUUIDを設定する.
    ///
    /// ここで指定した値は、メトリクスのラベルとして利用される.
    /// 本メソッドが呼ばれていない場合は、ランダムなUUIDが割り当てられる.
    pub fn instance_uuid(&mut self, uuid: Uuid) -> &mut Self {
        self.instance_uuid = Some(uuid);
        self
    }

    /// メトリクス用の共通設定を登録する.
    ///
    /// デフォルト値は`MetricBuilder::new()`.
    pub fn metrics(&mut self, metrics: MetricBuilder) -> &mut Self {
        self.metrics = metrics;
        self
    }

    /// 容量`capacity`のアドレス空間を管理するアロケータを生成する.
    ///
    /// 生成直後のテーブルは、空間全体を占める一つの空きパーティションのみを保持している.
    ///
    /// # Errors
    ///
    /// `capacity`が0の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    pub fn create(&self, capacity: u64) -> Result<MemoryAllocator> {
        track_assert!(
            capacity > 0,
            ErrorKind::InvalidInput,
            "Too small capacity: {}",
            capacity
        );
        let uuid = self.instance_uuid.unwrap_or_else(Uuid::new_v4);
        let metrics = AllocatorMetrics::new(&self.metrics, uuid, capacity);
        Ok(MemoryAllocator::with_metrics(capacity, metrics))
    }
}
impl Default for AllocatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
