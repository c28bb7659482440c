//! [Prometheus][prometheus]用のメトリクス.
//!
//! [prometheus]: https://prometheus.io/
use prometrics::metrics::{Counter, Gauge, MetricBuilder};
use uuid::Uuid;

/// [`MemoryAllocator`]のメトリクス.
///
/// [`MemoryAllocator`]: ../allocator/struct.MemoryAllocator.html
///
/// # Prometheus
///
/// `Methods`節に記載の無いメトリクスのみを掲載:
///
/// ```prometheus
/// memfit_allocator_instance { uuid="<UUID>", capacity="<CAPACITY>" } 1
/// ```
#[derive(Debug, Clone)]
pub struct AllocatorMetrics {
    pub(crate) allocated_partitions: Counter,
    pub(crate) allocated_size: Counter,
    pub(crate) released_partitions: Counter,
    pub(crate) released_size: Counter,
    pub(crate) nospace_failures: Counter,
    pub(crate) duplicate_failures: Counter,
    pub(crate) unknown_process_failures: Counter,
    instance: Gauge,
    capacity: u64,
}
impl AllocatorMetrics {
    /// パーティションの割当回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_allocated_partitions_total <COUNTER>
    /// ```
    pub fn allocated_partitions(&self) -> u64 {
        self.allocated_partitions.value() as u64
    }

    /// これまでに割り当てた領域のサイズの合計.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_allocated_size_total <COUNTER>
    /// ```
    pub fn allocated_size(&self) -> u64 {
        self.allocated_size.value() as u64
    }

    /// パーティションの解放回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_released_partitions_total <COUNTER>
    /// ```
    pub fn released_partitions(&self) -> u64 {
        self.released_partitions.value() as u64
    }

    /// これまでに解放された領域のサイズの合計.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_released_size_total <COUNTER>
    /// ```
    pub fn released_size(&self) -> u64 {
        self.released_size.value() as u64
    }

    /// 空き領域不足による割当失敗回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_nospace_failures_total <COUNTER>
    /// ```
    pub fn nospace_failures(&self) -> u64 {
        self.nospace_failures.value() as u64
    }

    /// 重複割当による割当失敗回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_duplicate_failures_total <COUNTER>
    /// ```
    pub fn duplicate_failures(&self) -> u64 {
        self.duplicate_failures.value() as u64
    }

    /// 未割当のプロセスを対象とした解放失敗回数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_unknown_process_failures_total <COUNTER>
    /// ```
    pub fn unknown_process_failures(&self) -> u64 {
        self.unknown_process_failures.value() as u64
    }

    /// 現在割当中のプロセス数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_allocated_partitions_total - memfit_allocator_released_partitions_total
    /// ```
    pub fn active_allocations(&self) -> usize {
        // NOTE: 以下の順番で値を取得しないとアンダーフローする可能性がある
        let dec = self.released_partitions();
        let inc = self.allocated_partitions();
        (inc - dec) as usize
    }

    /// アドレス空間の現在の使用量.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_allocator_allocated_size_total - memfit_allocator_released_size_total
    /// ```
    pub fn usage(&self) -> u64 {
        // NOTE: 以下の順番で値を取得しないとアンダーフローする可能性がある
        let dec = self.released_size();
        let inc = self.allocated_size();
        inc - dec
    }

    /// アドレス空間全体の容量.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub(crate) fn new(builder: &MetricBuilder, instance_uuid: Uuid, capacity: u64) -> Self {
        let mut builder = builder.clone();
        builder.namespace("memfit").subsystem("allocator");
        AllocatorMetrics {
            allocated_partitions: builder
                .counter("allocated_partitions_total")
                .help("Number of allocated partitions")
                .finish()
                .expect("Never fails"),
            allocated_size: builder
                .counter("allocated_size_total")
                .help("Total size of allocated partitions")
                .finish()
                .expect("Never fails"),
            released_partitions: builder
                .counter("released_partitions_total")
                .help("Number of released partitions")
                .finish()
                .expect("Never fails"),
            released_size: builder
                .counter("released_size_total")
                .help("Total size of released partitions")
                .finish()
                .expect("Never fails"),
            nospace_failures: builder
                .counter("nospace_failures_total")
                .help("Number of allocation failures caused by no suitable partition")
                .finish()
                .expect("Never fails"),
            duplicate_failures: builder
                .counter("duplicate_failures_total")
                .help("Number of allocation failures caused by duplicate allocation")
                .finish()
                .expect("Never fails"),
            unknown_process_failures: builder
                .counter("unknown_process_failures_total")
                .help("Number of release failures caused by unknown process")
                .finish()
                .expect("Never fails"),
            instance: builder
                .gauge("instance")
                .help("Information of the allocator instance")
                .label("uuid", &instance_uuid.to_string())
                .label("capacity", &capacity.to_string())
                .initial_value(1.0)
                .finish()
                .expect("Never fails"),
            capacity,
        }
    }

    pub(crate) fn count_allocation(&self, size: u64) {
        self.allocated_partitions.increment();
        self.allocated_size.add_u64(size);
    }

    pub(crate) fn count_release(&self, size: u64) {
        self.released_partitions.increment();
        self.released_size.add_u64(size);
    }
}

/// [`Simulator`]のメトリクス.
///
/// [`Simulator`]: ../sim/struct.Simulator.html
#[derive(Debug, Clone)]
pub struct SimulatorMetrics {
    pub(crate) ticks: Counter,
    pub(crate) admitted_processes: Counter,
    pub(crate) enqueued_processes: Counter,
    pub(crate) completed_processes: Counter,
}
impl SimulatorMetrics {
    /// 経過したtick数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_simulator_ticks_total <COUNTER>
    /// ```
    pub fn ticks(&self) -> u64 {
        self.ticks.value() as u64
    }

    /// 割当に成功して実行状態に入ったプロセスの数.
    ///
    /// 待機キューからの再割当も含まれる.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_simulator_admitted_processes_total <COUNTER>
    /// ```
    pub fn admitted_processes(&self) -> u64 {
        self.admitted_processes.value() as u64
    }

    /// 空き不足によって待機キューに積まれたプロセスの数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_simulator_enqueued_processes_total <COUNTER>
    /// ```
    pub fn enqueued_processes(&self) -> u64 {
        self.enqueued_processes.value() as u64
    }

    /// 寿命を全うして解放されたプロセスの数.
    ///
    /// # Prometheus
    ///
    /// ```prometheus
    /// memfit_simulator_completed_processes_total <COUNTER>
    /// ```
    pub fn completed_processes(&self) -> u64 {
        self.completed_processes.value() as u64
    }

    pub(crate) fn new(builder: &MetricBuilder) -> Self {
        let mut builder = builder.clone();
        builder.namespace("memfit").subsystem("simulator");
        SimulatorMetrics {
            ticks: builder
                .counter("ticks_total")
                .help("Number of elapsed simulation ticks")
                .finish()
                .expect("Never fails"),
            admitted_processes: builder
                .counter("admitted_processes_total")
                .help("Number of processes admitted to memory")
                .finish()
                .expect("Never fails"),
            enqueued_processes: builder
                .counter("enqueued_processes_total")
                .help("Number of processes enqueued to the waiting queue")
                .finish()
                .expect("Never fails"),
            completed_processes: builder
                .counter("completed_processes_total")
                .help("Number of processes completed and released")
                .finish()
                .expect("Never fails"),
        }
    }
}
