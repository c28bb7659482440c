//! tick駆動のメモリ割当シミュレーション.
//!
//! シミュレータは、設定で与えられた数のプロセスを一つの配置戦略の下で
//! アロケータに投入し、以降はtick単位で時間を進める:
//!
//! 1. 割当済みプロセスのうち寿命が尽きたものを解放する（空き領域は自動的にマージされる）
//! 2. 残りの割当済みプロセスの寿命を1減らす
//! 3. 待機キューの先頭から順に再割当を試み、成功したものを実行状態に移す
//!
//! 投入時に空き領域が足りなかったプロセスは待機キューに積まれる.
//! 待機中のプロセスの寿命は減らない.
//!
//! 一定のtick数毎に、メモリの使用状況と空き領域の統計がログに出力される.
pub use self::config::SimulatorConfig;

mod config;

use prometrics::metrics::MetricBuilder;
use rand::Rng;
use slog::{Discard, Logger};
use std::collections::VecDeque;

use crate::allocator::{AllocatorBuilder, MemoryAllocator, Strategy};
use crate::metrics::SimulatorMetrics;
use crate::process::{Process, ProcessId};
use crate::{ErrorKind, Result};

/// 設定に従ってランダムなプロセス群を生成する.
///
/// プロセス名は`"P1"`から`"P<NUM_PROC>"`、要求サイズは`1..=proc_size_max`、
/// 寿命は`1..=max_proc_time`の一様乱数となる.
pub fn generate_processes<R: Rng>(rng: &mut R, config: &SimulatorConfig) -> Vec<Process> {
    (0..config.num_proc)
        .map(|i| {
            let id = ProcessId::new(format!("P{}", i + 1));
            let size = rng.random_range(1..=config.proc_size_max);
            let time = rng.random_range(1..=config.max_proc_time);
            Process::new(id, size, time)
        })
        .collect()
}

/// `Simulator`のビルダ.
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    logger: Logger,
    strategy: Strategy,
    status_interval: u64,
    metrics: MetricBuilder,
}
impl SimulatorBuilder {
    /// デフォルト設定で`SimulatorBuilder`インスタンスを生成する.
    pub fn new() -> Self {
        SimulatorBuilder {
            logger: Logger::root(Discard, o!()),
            strategy: Strategy::BestFit,
            status_interval: 1000,
            metrics: MetricBuilder::new(),
        }
    }

    /// ロガーを設定する.
    ///
    /// デフォルトは何も出力しないロガー.
    pub fn logger(&mut self, logger: Logger) -> &mut Self {
        self.logger = logger;
        self
    }

    /// 配置戦略を設定する.
    ///
    /// デフォルト値は`Strategy::BestFit`.
    pub fn strategy(&mut self, strategy: Strategy) -> &mut Self {
        self.strategy = strategy;
        self
    }

    /// メモリの使用状況をログに出力する間隔(tick数)を設定する.
    ///
    /// `0`を指定した場合は、tick毎の定期出力は行われない.
    ///
    /// デフォルト値は`1000`.
    pub fn status_interval(&mut self, interval: u64) -> &mut Self {
        self.status_interval = interval;
        self
    }

    /// メトリクス用の共通設定を登録する.
    ///
    /// デフォルト値は`MetricBuilder::new()`.
    pub fn metrics(&mut self, metrics: MetricBuilder) -> &mut Self {
        self.metrics = metrics;
        self
    }

    /// `config`に従ってシミュレータを生成する.
    ///
    /// # Errors
    ///
    /// `config.memory_max`が0の場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    pub fn build(&self, config: &SimulatorConfig) -> Result<Simulator> {
        let allocator = track!(AllocatorBuilder::new()
            .metrics(self.metrics.clone())
            .create(config.memory_max))?;
        Ok(Simulator {
            logger: self.logger.clone(),
            allocator,
            strategy: self.strategy,
            running: Vec::new(),
            waiting: VecDeque::new(),
            elapsed_ticks: 0,
            status_interval: self.status_interval,
            metrics: SimulatorMetrics::new(&self.metrics),
        })
    }
}
impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// tick駆動のメモリ割当シミュレータ.
///
/// `MemoryAllocator`の利用側（ドライバ）であり、アロケータの不変条件には一切関与しない.
#[derive(Debug)]
pub struct Simulator {
    logger: Logger,
    allocator: MemoryAllocator,
    strategy: Strategy,
    running: Vec<Process>,
    waiting: VecDeque<Process>,
    elapsed_ticks: u64,
    status_interval: u64,
    metrics: SimulatorMetrics,
}
impl Simulator {
    /// プロセス群の初期投入を行う.
    ///
    /// 割当に成功したプロセスは実行状態に入り、空き領域が足りなかったものは
    /// 待機キューの末尾に積まれる.
    ///
    /// # Errors
    ///
    /// アドレス空間の容量を超えるサイズのプロセスが含まれている場合には、
    /// 種類が`ErrorKind::InvalidInput`のエラーが返される
    /// （そのようなプロセスは永遠に割当不可能であり、シミュレーションが停止しなくなる）.
    pub fn admit(&mut self, processes: Vec<Process>) -> Result<()> {
        for process in processes {
            track_assert!(
                process.size() <= self.allocator.capacity(),
                ErrorKind::InvalidInput,
                "Process will never fit: process={}, size={}, capacity={}",
                process.id(),
                process.size(),
                self.allocator.capacity()
            );
            track!(self.try_allocate(process))?;
        }
        Ok(())
    }

    /// シミュレーションの時間を1tick分だけ進める.
    pub fn tick(&mut self) -> Result<()> {
        // 寿命が尽きたプロセスの解放と、残りの寿命の減算
        let mut i = 0;
        while i < self.running.len() {
            if self.running[i].is_expired() {
                let process = self.running.remove(i);
                let size = track!(self.allocator.release(process.id()))?;
                info!(
                    self.logger,
                    "Released {} memory from process {}",
                    size,
                    process.id()
                );
                self.metrics.completed_processes.increment();
            } else {
                self.running[i].tick();
                i += 1;
            }
        }

        // 待機キューの先頭から順に再割当を試みる
        let waiting = std::mem::replace(&mut self.waiting, VecDeque::new());
        for process in waiting {
            track!(self.try_allocate(process))?;
        }

        self.elapsed_ticks += 1;
        self.metrics.ticks.increment();
        if self.status_interval != 0 && self.elapsed_ticks % self.status_interval == 0 {
            self.log_status();
        }
        Ok(())
    }

    /// 全てのプロセスが寿命を全うするまでシミュレーションを実行する.
    ///
    /// 完了までに要したtick数を返す.
    pub fn run(&mut self, processes: Vec<Process>) -> Result<u64> {
        track!(self.admit(processes))?;
        while !self.is_finished() {
            track!(self.tick())?;
        }
        self.log_status();
        Ok(self.elapsed_ticks)
    }

    /// 実行中・待機中のプロセスが存在しないかどうかを判定する.
    pub fn is_finished(&self) -> bool {
        self.running.is_empty() && self.waiting.is_empty()
    }

    /// これまでに経過したtick数を返す.
    pub fn elapsed_ticks(&self) -> u64 {
        self.elapsed_ticks
    }

    /// 内部のアロケータへの参照を返す.
    pub fn allocator(&self) -> &MemoryAllocator {
        &self.allocator
    }

    /// シミュレータ用のメトリクスを返す.
    pub fn metrics(&self) -> &SimulatorMetrics {
        &self.metrics
    }

    fn try_allocate(&mut self, process: Process) -> Result<()> {
        match self
            .allocator
            .allocate(self.strategy, process.id().clone(), process.size())
        {
            Err(ref e) if *e.kind() == ErrorKind::NoSuitablePartition => {
                info!(
                    self.logger,
                    "Failed to allocate memory for process {}, putting it on hold",
                    process.id()
                );
                self.metrics.enqueued_processes.increment();
                self.waiting.push_back(process);
            }
            result => {
                let size = track!(result)?;
                info!(
                    self.logger,
                    "Allocated {} memory for process {}",
                    size,
                    process.id()
                );
                self.metrics.admitted_processes.increment();
                self.running.push(process);
            }
        }
        Ok(())
    }

    // メモリの使用状況を一行のテキストに整形する.
    // E.g., `| P1 [1.500s] (30) | Free (70) |`
    fn render_status(&self) -> String {
        let mut line = "|".to_owned();
        for partition in self.allocator.snapshot() {
            if let Some(owner) = partition.owner() {
                let remaining = self
                    .running
                    .iter()
                    .find(|p| p.id() == owner)
                    .map_or(0, Process::remaining_time);
                line.push_str(&format!(
                    " {} [{:.3}s] ({}) |",
                    owner,
                    remaining as f64 / 1000.0,
                    partition.len()
                ));
            } else {
                line.push_str(&format!(" Free ({}) |", partition.len()));
            }
        }
        line
    }

    fn log_status(&self) {
        info!(self.logger, "{}", self.render_status());
        let stats = self.allocator.stats();
        info!(self.logger, "Memory stats";
              "holes" => stats.hole_count,
              "total_free" => stats.total_free,
              "average_hole_size" => stats.average_hole_size,
              "percent_free" => stats.percent_free);
    }
}
