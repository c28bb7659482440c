//! MemFit.
//!
//! `memfit`は、固定長の連続したアドレス空間を対象としたパーティションアロケータ.
//!
//! # 特徴
//!
//! - 一つのアドレス空間を、互いに重なり合わない割当済み・空きパーティション群の列として管理する
//! - 三種類の配置戦略をサポート:
//!   - **BestFit**: 要求サイズを満たす空きパーティションの中で最小のものを選択
//!   - **WorstFit**: 要求サイズを満たす空きパーティションの中で最大のものを選択
//!   - **NextFit**: 前回の割当位置から巡回的に探索し、最初に見つかったものを選択
//! - 解放時には、隣接する空きパーティション群が自動的に一つにマージされる（コアレス）
//! - 各プロセスは同時に高々一つのパーティションしか占有できない
//! - 割当・解放は同期的かつアトミック: 失敗した操作はテーブルを一切変更しない
//!
//! # モジュールの依存関係
//!
//! ```text
//! sim => allocator
//! ```
//!
//! - [allocator]モジュール:
//!   - 主に[MemoryAllocator]構造体を提供
//!   - パーティションテーブルの不変条件の維持と、配置戦略の実装、を担当する
//! - [sim]モジュール:
//!   - 主に[Simulator]構造体を提供
//!   - tick駆動でプロセス群の寿命を管理し、[MemoryAllocator]に対して割当・解放を発行する
//!   - 設定ファイルの読み込みとランダムなプロセス群の生成もここで行う
//!
//! [allocator]: ./allocator/index.html
//! [MemoryAllocator]: ./allocator/struct.MemoryAllocator.html
//! [sim]: ./sim/index.html
//! [Simulator]: ./sim/struct.Simulator.html
#![warn(missing_docs)]
extern crate prometrics;
extern crate rand;
#[macro_use]
extern crate slog;
#[cfg(test)]
extern crate tempdir;
#[macro_use]
extern crate trackable;
extern crate uuid;

pub use crate::error::{Error, ErrorKind};

macro_rules! track_io {
    ($expr:expr) => {
        $expr.map_err(|e: ::std::io::Error| track!(crate::Error::from(e)))
    };
}

pub mod allocator;
pub mod metrics;
pub mod process;
pub mod sim;

mod error;

/// crate固有の`Result`型.
pub type Result<T> = std::result::Result<T, Error>;
