//! プロセス関連のデータ構造群.
//!
//! "プロセス"とは、アロケータに対して領域を要求する主体の識別単位.
//! `memfit`のレイヤでは、プロセスの実行そのものは扱わず、
//! 「識別子」「要求サイズ」「残り寿命(tick数)」のみを保持する.
use std::fmt;
use std::str::FromStr;

use crate::{Error, ErrorKind, Result};

/// プロセスの識別子.
#[derive(Clone, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct ProcessId(String);
impl ProcessId {
    /// 新しい`ProcessId`インスタンスを生成する.
    pub fn new<T: Into<String>>(id: T) -> Self {
        ProcessId(id.into())
    }

    /// 識別子の文字列表現を返す.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl FromStr for ProcessId {
    type Err = Error;

    /// 文字列から`ProcessId`を生成する.
    ///
    /// # Errors
    ///
    /// 空文字列が渡された場合には、種類が`ErrorKind::InvalidInput`のエラーが返される.
    ///
    /// # Examples
    ///
    /// ```
    /// use memfit::process::ProcessId;
    ///
    /// assert_eq!("P1".parse::<ProcessId>().unwrap(), ProcessId::new("P1"));
    /// assert!("".parse::<ProcessId>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        track_assert!(!s.is_empty(), ErrorKind::InvalidInput, "Empty process id");
        Ok(ProcessId::new(s))
    }
}
impl<'a> From<&'a str> for ProcessId {
    fn from(from: &'a str) -> Self {
        ProcessId::new(from)
    }
}
impl fmt::Debug for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, r#"ProcessId("{}")"#, self)
    }
}
impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// シミュレーション対象のプロセス.
///
/// 寿命は、シミュレーションのtickを単位として管理される.
/// アロケータにパーティションを割り当てられている間のみtickが消費され、
/// 待機キューに積まれている間は寿命は減らない.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    size: u64,
    remaining_time: u64,
}
impl Process {
    /// 新しい`Process`インスタンスを生成する.
    pub fn new(id: ProcessId, size: u64, time: u64) -> Self {
        Process {
            id,
            size,
            remaining_time: time,
        }
    }

    /// プロセスの識別子を返す.
    pub fn id(&self) -> &ProcessId {
        &self.id
    }

    /// プロセスが要求する領域のサイズを返す.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// プロセスの残り寿命(tick数)を返す.
    pub fn remaining_time(&self) -> u64 {
        self.remaining_time
    }

    /// 寿命が尽きているかどうかを判定する.
    pub fn is_expired(&self) -> bool {
        self.remaining_time == 0
    }

    /// 寿命を1tick分だけ減らす.
    pub fn tick(&mut self) {
        self.remaining_time = self.remaining_time.saturating_sub(1);
    }
}
