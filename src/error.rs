use std;
use trackable;
use trackable::error::ErrorKindExt;

/// crate固有のエラー型.
#[derive(Debug, Clone, TrackableError)]
pub struct Error(trackable::error::TrackableError<ErrorKind>);
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        if let Some(e) = e.get_ref().and_then(|e| e.downcast_ref::<Error>()).cloned() {
            e
        } else if e.kind() == std::io::ErrorKind::InvalidInput {
            ErrorKind::InvalidInput.cause(e).into()
        } else {
            ErrorKind::Other.cause(e).into()
        }
    }
}

/// 発生し得るエラーの種別.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 割当要求を発行したプロセスが、既に別のパーティションを占有している.
    ///
    /// 各プロセスが同時に占有できるパーティションは高々一つ.
    ///
    /// # 典型的な対応策
    ///
    /// - 先に`release`を呼び出して既存の割当を解放する
    DuplicateAllocation,

    /// 要求サイズを満たす空きパーティションが存在しない.
    ///
    /// # 典型的な対応策
    ///
    /// - 他のプロセスの解放を待ってからリトライする
    /// - 要求を待機キューに積む（シミュレータの挙動）
    NoSuitablePartition,

    /// 解放対象のプロセスが、パーティションを一つも占有していない.
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者側のプログラムを修正して、割当済みのプロセスのみを解放するようにする
    UnknownProcess,

    /// 入力が不正.
    ///
    /// E.g., サイズ0の割当要求、容量0のアロケータの生成、設定ファイルの形式不正
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者側のプログラムないし設定ファイルを修正して入力を正しくする
    InvalidInput,

    /// 内部状態が不整合に陥っている.
    ///
    /// パーティションテーブルの不変条件が破れている場合等にこのエラーが返される.
    /// プログラムにバグがあることを示している.
    ///
    /// # 典型的な対応策
    ///
    /// - バグ修正を行ってプログラムを更新する
    InconsistentState,

    /// その他エラー.
    ///
    /// E.g., I/Oエラー
    ///
    /// # 典型的な対応策
    ///
    /// - 利用者側で原因を確認の上リトライ
    Other,
}
impl trackable::error::ErrorKind for ErrorKind {}
