//! シミュレーションの設定.
use std::fs;
use std::path::Path;
use std::str::FromStr;
use trackable::error::ErrorKindExt;

use crate::{Error, ErrorKind, Result};

/// シミュレーションの設定値.
///
/// `KEY = VALUE`形式（一行につき一項目）のテキストファイルから読み込まれる:
///
/// ```text
/// MEMORY_MAX = 1024
/// PROC_SIZE_MAX = 256
/// NUM_PROC = 10
/// MAX_PROC_TIME = 5000
/// ```
///
/// 空行は読み飛ばされ、未知のキーは無視される.
/// 四つのキーはいずれも必須であり、欠けている場合には読み込みがエラーとなる.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorConfig {
    /// アドレス空間全体の容量（`MEMORY_MAX`）.
    pub memory_max: u64,

    /// 一つのプロセスが要求し得るサイズの上限（`PROC_SIZE_MAX`）.
    pub proc_size_max: u64,

    /// 生成するプロセスの数（`NUM_PROC`）.
    pub num_proc: usize,

    /// プロセスの寿命の上限。tick単位（`MAX_PROC_TIME`）.
    pub max_proc_time: u64,
}
impl SimulatorConfig {
    /// 設定ファイルを読み込む.
    ///
    /// # Errors
    ///
    /// ファイルが開けない場合、および内容が設定として不正な場合には、エラーが返される.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = track_io!(fs::read_to_string(path))?;
        track!(content.parse())
    }
}
impl FromStr for SimulatorConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut memory_max = None;
        let mut proc_size_max = None;
        let mut num_proc = None;
        let mut max_proc_time = None;
        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut tokens = line.splitn(2, '=');
            let key = tokens.next().expect("Never fails").trim();
            let value = track_assert_some!(
                tokens.next(),
                ErrorKind::InvalidInput,
                "Malformed line: {:?}",
                line
            );
            match key {
                "MEMORY_MAX" => memory_max = Some(track!(parse_value(value))?),
                "PROC_SIZE_MAX" => proc_size_max = Some(track!(parse_value(value))?),
                "NUM_PROC" => num_proc = Some(track!(parse_value(value))? as usize),
                "MAX_PROC_TIME" => max_proc_time = Some(track!(parse_value(value))?),
                _ => {}
            }
        }

        let memory_max =
            track_assert_some!(memory_max, ErrorKind::InvalidInput, "Missing MEMORY_MAX");
        let proc_size_max = track_assert_some!(
            proc_size_max,
            ErrorKind::InvalidInput,
            "Missing PROC_SIZE_MAX"
        );
        let num_proc = track_assert_some!(num_proc, ErrorKind::InvalidInput, "Missing NUM_PROC");
        let max_proc_time = track_assert_some!(
            max_proc_time,
            ErrorKind::InvalidInput,
            "Missing MAX_PROC_TIME"
        );
        track_assert!(memory_max > 0, ErrorKind::InvalidInput, "Zero MEMORY_MAX");
        track_assert!(
            proc_size_max > 0,
            ErrorKind::InvalidInput,
            "Zero PROC_SIZE_MAX"
        );
        track_assert!(
            max_proc_time > 0,
            ErrorKind::InvalidInput,
            "Zero MAX_PROC_TIME"
        );
        Ok(SimulatorConfig {
            memory_max,
            proc_size_max,
            num_proc,
            max_proc_time,
        })
    }
}

fn parse_value(value: &str) -> Result<u64> {
    let value =
        track!(value
            .trim()
            .parse::<u64>()
            .map_err(|e| ErrorKind::InvalidInput.cause(e)))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Write;
    use tempdir::TempDir;
    use trackable::result::TestResult;

    use super::*;
    use crate::ErrorKind;

    #[test]
    fn it_works() -> TestResult {
        let config: SimulatorConfig = track!(
            "MEMORY_MAX = 1024\nPROC_SIZE_MAX = 256\nNUM_PROC = 10\nMAX_PROC_TIME = 5000\n"
                .parse()
        )?;
        assert_eq!(
            config,
            SimulatorConfig {
                memory_max: 1024,
                proc_size_max: 256,
                num_proc: 10,
                max_proc_time: 5000,
            }
        );
        Ok(())
    }

    #[test]
    fn unknown_keys_and_blank_lines_are_ignored() -> TestResult {
        let config: SimulatorConfig = track!(
            "\nMEMORY_MAX = 1\n\nFOO = bar\nPROC_SIZE_MAX = 1\nNUM_PROC = 0\nMAX_PROC_TIME = 1\n"
                .parse()
        )?;
        assert_eq!(config.num_proc, 0);
        Ok(())
    }

    #[test]
    fn missing_key_is_an_error() {
        let result = "MEMORY_MAX = 1024\nPROC_SIZE_MAX = 256\nNUM_PROC = 10\n"
            .parse::<SimulatorConfig>();
        assert_eq!(
            result.err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn malformed_line_is_an_error() {
        let result = "MEMORY_MAX\n".parse::<SimulatorConfig>();
        assert_eq!(
            result.err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );

        let result = "MEMORY_MAX = ten\n".parse::<SimulatorConfig>();
        assert_eq!(
            result.err().map(|e| *e.kind()),
            Some(ErrorKind::InvalidInput)
        );
    }

    #[test]
    fn load_from_file() -> TestResult {
        let dir = TempDir::new("memfit_test").unwrap();
        let path = dir.path().join("info.txt");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "MEMORY_MAX = 100").unwrap();
        writeln!(file, "PROC_SIZE_MAX = 50").unwrap();
        writeln!(file, "NUM_PROC = 3").unwrap();
        writeln!(file, "MAX_PROC_TIME = 10").unwrap();

        let config = track!(SimulatorConfig::load(&path))?;
        assert_eq!(config.memory_max, 100);
        assert_eq!(config.num_proc, 3);

        assert!(SimulatorConfig::load(dir.path().join("missing.txt")).is_err());
        Ok(())
    }
}
