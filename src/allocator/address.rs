use std::ops::{Add, Sub};

/// アドレス空間内の位置を表す整数値.
///
/// 単位はアロケータの利用側が決める（シミュレータではKB単位として扱っている）.
///
/// 加減算はオーバーフロー・アンダーフローを検査し、違反時には現在のスレッドがパニックする.
#[derive(Debug, Default, Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash)]
pub struct Address(u64);
impl Address {
    /// アドレスの値を返す.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}
impl From<u64> for Address {
    fn from(from: u64) -> Self {
        Address(from)
    }
}
impl Add<u64> for Address {
    type Output = Self;
    fn add(self, rhs: u64) -> Self {
        let value = self.0.checked_add(rhs).expect("address overflow");
        Address(value)
    }
}
impl Sub for Address {
    type Output = u64;
    fn sub(self, rhs: Self) -> u64 {
        self.0.checked_sub(rhs.0).expect("address underflow")
    }
}
