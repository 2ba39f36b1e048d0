//! 数据库表映射
//!
//! 时间字段以 unix 秒存储，`into_*` 方法负责转换为 models 中带 chrono 时间的业务类型。

pub mod files;
pub mod submissions;
pub mod users;

use chrono::{DateTime, Utc};

/// unix 秒转为 UTC 时间，越界值按纪元零点处理
pub(crate) fn from_unix(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unix() {
        assert_eq!(from_unix(86_400).timestamp(), 86_400);
        assert_eq!(from_unix(i64::MAX), DateTime::<Utc>::default());
    }
}
