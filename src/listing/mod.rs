//! 列表筛选与排序引擎
//!
//! 公开展示页、学生个人列表、管理员审核列表共用同一套规则：
//! 状态、专业、关键字三个条件取交集，再按所选列稳定排序。
//! 引擎本身是纯函数，不访问存储也不修改输入。

pub mod criteria;
pub mod engine;
pub mod sort_state;

pub use criteria::{Filter, ListingCriteria, ListingParams};
pub use engine::{apply, apply_owned, collate};
pub use sort_state::{SortDirection, SortState};

use crate::models::submissions::entities::SubmissionStatus;

/// 参与关键字匹配的字段
#[derive(Debug, Clone, Copy)]
pub enum SearchField<'a> {
    Text(&'a str),
    /// 集合字段，任一元素命中即可（例如小组成员）
    Many(&'a [String]),
}

/// 排序键
#[derive(Debug, Clone, Copy)]
pub enum SortKey<'a> {
    Text(&'a str),
    /// 非文本键或缺失值，彼此相等并排在文本键之后，保持筛选后的原有顺序
    Opaque,
}

/// 可排序列
pub trait SortField: Copy + PartialEq + std::str::FromStr<Err = String> + 'static {
    fn as_str(&self) -> &'static str;
}

/// 可被列表引擎处理的记录
pub trait Listable {
    type Field: SortField;

    fn status(&self) -> SubmissionStatus;
    /// 分类字段（专业）
    fn category(&self) -> &str;
    fn search_fields(&self) -> Vec<SearchField<'_>>;
    fn sort_key(&self, field: Self::Field) -> SortKey<'_>;
}

/// 定义可排序列枚举
macro_rules! define_sort_fields {
    (
        $(#[$meta:meta])*
        $name:ident, $export:tt {
            $($variant:ident => $text:literal),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            serde::Serialize,
            serde::Deserialize,
            ts_rs::TS,
        )]
        #[serde(rename_all = "snake_case")]
        #[ts(export, export_to = $export)]
        pub enum $name {
            $($variant,)*
        }

        impl $name {
            pub fn all() -> &'static [$name] {
                &[$($name::$variant,)*]
            }
        }

        impl $crate::listing::SortField for $name {
            fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)*
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)*
                    _ => Err(format!(
                        "无效的排序字段: '{s}'. 支持: {}",
                        [$($text,)*].join(", ")
                    )),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", $crate::listing::SortField::as_str(self))
            }
        }
    };
}

pub(crate) use define_sort_fields;
